//! The AST shape consumed by the constraint generator (§6). Lexing,
//! parsing, and AST construction are external collaborators; this module
//! only names the node kinds the core needs to walk.

use crate::types::Type;
use bendu_common::Span;

#[derive(Clone, Debug)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Char(char),
    Bool(bool),
    Unit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// A record literal's entries: either a named field or a spread of another
/// expression's fields (§4.4 "Record literal").
#[derive(Clone, Debug)]
pub enum RecordEntry {
    Field { name: String, value: Expr },
    Spread(Expr),
}

#[derive(Clone, Debug)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub body: Expr,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(Literal),
    Var(String),
    Lambda {
        param: String,
        annotation: Option<Type>,
        body: Box<Expr>,
    },
    Apply {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
    Let {
        name: String,
        annotation: Option<Type>,
        recursive: bool,
        init: Box<Expr>,
        body: Option<Box<Expr>>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Arith {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    Record(Vec<RecordEntry>),
    FieldAccess {
        target: Box<Expr>,
        field: String,
    },
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    AliasDef {
        name: String,
        params: Vec<String>,
        body: Type,
    },
    Annotate {
        expr: Box<Expr>,
        annotation: Type,
    },
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Debug)]
pub enum PatternKind {
    Literal(Literal),
    Wildcard,
    Variable {
        name: String,
        annotation: Option<Type>,
    },
    Tuple(Vec<Pattern>),
    Record(Vec<(String, Pattern)>),
    /// §4.5 "Constructor / named pattern": left to future work; documents
    /// the shape but only emits an equality against the named scheme.
    Constructor {
        name: String,
        args: Vec<Pattern>,
    },
}

#[derive(Clone, Debug)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    #[must_use]
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Pattern { kind, span }
    }
}
