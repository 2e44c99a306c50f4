//! Constraints emitted by the generator and consumed by the solver (§4.4,
//! §4.6): a pair of types, an optional source location, and a priority.

use crate::types::Type;
use bendu_common::Span;

/// `Equality < Subtyping < Instance` (§4.4). `Ord` is derived in
/// declaration order, so sorting a `Vec<Constraint>` by `priority` gives
/// exactly the solver's required processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Equality,
    Subtyping,
    Instance,
}

#[derive(Clone, Debug)]
pub enum Constraint {
    /// `left = right` — resolved by unification.
    Equality {
        left: Type,
        right: Type,
        span: Span,
    },
    /// `sub <: sup` — width subtyping on records, contra/covariant on
    /// functions; a free variable on the `sup` side widens to a union of
    /// every lower bound offered, anything else falls back to equality
    /// (§4.6).
    Subtyping {
        sub: Type,
        sup: Type,
        span: Span,
    },
    /// `ty` must belong to the named (fixed) instance/type class.
    Instance {
        class: String,
        ty: Type,
        span: Span,
    },
}

impl Constraint {
    #[must_use]
    pub fn equality(left: Type, right: Type, span: Span) -> Self {
        Constraint::Equality { left, right, span }
    }

    #[must_use]
    pub fn subtyping(sub: Type, sup: Type, span: Span) -> Self {
        Constraint::Subtyping { sub, sup, span }
    }

    #[must_use]
    pub fn instance(class: impl Into<String>, ty: Type, span: Span) -> Self {
        Constraint::Instance {
            class: class.into(),
            ty,
            span,
        }
    }

    #[must_use]
    pub fn priority(&self) -> Priority {
        match self {
            Constraint::Equality { .. } => Priority::Equality,
            Constraint::Subtyping { .. } => Priority::Subtyping,
            Constraint::Instance { .. } => Priority::Instance,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Constraint::Equality { span, .. }
            | Constraint::Subtyping { span, .. }
            | Constraint::Instance { span, .. } => *span,
        }
    }
}

/// The constraint set produced by one generator call, alongside the
/// inferred type (§2: "generator (produces `(inferredType, constraintSet)`
/// against an environment)").
#[derive(Clone, Debug, Default)]
pub struct Constraints(pub Vec<Constraint>);

impl Constraints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: Constraint) {
        self.0.push(c);
    }

    pub fn extend(&mut self, other: Constraints) {
        self.0.extend(other.0);
    }
}
