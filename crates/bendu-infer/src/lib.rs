//! Constraint-based Hindley-Milner type-inference core for mini-bendu:
//! row-polymorphic records, literal-union discrimination, intersection
//! types, and recursive/parameterized type aliases.
//!
//! The pipeline (§2): parsed AST -> [`generate::generate`] (environment ->
//! `(inferredType, constraintSet)`) -> [`solve::solve`] (constraints ->
//! substitution) -> `substitution.apply(inferredType)` is the final type.

pub mod alias;
pub mod ast;
pub mod constraint;
pub mod env;
pub mod error;
pub mod generate;
pub mod pattern;
pub mod render;
pub mod solve;
pub mod subst;
pub mod types;
pub mod unify;

use alias::AliasRegistry;
use ast::Expr;
use env::Env;
use error::TypeError;
use types::{Level, Primitive, Type, VarGen};

/// Environment configuration recognized by the core (§6): builtin bindings,
/// an optional fresh-id seed for reproducible tests, and whether an
/// undefined name should abort the whole expression or substitute a fresh
/// variable and continue ("error recovery mode", §7).
#[derive(Default)]
pub struct Options {
    pub seed: Option<u32>,
    pub error_recovery: bool,
}

/// §6 "Output": on success the fully substituted type of the expression and
/// the residual environment; on failure a structured error.
pub struct TypeCheckResult {
    pub ty: Type,
    pub env: Env,
}

/// Binds the built-in primitive types and their operator signatures at
/// startup (§6 "built-in primitive bindings").
fn builtin_env() -> Env {
    use env::Scheme;
    let env = Env::new();
    let int = Type::Primitive(Primitive::Int);
    let float = Type::Primitive(Primitive::Float);
    let bool_ty = Type::Primitive(Primitive::Bool);
    env.bind("+", Scheme::monomorphic(Type::function(int.clone(), Type::function(int.clone(), int.clone()))))
        .bind(
            "+.",
            Scheme::monomorphic(Type::function(float.clone(), Type::function(float.clone(), float))),
        )
        .bind(
            "not",
            Scheme::monomorphic(Type::function(bool_ty.clone(), bool_ty)),
        )
}

/// Type-check `expr` under the built-in environment, returning the fully
/// substituted result type or the first structured error encountered.
pub fn infer(expr: &Expr, options: &Options) -> Result<TypeCheckResult, TypeError> {
    infer_with_env(expr, &builtin_env(), options)
}

/// Type-check `expr` under a caller-supplied environment — used to thread a
/// residual environment from one top-level declaration into the next.
pub fn infer_with_env(expr: &Expr, env: &Env, options: &Options) -> Result<TypeCheckResult, TypeError> {
    let vgen = match options.seed {
        Some(seed) => VarGen::seeded(seed),
        None => VarGen::new(),
    };
    let mut aliases = AliasRegistry::new();

    tracing::debug!(span = ?expr.span, "inferring top-level expression");

    let generated = generate::generate(expr, env, &vgen, Level::TOP, &mut aliases);
    let (ty, constraints) = match generated {
        Ok(pair) => pair,
        Err(err @ TypeError::UndefinedName { .. }) if options.error_recovery => {
            tracing::warn!(?err, "undefined name; continuing with a fresh variable");
            (vgen.fresh_type(Level::TOP), constraint::Constraints::new())
        }
        Err(err) => return Err(err),
    };

    let substitution = solve::solve(constraints, &aliases, &vgen)?;
    let final_ty = substitution.apply(&ty);
    let final_ty = aliases.normalize(&final_ty)?;

    Ok(TypeCheckResult {
        ty: final_ty,
        env: env.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{Expr, ExprKind, Literal};
    use bendu_common::Span;

    fn e(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::dummy())
    }

    #[test]
    fn let_x_42_in_x_infers_int() {
        let expr = e(ExprKind::Let {
            name: "x".to_string(),
            annotation: None,
            recursive: false,
            init: Box::new(e(ExprKind::Literal(Literal::Int(42)))),
            body: Some(Box::new(e(ExprKind::Var("x".to_string())))),
        });
        let result = infer(&expr, &Options::default()).unwrap();
        assert!(matches!(result.ty, Type::Primitive(Primitive::Int)));
    }

    #[test]
    fn lambda_adding_one_infers_int_to_int() {
        let expr = e(ExprKind::Lambda {
            param: "x".to_string(),
            annotation: None,
            body: Box::new(e(ExprKind::Apply {
                func: Box::new(e(ExprKind::Apply {
                    func: Box::new(e(ExprKind::Var("+".to_string()))),
                    arg: Box::new(e(ExprKind::Var("x".to_string()))),
                })),
                arg: Box::new(e(ExprKind::Literal(Literal::Int(1)))),
            })),
        });
        let result = infer(&expr, &Options::default()).unwrap();
        match result.ty {
            Type::Function(dom, cod) => {
                assert!(matches!(*dom, Type::Primitive(Primitive::Int)));
                assert!(matches!(*cod, Type::Primitive(Primitive::Int)));
            }
            other => panic!("expected a function type, got {other:?}"),
        }
    }

    #[test]
    fn polymorphic_id_used_at_two_instantiations() {
        // let id = \x. x in (id(42), id("s"))
        let id_lambda = e(ExprKind::Lambda {
            param: "x".to_string(),
            annotation: None,
            body: Box::new(e(ExprKind::Var("x".to_string()))),
        });
        let tuple = e(ExprKind::Tuple(vec![
            e(ExprKind::Apply {
                func: Box::new(e(ExprKind::Var("id".to_string()))),
                arg: Box::new(e(ExprKind::Literal(Literal::Int(42)))),
            }),
            e(ExprKind::Apply {
                func: Box::new(e(ExprKind::Var("id".to_string()))),
                arg: Box::new(e(ExprKind::Literal(Literal::String("s".to_string())))),
            }),
        ]));
        let expr = e(ExprKind::Let {
            name: "id".to_string(),
            annotation: None,
            recursive: false,
            init: Box::new(id_lambda),
            body: Some(Box::new(tuple)),
        });
        let result = infer(&expr, &Options::default()).unwrap();
        match result.ty {
            Type::Tuple(elems) => {
                assert!(matches!(elems[0], Type::Primitive(Primitive::Int)));
                assert!(matches!(elems[1], Type::Literal(ref s) if s == "s"));
            }
            other => panic!("expected a tuple type, got {other:?}"),
        }
    }

    #[test]
    fn field_projection_infers_an_open_record_function() {
        let expr = e(ExprKind::Lambda {
            param: "r".to_string(),
            annotation: None,
            body: Box::new(e(ExprKind::FieldAccess {
                target: Box::new(e(ExprKind::Var("r".to_string()))),
                field: "name".to_string(),
            })),
        });
        let result = infer(&expr, &Options::default()).unwrap();
        match result.ty {
            Type::Function(dom, _) => match *dom {
                Type::Record(rec) => assert!(rec.is_open()),
                other => panic!("expected an open record, got {other:?}"),
            },
            other => panic!("expected a function type, got {other:?}"),
        }
    }

    #[test]
    fn undefined_name_fails_by_default() {
        let expr = e(ExprKind::Var("nope".to_string()));
        let err = infer(&expr, &Options::default());
        assert!(matches!(err, Err(TypeError::UndefinedName { .. })));
    }

    #[test]
    fn undefined_name_recovers_when_requested() {
        let expr = e(ExprKind::Var("nope".to_string()));
        let opts = Options {
            seed: Some(0),
            error_recovery: true,
        };
        let result = infer(&expr, &opts).unwrap();
        assert!(matches!(result.ty, Type::Var(_)));
    }

    #[test]
    fn alias_def_reaches_a_later_reference_through_the_public_api() {
        // type UserId = Int in (42 : UserId)
        use crate::types::AliasRef;
        let expr = e(ExprKind::Let {
            name: "_".to_string(),
            annotation: None,
            recursive: false,
            init: Box::new(e(ExprKind::AliasDef {
                name: "UserId".to_string(),
                params: Vec::new(),
                body: Type::Primitive(Primitive::Int),
            })),
            body: Some(Box::new(e(ExprKind::Annotate {
                expr: Box::new(e(ExprKind::Literal(Literal::Int(42)))),
                annotation: Type::Alias(AliasRef {
                    name: "UserId".to_string(),
                    args: Vec::new(),
                }),
            }))),
        });
        let result = infer(&expr, &Options::default()).unwrap();
        assert!(matches!(result.ty, Type::Primitive(Primitive::Int)));
    }
}
