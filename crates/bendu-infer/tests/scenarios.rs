//! The nine worked scenarios from §8 ("Concrete scenarios"), each typed
//! end-to-end through `bendu_infer::infer` or the relevant public API.

use bendu_infer::alias::AliasRegistry;
use bendu_infer::ast::{ArithOp, Expr, ExprKind, Literal, MatchArm, Pattern, PatternKind};
use bendu_infer::error::TypeError;
use bendu_infer::types::{Level, Primitive, Type, VarGen};
use bendu_infer::{infer, Options};
use bendu_common::Span;

fn e(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::dummy())
}

fn p(kind: PatternKind) -> Pattern {
    Pattern::new(kind, Span::dummy())
}

#[test]
fn scenario_1_let_x_42_in_x_infers_int() {
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
fn scenario_2_lambda_x_plus_one_infers_int_to_int() {
    let expr = e(ExprKind::Lambda {
        param: "x".to_string(),
        annotation: None,
        body: Box::new(e(ExprKind::Arith {
            op: ArithOp::Add,
            left: Box::new(e(ExprKind::Var("x".to_string()))),
            right: Box::new(e(ExprKind::Literal(Literal::Int(1)))),
        })),
    });
    let result = infer(&expr, &Options::default()).unwrap();
    match result.ty {
        Type::Function(dom, cod) => {
            assert!(matches!(*dom, Type::Primitive(Primitive::Int)));
            assert!(matches!(*cod, Type::Primitive(Primitive::Int)));
        }
        other => panic!("expected Int -> Int, got {other:?}"),
    }
}

#[test]
fn scenario_3_polymorphic_id_used_at_two_instantiations() {
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
            assert_eq!(elems.len(), 2);
            assert!(matches!(elems[0], Type::Primitive(Primitive::Int)));
            assert!(matches!(elems[1], Type::Literal(ref s) if s == "s"));
        }
        other => panic!("expected a 2-tuple, got {other:?}"),
    }
}

#[test]
fn scenario_4_field_projection_infers_an_open_record_function() {
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
            Type::Record(rec) => {
                assert!(rec.is_open());
                assert!(rec.fields.contains_key("name"));
            }
            other => panic!("expected an open record domain, got {other:?}"),
        },
        other => panic!("expected a function type, got {other:?}"),
    }
}

#[test]
fn scenario_5_matching_string_literals_infers_int() {
    let arm = |lit: &str, n: i64| MatchArm {
        pattern: p(PatternKind::Literal(Literal::String(lit.to_string()))),
        body: e(ExprKind::Literal(Literal::Int(n))),
    };
    let wildcard_arm = MatchArm {
        pattern: p(PatternKind::Wildcard),
        body: e(ExprKind::Literal(Literal::Int(2))),
    };
    let expr = e(ExprKind::Lambda {
        param: "s".to_string(),
        annotation: Some(Type::Primitive(Primitive::String)),
        body: Box::new(e(ExprKind::Match {
            scrutinee: Box::new(e(ExprKind::Var("s".to_string()))),
            arms: vec![arm("pending", 0), arm("done", 1), wildcard_arm],
        })),
    });
    let result = infer(&expr, &Options::default()).unwrap();
    match result.ty {
        Type::Function(dom, cod) => {
            assert!(matches!(*dom, Type::Primitive(Primitive::String)));
            assert!(matches!(*cod, Type::Primitive(Primitive::Int)));
        }
        other => panic!("expected String -> Int, got {other:?}"),
    }
}

#[test]
fn scenario_6_unify_alpha_with_alpha_arrow_int_fails_occurs_check() {
    let vgen = VarGen::new();
    let aliases = AliasRegistry::new();
    let alpha = vgen.fresh_type(Level::TOP);
    let arrow = Type::function(alpha.clone(), Type::Primitive(Primitive::Int));
    let err = bendu_infer::unify::unify(
        &alpha,
        &arrow,
        &bendu_infer::subst::Substitution::empty(),
        &aliases,
        &vgen,
        Span::dummy(),
    );
    assert!(matches!(err, Err(TypeError::OccursCheck { .. })));
}

#[test]
fn scenario_7_row_unification_binds_rho_to_the_missing_field() {
    use indexmap::IndexMap;
    use bendu_infer::types::RecordType;

    let vgen = VarGen::new();
    let aliases = AliasRegistry::new();
    let rho = vgen.fresh(Level::TOP);
    let mut left_fields = IndexMap::new();
    left_fields.insert("x".to_string(), Type::Primitive(Primitive::Int));
    let left = Type::Record(RecordType::open(left_fields, rho));

    let mut right_fields = IndexMap::new();
    right_fields.insert("x".to_string(), Type::Primitive(Primitive::Int));
    right_fields.insert("y".to_string(), Type::Primitive(Primitive::String));
    let right = Type::Record(RecordType::closed(right_fields));

    let s = bendu_infer::unify::unify(
        &left,
        &right,
        &bendu_infer::subst::Substitution::empty(),
        &aliases,
        &vgen,
        Span::dummy(),
    )
    .unwrap();
    match s.get(rho.id).expect("rho should be bound") {
        Type::Record(rec) => {
            assert_eq!(rec.fields.len(), 1);
            assert!(rec.fields.contains_key("y"));
        }
        other => panic!("expected rho bound to {{y: String}}, got {other:?}"),
    }
}

#[test]
fn scenario_8_type_a_equals_b_type_b_equals_a_is_rejected_at_the_second_definition() {
    let mut registry = AliasRegistry::new();
    registry
        .define(
            "A".to_string(),
            vec![],
            Type::Alias(bendu_infer::types::AliasRef {
                name: "B".to_string(),
                args: vec![],
            }),
        )
        .unwrap();
    let err = registry.define(
        "B".to_string(),
        vec![],
        Type::Alias(bendu_infer::types::AliasRef {
            name: "A".to_string(),
            args: vec![],
        }),
    );
    assert!(matches!(err, Err(TypeError::AliasCycle { .. })));
}

#[test]
fn scenario_9_recursive_list_alias_through_a_record_is_accepted() {
    use indexmap::IndexMap;
    use bendu_infer::types::RecordType;

    let vgen = VarGen::new();
    let t = vgen.fresh(Level::TOP);
    let mut fields = IndexMap::new();
    fields.insert("head".to_string(), Type::Var(t));
    fields.insert(
        "tail".to_string(),
        Type::Alias(bendu_infer::types::AliasRef {
            name: "List".to_string(),
            args: vec![Type::Var(t)],
        }),
    );
    let mut registry = AliasRegistry::new();
    let result = registry.define("List".to_string(), vec![t.id], Type::Record(RecordType::closed(fields)));
    assert!(result.is_ok());
}
