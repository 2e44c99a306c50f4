//! The universal properties §8 holds the core to, checked against the
//! public API rather than any one internal representative case.

use bendu_infer::alias::AliasRegistry;
use bendu_infer::ast::{Expr, ExprKind, Literal};
use bendu_infer::env::{generalize, Env};
use bendu_infer::subst::Substitution;
use bendu_infer::types::{structural_eq, AliasRef, Level, Primitive, RecordType, Type, VarGen};
use bendu_infer::unify::unify;
use bendu_infer::{infer, Options};
use bendu_common::Span;
use indexmap::IndexMap;

fn e(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::dummy())
}

fn sample_types(vgen: &VarGen) -> Vec<(Type, Type)> {
    let a = vgen.fresh_type(Level::TOP);
    let b = vgen.fresh_type(Level::TOP);
    let int = Type::Primitive(Primitive::Int);
    let mut rec_fields = IndexMap::new();
    rec_fields.insert("x".to_string(), int.clone());
    vec![
        (a.clone(), int.clone()),
        (Type::function(a.clone(), int.clone()), Type::function(int.clone(), int.clone())),
        (Type::Tuple(vec![a, int.clone()]), Type::Tuple(vec![int.clone(), int.clone()])),
        (b.clone(), Type::Record(RecordType::closed(rec_fields))),
    ]
}

#[test]
fn soundness_of_unification() {
    let vgen = VarGen::new();
    let aliases = AliasRegistry::new();
    for (lhs, rhs) in sample_types(&vgen) {
        let s = unify(&lhs, &rhs, &Substitution::empty(), &aliases, &vgen, Span::dummy())
            .unwrap_or_else(|e| panic!("expected {lhs:?} ~ {rhs:?} to unify, got {e:?}"));
        assert!(structural_eq(&s.apply(&lhs), &s.apply(&rhs)));
    }
}

#[test]
fn idempotence_of_substitution() {
    let vgen = VarGen::new();
    let a = vgen.fresh(Level::TOP);
    let b = vgen.fresh(Level::TOP);
    let mut s = Substitution::empty();
    s.insert(a.id, Type::Var(b));
    s.insert(b.id, Type::Primitive(Primitive::Bool));

    let ty = Type::function(Type::Var(a), Type::Var(b));
    let once = s.apply(&ty);
    let twice = s.apply(&once);
    assert!(structural_eq(&once, &twice));
}

#[test]
fn composition_matches_sequential_application() {
    let vgen = VarGen::new();
    let a = vgen.fresh(Level::TOP);
    let b = vgen.fresh(Level::TOP);
    let c = vgen.fresh(Level::TOP);

    let s1 = Substitution::singleton(a.id, Type::function(Type::Var(b), Type::Var(c)));
    let s2 = Substitution::singleton(b.id, Type::Primitive(Primitive::Int));

    let composed = Substitution::compose(&s2, &s1);
    let ty = Type::Var(a);
    let sequential = s2.apply(&s1.apply(&ty));
    let via_compose = composed.apply(&ty);
    assert!(structural_eq(&sequential, &via_compose));
}

#[test]
fn occurs_check_rejects_a_variable_unified_with_a_type_containing_it() {
    let vgen = VarGen::new();
    let aliases = AliasRegistry::new();
    let alpha = vgen.fresh_type(Level::TOP);
    let tuple_containing_alpha = Type::Tuple(vec![alpha.clone(), Type::Primitive(Primitive::Bool)]);
    let err = unify(
        &alpha,
        &tuple_containing_alpha,
        &Substitution::empty(),
        &aliases,
        &vgen,
        Span::dummy(),
    );
    assert!(err.is_err());

    // Unifying a variable with itself is not an occurs-check failure.
    let ok = unify(&alpha, &alpha, &Substitution::empty(), &aliases, &vgen, Span::dummy());
    assert!(ok.is_ok());
}

#[test]
fn principal_type_is_not_prematurely_narrowed_by_generalization() {
    // let id = \x. x in id — generalizing id's type should quantify its
    // argument variable rather than leave it specific to any one call site.
    let vgen = VarGen::new();
    let param = vgen.fresh(Level::TOP);
    let id_ty = Type::function(Type::Var(param), Type::Var(param));
    let scheme = generalize(&Env::new(), &id_ty);
    assert_eq!(scheme.vars, vec![param.id]);

    let call_site_a = scheme.instantiate(&vgen, Level::TOP);
    let call_site_b = scheme.instantiate(&vgen, Level::TOP);
    assert!(!structural_eq(&call_site_a, &call_site_b));
}

#[test]
fn row_symmetry_produces_mutually_consistent_substitutions() {
    let vgen = VarGen::new();
    let aliases = AliasRegistry::new();
    let rho = vgen.fresh(Level::TOP);
    let mut open_fields = IndexMap::new();
    open_fields.insert("x".to_string(), Type::Primitive(Primitive::Int));
    let open = Type::Record(RecordType::open(open_fields, rho));

    let mut closed_fields = IndexMap::new();
    closed_fields.insert("x".to_string(), Type::Primitive(Primitive::Int));
    closed_fields.insert("y".to_string(), Type::Primitive(Primitive::String));
    let closed = Type::Record(RecordType::closed(closed_fields));

    let forward = unify(&open, &closed, &Substitution::empty(), &aliases, &vgen, Span::dummy()).unwrap();
    let backward = unify(&closed, &open, &Substitution::empty(), &aliases, &vgen, Span::dummy()).unwrap();

    let forward_rho = forward.get(rho.id).expect("rho bound by the forward direction");
    let backward_rho = backward.get(rho.id).expect("rho bound by the backward direction");
    assert!(structural_eq(forward_rho, backward_rho));
}

#[test]
fn alias_transparency_normalizes_to_the_same_type_as_its_expansion() {
    let mut aliases = AliasRegistry::new();
    let mut fields = IndexMap::new();
    fields.insert("x".to_string(), Type::Primitive(Primitive::Int));
    aliases
        .define("Point".to_string(), vec![], Type::Record(RecordType::closed(fields.clone())))
        .unwrap();

    let via_alias = Type::Alias(AliasRef {
        name: "Point".to_string(),
        args: vec![],
    });
    let via_expansion = Type::Record(RecordType::closed(fields));

    let normalized_alias = aliases.normalize(&via_alias).unwrap();
    let normalized_expansion = aliases.normalize(&via_expansion).unwrap();
    assert!(structural_eq(&normalized_alias, &normalized_expansion));
}

#[test]
fn generalization_lets_two_instantiations_diverge_without_forcing_unification() {
    let id_lambda = e(ExprKind::Lambda {
        param: "x".to_string(),
        annotation: None,
        body: Box::new(e(ExprKind::Var("x".to_string()))),
    });
    let tuple = e(ExprKind::Tuple(vec![
        e(ExprKind::Apply {
            func: Box::new(e(ExprKind::Var("id".to_string()))),
            arg: Box::new(e(ExprKind::Literal(Literal::Int(1)))),
        }),
        e(ExprKind::Apply {
            func: Box::new(e(ExprKind::Var("id".to_string()))),
            arg: Box::new(e(ExprKind::Literal(Literal::Bool(true)))),
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
            assert!(matches!(elems[1], Type::Primitive(Primitive::Bool)));
        }
        other => panic!("expected a 2-tuple, got {other:?}"),
    }
}
