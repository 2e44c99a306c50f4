//! Pattern typing (§4.5): elaborates a pattern against an expected
//! scrutinee type, producing equality constraints and variable bindings.

use crate::ast::{Literal, Pattern, PatternKind};
use crate::constraint::{Constraint, Constraints};
use crate::env::{Env, Scheme};
use crate::types::{Level, Primitive, RecordType, Type, VarGen};
use indexmap::IndexMap;

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::Primitive(Primitive::Int),
        Literal::Float(_) => Type::Primitive(Primitive::Float),
        Literal::String(s) => Type::Literal(s.clone()),
        Literal::Char(_) => Type::Primitive(Primitive::Char),
        Literal::Bool(_) => Type::Primitive(Primitive::Bool),
        Literal::Unit => Type::Primitive(Primitive::Unit),
    }
}

/// Elaborate `pattern` against `scrutinee`, extending `env` with any
/// variables the pattern binds and appending constraints to `out`.
pub fn type_pattern(
    pattern: &Pattern,
    scrutinee: &Type,
    env: &Env,
    vgen: &VarGen,
    level: Level,
    out: &mut Constraints,
) -> Env {
    match &pattern.kind {
        PatternKind::Literal(lit) => {
            // A literal pattern only needs to be a subtype of the scrutinee,
            // not equal to it — matching `"pending"` against an `s : String`
            // scrutinee is exactly this (§4.5, §9 discriminated unions).
            out.push(Constraint::subtyping(literal_type(lit), scrutinee.clone(), pattern.span));
            env.clone()
        }
        PatternKind::Wildcard => env.clone(),
        PatternKind::Variable { name, annotation } => {
            if let Some(ann) = annotation {
                out.push(Constraint::equality(scrutinee.clone(), ann.clone(), pattern.span));
            }
            env.bind(name.clone(), Scheme::monomorphic(scrutinee.clone()))
        }
        PatternKind::Tuple(elems) => {
            let fresh: Vec<Type> = elems.iter().map(|_| vgen.fresh_type(level)).collect();
            out.push(Constraint::equality(
                scrutinee.clone(),
                Type::Tuple(fresh.clone()),
                pattern.span,
            ));
            let mut env = env.clone();
            for (elem, elem_ty) in elems.iter().zip(&fresh) {
                env = type_pattern(elem, elem_ty, &env, vgen, level, out);
            }
            env
        }
        PatternKind::Record(fields) => {
            // An open record: the row variable allows extra scrutinee
            // fields (width subtyping at the pattern side, §4.5).
            let row = vgen.fresh(level);
            let mut field_types = IndexMap::with_capacity(fields.len());
            let mut bindings = Vec::with_capacity(fields.len());
            for (name, sub_pattern) in fields {
                let fresh = vgen.fresh_type(level);
                field_types.insert(name.clone(), fresh.clone());
                bindings.push((sub_pattern, fresh));
            }
            out.push(Constraint::equality(
                scrutinee.clone(),
                Type::Record(RecordType::open(field_types, row)),
                pattern.span,
            ));
            let mut env = env.clone();
            for (sub_pattern, field_ty) in bindings {
                env = type_pattern(sub_pattern, &field_ty, &env, vgen, level, out);
            }
            env
        }
        PatternKind::Constructor { name, args } => {
            // §4.5: documents the shape but treats it as an equality
            // against the relevant constructor scheme.
            let mut env = env.clone();
            let arg_types: Vec<Type> = match env.lookup(name) {
                Some(scheme) => {
                    let instantiated = scheme.instantiate(vgen, level);
                    let mut domains = Vec::with_capacity(args.len());
                    let mut result = instantiated;
                    for _ in args {
                        match result {
                            Type::Function(dom, cod) => {
                                domains.push(*dom);
                                result = *cod;
                            }
                            other => {
                                domains.push(vgen.fresh_type(level));
                                result = other;
                            }
                        }
                    }
                    out.push(Constraint::equality(scrutinee.clone(), result, pattern.span));
                    domains
                }
                None => args.iter().map(|_| vgen.fresh_type(level)).collect(),
            };
            for (arg, arg_ty) in args.iter().zip(&arg_types) {
                env = type_pattern(arg, arg_ty, &env, vgen, level, out);
            }
            env
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bendu_common::Span;

    #[test]
    fn record_pattern_is_open_and_binds_fields() {
        let vgen = VarGen::new();
        let scrutinee = vgen.fresh_type(Level::TOP);
        let pattern = Pattern::new(
            PatternKind::Record(vec![(
                "name".to_string(),
                Pattern::new(
                    PatternKind::Variable {
                        name: "n".to_string(),
                        annotation: None,
                    },
                    Span::dummy(),
                ),
            )]),
            Span::dummy(),
        );
        let mut constraints = Constraints::new();
        let env = type_pattern(&pattern, &scrutinee, &Env::new(), &vgen, Level::TOP, &mut constraints);
        assert!(env.lookup("n").is_some());
        assert_eq!(constraints.0.len(), 1);
        match &constraints.0[0] {
            Constraint::Equality { right, .. } => match right {
                Type::Record(rec) => assert!(rec.is_open()),
                other => panic!("expected a record type, got {other:?}"),
            },
            other => panic!("expected an equality constraint, got {other:?}"),
        }
    }

    #[test]
    fn wildcard_binds_nothing() {
        let vgen = VarGen::new();
        let scrutinee = vgen.fresh_type(Level::TOP);
        let pattern = Pattern::new(PatternKind::Wildcard, Span::dummy());
        let mut constraints = Constraints::new();
        let env = type_pattern(&pattern, &scrutinee, &Env::new(), &vgen, Level::TOP, &mut constraints);
        assert!(constraints.0.is_empty());
        assert!(env.lookup("anything").is_none());
    }
}
