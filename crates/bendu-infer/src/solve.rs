//! The constraint solver (§4.6): sorts by priority, runs unification for
//! equality constraints, width/variance rules for subtyping, and a fixed
//! instance table for the placeholder type-class bucket.

use crate::alias::AliasRegistry;
use crate::constraint::{Constraint, Constraints};
use crate::error::TypeError;
use crate::subst::Substitution;
use crate::types::{structural_eq, Primitive, Type, VarGen};
use crate::unify::unify;
use bendu_common::limits::MAX_SOLVER_CONSTRAINTS;

/// Run every constraint in `constraints` to completion, in priority order
/// (`Equality < Subtyping < Instance`, stable within a class), and return
/// the resulting substitution. Stops at the first failure (§7: "The solver
/// stops at the first failure; it does not attempt recovery.").
pub fn solve(
    constraints: Constraints,
    aliases: &AliasRegistry,
    vgen: &VarGen,
) -> Result<Substitution, TypeError> {
    let mut queue = constraints.0;
    if queue.len() > MAX_SOLVER_CONSTRAINTS {
        return Err(TypeError::TooManyConstraints { count: queue.len() });
    }
    queue.sort_by_key(Constraint::priority);

    let mut s = Substitution::empty();
    for constraint in queue {
        s = solve_one(constraint, &s, aliases, vgen)?;
    }
    Ok(s)
}

fn solve_one(
    constraint: Constraint,
    s: &Substitution,
    aliases: &AliasRegistry,
    vgen: &VarGen,
) -> Result<Substitution, TypeError> {
    match constraint {
        Constraint::Equality { left, right, span } => unify(&left, &right, s, aliases, vgen, span),
        Constraint::Subtyping { sub, sup, span } => solve_subtyping(&sub, &sup, s, aliases, vgen, span),
        Constraint::Instance { class, ty, span } => solve_instance(&class, &ty, s, span),
    }
}

/// `sub <: sup` (§4.6). Trivially-equivalent sides are satisfied outright;
/// record-on-record requires the supertype's fields to be a subset of the
/// subtype's with pointwise unifiable types (width subtyping); function-on-
/// function recurses contravariantly on domains, covariantly on codomains;
/// anything involving a variable falls back to equality.
fn solve_subtyping(
    sub: &Type,
    sup: &Type,
    s: &Substitution,
    aliases: &AliasRegistry,
    vgen: &VarGen,
    span: bendu_common::Span,
) -> Result<Substitution, TypeError> {
    let sub = s.apply(sub);
    let sup = s.apply(sup);

    if structural_eq(&sub, &sup) {
        return Ok(s.clone());
    }

    // A free variable on the supertype side widens to accept every lower
    // bound it's asked for, rather than collapsing to the first one seen —
    // this is what lets `match s of "pending" -> .. | "done" -> ..` build up
    // the literal union scenario-5 style, instead of the second arm
    // clobbering the first.
    if let Type::Var(v) = &sup {
        if matches!(sub, Type::Var(_)) {
            return unify(&sub, &sup, s, aliases, vgen, span);
        }
        let widened = match s.get(v.id) {
            Some(existing) => Type::union(vec![existing.clone(), sub.clone()]),
            None => sub.clone(),
        };
        return Ok(Substitution::compose(&Substitution::singleton(v.id, widened), s));
    }
    if matches!(sub, Type::Var(_)) {
        return unify(&sub, &sup, s, aliases, vgen, span);
    }

    match (&sub, &sup) {
        // A string literal is always a subtype of `String` (§3: literal
        // types are "the atom of discriminated unions").
        (Type::Literal(_), Type::Primitive(Primitive::String)) => Ok(s.clone()),
        (Type::Record(sub_rec), Type::Record(sup_rec)) => {
            let mut acc = s.clone();
            for (name, sup_ty) in &sup_rec.fields {
                let sub_ty = sub_rec.fields.get(name).ok_or_else(|| TypeError::FieldMissing {
                    field: name.clone(),
                    record: Box::new(sub.clone()),
                    span,
                })?;
                acc = unify(sub_ty, sup_ty, &acc, aliases, vgen, span)?;
            }
            Ok(acc)
        }
        (Type::Function(sub_dom, sub_cod), Type::Function(sup_dom, sup_cod)) => {
            let s1 = solve_subtyping(sup_dom, sub_dom, s, aliases, vgen, span)?;
            solve_subtyping(sub_cod, sup_cod, &s1, aliases, vgen, span)
        }
        // §9 Open Question 1: a union subtype requires every alternative to
        // be a subtype of the supertype.
        (Type::Union(alts), _) => {
            let mut acc = s.clone();
            for alt in alts {
                acc = solve_subtyping(alt, &sup, &acc, aliases, vgen, span)?;
            }
            Ok(acc)
        }
        _ => unify(&sub, &sup, s, aliases, vgen, span),
    }
}

/// The fixed instance/type-class table (§4.6, §6): `Printable` accepts
/// every type, `Comparable` accepts only primitives. Unknown classes fail.
fn solve_instance(
    class: &str,
    ty: &Type,
    s: &Substitution,
    span: bendu_common::Span,
) -> Result<Substitution, TypeError> {
    let resolved = s.apply(ty);
    match class {
        "Printable" => Ok(s.clone()),
        "Comparable" => match resolved {
            Type::Primitive(_) => Ok(s.clone()),
            Type::Var(_) => Ok(s.clone()),
            other => Err(TypeError::Mismatch {
                expected: Box::new(Type::Primitive(Primitive::Int)),
                actual: Box::new(other),
                span,
            }),
        },
        other => Err(TypeError::UnknownTypeClass {
            name: other.to_string(),
            span,
        }),
    }
}
