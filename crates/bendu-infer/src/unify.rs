//! Unification (§4.3): decides equality of two types modulo substitution,
//! extends record rows symmetrically, enforces the occurs check.

use crate::alias::AliasRegistry;
use crate::error::TypeError;
use crate::subst::Substitution;
use crate::types::{structural_eq, Level, RecordType, Type, VarGen};
use bendu_common::limits::MAX_UNIFY_DEPTH;
use bendu_common::Span;
use indexmap::IndexMap;

/// `unify(t1, t2, s)`: returns an extended substitution `s'` such that
/// `s'.apply(t1) ≡ s'.apply(t2)`, or a structured failure naming the
/// conflicting subterms (§4.3).
pub fn unify(
    t1: &Type,
    t2: &Type,
    s: &Substitution,
    aliases: &AliasRegistry,
    vgen: &VarGen,
    span: Span,
) -> Result<Substitution, TypeError> {
    unify_depth(t1, t2, s, aliases, vgen, span, 0)
}

fn unify_depth(
    t1: &Type,
    t2: &Type,
    s: &Substitution,
    aliases: &AliasRegistry,
    vgen: &VarGen,
    span: Span,
    depth: u32,
) -> Result<Substitution, TypeError> {
    if depth > MAX_UNIFY_DEPTH {
        return Err(TypeError::OccursCheck {
            var: Box::new(t1.clone()),
            infinite: Box::new(t2.clone()),
            span,
        });
    }
    // §5 notes the engine is recursion-heavy on deeply nested types; guard
    // the native stack against deep type graphs.
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        unify_step(t1, t2, s, aliases, vgen, span, depth)
    })
}

fn unify_step(
    t1: &Type,
    t2: &Type,
    s: &Substitution,
    aliases: &AliasRegistry,
    vgen: &VarGen,
    span: Span,
    depth: u32,
) -> Result<Substitution, TypeError> {
    // 1. Both pre-substituted.
    let a = s.apply(t1);
    let b = s.apply(t2);

    // 2. Structurally equivalent.
    if structural_eq(&a, &b) {
        return Ok(s.clone());
    }

    // 3. Variable vs anything.
    if let Type::Var(v) = &a {
        return bind_var(*v, &b, s, span);
    }
    if let Type::Var(v) = &b {
        return bind_var(*v, &a, s, span);
    }

    match (&a, &b) {
        // 4/5. Primitive/literal equality already handled by the
        // structural-equivalence fast path above; reaching here with two
        // primitives or two literals means they differ.
        (Type::Primitive(_), Type::Primitive(_)) | (Type::Literal(_), Type::Literal(_)) => {
            Err(TypeError::Mismatch {
                expected: Box::new(a),
                actual: Box::new(b),
                span,
            })
        }
        // 6. Function vs Function.
        (Type::Function(d1, c1), Type::Function(d2, c2)) => {
            let s1 = unify_depth(d1, d2, s, aliases, vgen, span, depth + 1)?;
            unify_depth(c1, c2, &s1, aliases, vgen, span, depth + 1)
        }
        // 7. Tuple vs Tuple.
        (Type::Tuple(e1), Type::Tuple(e2)) => {
            if e1.len() != e2.len() {
                return Err(TypeError::Mismatch {
                    expected: Box::new(a.clone()),
                    actual: Box::new(b.clone()),
                    span,
                });
            }
            let mut acc = s.clone();
            for (x, y) in e1.iter().zip(e2) {
                acc = unify_depth(x, y, &acc, aliases, vgen, span, depth + 1)?;
            }
            Ok(acc)
        }
        // 8. Record vs Record.
        (Type::Record(r1), Type::Record(r2)) => unify_records(r1, r2, s, aliases, vgen, span, depth),
        // 9. Union vs Union.
        (Type::Union(m1), Type::Union(m2)) => unify_sets(m1, m2, s, aliases, vgen, span, &a, &b),
        (Type::Intersection(m1), Type::Intersection(m2)) => {
            unify_sets(m1, m2, s, aliases, vgen, span, &a, &b)
        }
        // 10. Alias vs anything.
        (Type::Alias(alias_ref), _) => {
            let expanded = aliases.expand(&alias_ref.name, &alias_ref.args)?;
            unify_depth(&expanded, &b, s, aliases, vgen, span, depth + 1)
        }
        (_, Type::Alias(alias_ref)) => {
            let expanded = aliases.expand(&alias_ref.name, &alias_ref.args)?;
            unify_depth(&a, &expanded, s, aliases, vgen, span, depth + 1)
        }
        // 11. Otherwise.
        _ => Err(TypeError::Mismatch {
            expected: Box::new(a),
            actual: Box::new(b),
            span,
        }),
    }
}

fn bind_var(v: crate::types::TypeVar, other: &Type, s: &Substitution, span: Span) -> Result<Substitution, TypeError> {
    if let Type::Var(w) = other
        && w.id == v.id
    {
        return Ok(s.clone());
    }
    if other.occurs(v.id) {
        return Err(TypeError::OccursCheck {
            var: Box::new(Type::Var(v)),
            infinite: Box::new(other.clone()),
            span,
        });
    }
    Ok(Substitution::compose(&Substitution::singleton(v.id, other.clone()), s))
}

/// Attempt a matching that pairs every alternative on each side with a
/// compatible alternative on the other (§4.3 rule 9). Discriminated unions
/// (all-literal alternatives) compare as sets, so structural equivalence of
/// the whole set is tried first; a per-alternative unification fallback
/// handles unions that also carry type variables.
fn unify_sets(
    m1: &[Type],
    m2: &[Type],
    s: &Substitution,
    aliases: &AliasRegistry,
    vgen: &VarGen,
    span: Span,
    whole_a: &Type,
    whole_b: &Type,
) -> Result<Substitution, TypeError> {
    if m1.len() != m2.len() {
        return Err(TypeError::Mismatch {
            expected: Box::new(whole_a.clone()),
            actual: Box::new(whole_b.clone()),
            span,
        });
    }
    let mut remaining: Vec<&Type> = m2.iter().collect();
    let mut acc = s.clone();
    for left in m1 {
        let mut matched_at = None;
        for (i, right) in remaining.iter().enumerate() {
            if let Ok(next) = unify_depth(left, right, &acc, aliases, vgen, span, 0) {
                acc = next;
                matched_at = Some(i);
                break;
            }
        }
        match matched_at {
            Some(i) => {
                remaining.remove(i);
            }
            None => {
                return Err(TypeError::Mismatch {
                    expected: Box::new(whole_a.clone()),
                    actual: Box::new(whole_b.clone()),
                    span,
                })
            }
        }
    }
    Ok(acc)
}

/// Row unification (§4.3 "Row unification is the subtle part").
fn unify_records(
    r1: &RecordType,
    r2: &RecordType,
    s: &Substitution,
    aliases: &AliasRegistry,
    vgen: &VarGen,
    span: Span,
    depth: u32,
) -> Result<Substitution, TypeError> {
    let mut acc = s.clone();
    let mut l_only = IndexMap::new();
    let mut r_only = IndexMap::new();

    for (name, lty) in &r1.fields {
        match r2.fields.get(name) {
            Some(rty) => {
                acc = unify_depth(lty, rty, &acc, aliases, vgen, span, depth + 1).map_err(|_| {
                    TypeError::FieldTypeConflict {
                        field: name.clone(),
                        left: Box::new(lty.clone()),
                        right: Box::new(rty.clone()),
                        span,
                    }
                })?;
            }
            None => {
                l_only.insert(name.clone(), lty.clone());
            }
        }
    }
    for (name, rty) in &r2.fields {
        if !r1.fields.contains_key(name) {
            r_only.insert(name.clone(), rty.clone());
        }
    }

    match (r1.row, r2.row) {
        (None, None) => {
            if !l_only.is_empty() || !r_only.is_empty() {
                return Err(field_missing_error(&l_only, &r_only, r1, r2, span));
            }
            Ok(acc)
        }
        (None, Some(row_r)) => {
            if !r_only.is_empty() {
                return Err(field_missing_error(&l_only, &r_only, r1, r2, span));
            }
            // Left is closed: the right's row must resolve to exactly the
            // left-only fields, closing the row.
            let closing = Type::Record(RecordType::closed(l_only));
            unify_depth(&Type::Var(row_r), &closing, &acc, aliases, vgen, span, depth + 1)
        }
        (Some(row_l), None) => {
            if !l_only.is_empty() {
                return Err(field_missing_error(&l_only, &r_only, r1, r2, span));
            }
            let closing = Type::Record(RecordType::closed(r_only));
            unify_depth(&Type::Var(row_l), &closing, &acc, aliases, vgen, span, depth + 1)
        }
        (Some(row_l), Some(row_r)) => {
            // Both open: mint a fresh row variable, unify each side's row
            // with the other side's exclusive fields plus the fresh tail.
            let fresh = vgen.fresh(Level::TOP);
            let l_ext = Type::Record(RecordType::open(r_only, fresh));
            let r_ext = Type::Record(RecordType::open(l_only, fresh));
            acc = unify_depth(&Type::Var(row_l), &l_ext, &acc, aliases, vgen, span, depth + 1)?;
            unify_depth(&Type::Var(row_r), &r_ext, &acc, aliases, vgen, span, depth + 1)
        }
    }
}

fn field_missing_error(
    l_only: &IndexMap<String, Type>,
    r_only: &IndexMap<String, Type>,
    r1: &RecordType,
    r2: &RecordType,
    span: Span,
) -> TypeError {
    if let Some((field, _)) = r_only.iter().next() {
        return TypeError::FieldMissing {
            field: field.clone(),
            record: Box::new(Type::Record(r1.clone())),
            span,
        };
    }
    let (field, _) = l_only.iter().next().expect("at least one side has an exclusive field");
    TypeError::FieldMissing {
        field: field.clone(),
        record: Box::new(Type::Record(r2.clone())),
        span,
    }
}
