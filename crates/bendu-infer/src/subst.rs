//! Substitution (§4.2): an idempotent, finite mapping from variable ids to
//! types, with `apply` and `compose`.

use crate::types::{RecordType, Type, VarId};
use rustc_hash::FxHashMap;

/// A substitution is always maintained in idempotent form: inserting
/// `var -> ty` never leaves `var` free in `ty`'s image elsewhere in the
/// map, so a single top-down `apply` pass is enough (invariant 1 of §3;
/// "or, equivalently, maintained as an idempotent form" per §4.2).
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<VarId, Type>,
}

impl Substitution {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn singleton(var: VarId, ty: Type) -> Self {
        let mut map = FxHashMap::default();
        map.insert(var, ty);
        Self { map }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn get(&self, var: VarId) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn insert(&mut self, var: VarId, ty: Type) {
        self.map.insert(var, ty);
    }

    /// Rewrite `ty` by replacing mapped variables recursively. Applying a
    /// substitution to an alias reference only rewrites its argument list
    /// — it never forces expansion (§4.2).
    #[must_use]
    pub fn apply(&self, ty: &Type) -> Type {
        if self.map.is_empty() {
            return ty.clone();
        }
        match ty {
            Type::Var(v) => match self.map.get(&v.id) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            Type::Primitive(_) | Type::Literal(_) => ty.clone(),
            Type::Function(dom, cod) => {
                Type::Function(Box::new(self.apply(dom)), Box::new(self.apply(cod)))
            }
            Type::Tuple(elems) => Type::Tuple(elems.iter().map(|t| self.apply(t)).collect()),
            Type::Record(rec) => self.apply_record(rec),
            Type::Union(members) => Type::union(members.iter().map(|t| self.apply(t)).collect()),
            Type::Intersection(members) => {
                Type::intersection(members.iter().map(|t| self.apply(t)).collect())
            }
            Type::Alias(alias) => Type::Alias(crate::types::AliasRef {
                name: alias.name.clone(),
                args: alias.args.iter().map(|t| self.apply(t)).collect(),
            }),
        }
    }

    fn apply_record(&self, rec: &RecordType) -> Type {
        let mut fields = indexmap::IndexMap::with_capacity(rec.fields.len());
        for (name, ty) in &rec.fields {
            fields.insert(name.clone(), self.apply(ty));
        }
        match rec.row {
            None => Type::Record(RecordType::closed(fields)),
            Some(row) => match self.map.get(&row.id) {
                None => Type::Record(RecordType::open(fields, row)),
                Some(bound) => {
                    // The row resolved to a concrete type; merge its fields
                    // into ours (or re-open on another row variable).
                    merge_row_substitution(fields, self.apply(bound))
                }
            },
        }
    }

    /// `compose(s2, s1)`: apply `s1` first, then `s2`. First maps `s2.apply`
    /// over the codomain of `s1`, then adds `s2`'s mappings that are not
    /// already in `s1`'s domain (§4.2). Associative, not commutative.
    #[must_use]
    pub fn compose(s2: &Substitution, s1: &Substitution) -> Substitution {
        let mut map: FxHashMap<VarId, Type> = s1
            .map
            .iter()
            .map(|(var, ty)| (*var, s2.apply(ty)))
            .collect();
        for (var, ty) in &s2.map {
            map.entry(*var).or_insert_with(|| ty.clone());
        }
        Substitution { map }
    }
}

fn merge_row_substitution(mut fields: indexmap::IndexMap<String, Type>, resolved: Type) -> Type {
    match resolved {
        Type::Record(other) => {
            for (name, ty) in other.fields {
                fields.entry(name).or_insert(ty);
            }
            match other.row {
                None => Type::Record(RecordType::closed(fields)),
                Some(row) => Type::Record(RecordType::open(fields, row)),
            }
        }
        Type::Var(v) => Type::Record(RecordType::open(fields, v)),
        // A row variable may only ever resolve to another record or row
        // variable (invariant 4); anything else indicates a unification bug
        // upstream, so fall back to a closed record over what we have.
        _ => Type::Record(RecordType::closed(fields)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, Primitive, VarGen};

    #[test]
    fn apply_is_idempotent() {
        let vgen = VarGen::new();
        let a = vgen.fresh(Level::TOP);
        let s = Substitution::singleton(a.id, Type::Primitive(Primitive::Int));
        let ty = Type::Var(a);
        let once = s.apply(&ty);
        let twice = s.apply(&once);
        assert!(crate::types::structural_eq(&once, &twice));
    }

    #[test]
    fn compose_matches_sequential_application() {
        let vgen = VarGen::new();
        let a = vgen.fresh(Level::TOP);
        let b = vgen.fresh(Level::TOP);

        let s1 = Substitution::singleton(a.id, Type::Var(b));
        let s2 = Substitution::singleton(b.id, Type::Primitive(Primitive::String));

        let composed = Substitution::compose(&s2, &s1);
        let direct = s2.apply(&s1.apply(&Type::Var(a)));
        let via_compose = composed.apply(&Type::Var(a));
        assert!(crate::types::structural_eq(&direct, &via_compose));
    }
}
