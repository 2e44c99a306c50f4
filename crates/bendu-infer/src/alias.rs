//! The alias registry (§4.7): stores named parameterized type schemes,
//! expands them on demand, and rejects cyclic definitions.

use crate::error::TypeError;
use crate::subst::Substitution;
use crate::types::{Type, VarId};
use bendu_common::limits::MAX_ALIAS_EXPANSION_DEPTH;
use rustc_hash::{FxHashMap, FxHashSet};

struct AliasDef {
    params: Vec<VarId>,
    body: Type,
}

/// A mutable, append-mostly mapping from alias name to its definition
/// (§5: "used in an append-mostly fashion with cycle checking before
/// commit"). Aliases are stored and referenced by *name*, never by
/// pointer identity, so a recursive alias never forms a value-level cycle
/// in the type AST (design note "Cyclic references").
#[derive(Default)]
pub struct AliasRegistry {
    defs: FxHashMap<String, AliasDef>,
}

impl AliasRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Define `name[params...] = body`. Rejects a name already bound and
    /// rejects a reference graph that cycles back to `name` without
    /// passing through a structural constructor (function, record, tuple —
    /// these are lazy under expansion and break the cycle).
    pub fn define(&mut self, name: String, params: Vec<VarId>, body: Type) -> Result<(), TypeError> {
        if self.defs.contains_key(&name) {
            return Err(TypeError::AliasAlreadyDefined { name });
        }
        if let Some(via) = self.find_cycle(&name, &body) {
            return Err(TypeError::AliasCycle { name, via });
        }
        self.defs.insert(name, AliasDef { params, body });
        Ok(())
    }

    /// DFS from `root`'s body for an unguarded path back to `root`.
    /// Returns the name of the alias at which the cycle was detected.
    fn find_cycle(&self, root: &str, body: &Type) -> Option<String> {
        let mut visiting = FxHashSet::default();
        visiting.insert(root.to_string());
        self.search_cycle(root, body, &mut visiting)
    }

    fn search_cycle(&self, root: &str, ty: &Type, visiting: &mut FxHashSet<String>) -> Option<String> {
        match ty {
            // Structural constructors are lazy under expansion: a
            // recursive reference under one of these (e.g.
            // `List[T] = { head: T, tail: List[T] }`) does not need its
            // tail eagerly expanded, so it cannot loop the registry.
            Type::Function(..) | Type::Record(_) | Type::Tuple(_) => None,
            Type::Union(members) | Type::Intersection(members) => members
                .iter()
                .find_map(|m| self.search_cycle(root, m, visiting)),
            Type::Alias(alias_ref) => {
                if alias_ref.name == root {
                    return Some(alias_ref.name.clone());
                }
                if !visiting.insert(alias_ref.name.clone()) {
                    return None;
                }
                let result = match self.defs.get(&alias_ref.name) {
                    Some(def) => self.search_cycle(root, &def.body, visiting),
                    None => None,
                };
                visiting.remove(&alias_ref.name);
                result
            }
            Type::Var(_) | Type::Primitive(_) | Type::Literal(_) => None,
        }
    }

    /// Expand `name[args...]` one level. Arity mismatch is treated the
    /// same as an undefined alias (§4.7): both are reported as
    /// `AliasArityMismatch`/undefined by the caller.
    pub fn expand(&self, name: &str, args: &[Type]) -> Result<Type, TypeError> {
        let def = self.defs.get(name).ok_or_else(|| TypeError::AliasArityMismatch {
            name: name.to_string(),
            expected: 0,
            actual: args.len(),
        })?;
        if def.params.len() != args.len() {
            return Err(TypeError::AliasArityMismatch {
                name: name.to_string(),
                expected: def.params.len(),
                actual: args.len(),
            });
        }
        let mut subst = Substitution::empty();
        for (param, arg) in def.params.iter().zip(args) {
            subst.insert(*param, arg.clone());
        }
        Ok(subst.apply(&def.body))
    }

    /// Exhaustively expand all aliases in `ty`, for final printing (§4.7).
    /// Guarded by `MAX_ALIAS_EXPANSION_DEPTH` against acyclic-but-huge
    /// alias chains.
    pub fn normalize(&self, ty: &Type) -> Result<Type, TypeError> {
        self.normalize_depth(ty, 0)
    }

    fn normalize_depth(&self, ty: &Type, depth: u32) -> Result<Type, TypeError> {
        if depth > MAX_ALIAS_EXPANSION_DEPTH {
            let name = match ty {
                Type::Alias(a) => a.name.clone(),
                _ => "<type>".to_string(),
            };
            return Err(TypeError::AliasExpansionTooDeep { name });
        }
        match ty {
            Type::Alias(alias_ref) => {
                let args = alias_ref
                    .args
                    .iter()
                    .map(|a| self.normalize_depth(a, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                let expanded = self.expand(&alias_ref.name, &args)?;
                self.normalize_depth(&expanded, depth + 1)
            }
            Type::Function(dom, cod) => Ok(Type::function(
                self.normalize_depth(dom, depth + 1)?,
                self.normalize_depth(cod, depth + 1)?,
            )),
            Type::Tuple(elems) => Ok(Type::Tuple(
                elems
                    .iter()
                    .map(|t| self.normalize_depth(t, depth + 1))
                    .collect::<Result<_, _>>()?,
            )),
            Type::Record(rec) => {
                let mut fields = indexmap::IndexMap::with_capacity(rec.fields.len());
                for (name, field_ty) in &rec.fields {
                    fields.insert(name.clone(), self.normalize_depth(field_ty, depth + 1)?);
                }
                Ok(match rec.row {
                    None => Type::Record(crate::types::RecordType::closed(fields)),
                    Some(row) => Type::Record(crate::types::RecordType::open(fields, row)),
                })
            }
            Type::Union(members) => Ok(Type::union(
                members
                    .iter()
                    .map(|t| self.normalize_depth(t, depth + 1))
                    .collect::<Result<_, _>>()?,
            )),
            Type::Intersection(members) => Ok(Type::intersection(
                members
                    .iter()
                    .map(|t| self.normalize_depth(t, depth + 1))
                    .collect::<Result<_, _>>()?,
            )),
            Type::Var(_) | Type::Primitive(_) | Type::Literal(_) => Ok(ty.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AliasRef, Level, Primitive, RecordType, VarGen};

    #[test]
    fn direct_cycle_is_rejected() {
        let mut reg = AliasRegistry::new();
        reg.define(
            "A".to_string(),
            vec![],
            Type::Alias(AliasRef {
                name: "B".to_string(),
                args: vec![],
            }),
        )
        .unwrap();
        let err = reg.define(
            "B".to_string(),
            vec![],
            Type::Alias(AliasRef {
                name: "A".to_string(),
                args: vec![],
            }),
        );
        assert!(matches!(err, Err(TypeError::AliasCycle { .. })));
    }

    #[test]
    fn recursive_alias_under_record_is_accepted() {
        let vgen = VarGen::new();
        let t = vgen.fresh(Level::TOP);
        let mut fields = indexmap::IndexMap::new();
        fields.insert("head".to_string(), Type::Var(t));
        fields.insert(
            "tail".to_string(),
            Type::Alias(AliasRef {
                name: "List".to_string(),
                args: vec![Type::Var(t)],
            }),
        );
        let mut reg = AliasRegistry::new();
        reg.define("List".to_string(), vec![t.id], Type::Record(RecordType::closed(fields)))
            .unwrap();
        assert!(reg.is_defined("List"));
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let mut reg = AliasRegistry::new();
        reg.define("Id".to_string(), vec![VarId(0)], Type::Primitive(Primitive::Int))
            .unwrap();
        let err = reg.expand("Id", &[]);
        assert!(matches!(err, Err(TypeError::AliasArityMismatch { .. })));
    }
}
