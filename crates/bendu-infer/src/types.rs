//! The type algebra (§3, §4.1): primitives, literals, type
//! variables, functions, tuples, structural records with row polymorphism,
//! unions, intersections, and lazy alias references.

use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU32, Ordering};

/// A monotonically unique type-variable identity. Two variables are equal
/// iff their ids match — the generalization level is metadata, not
/// identity (invariant 6 of §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// The let-nesting depth at which a variable was minted. Used by
/// generalization to decide which variables are safe to quantify (see
/// `env::generalize` and the "Generalization boundaries" design note).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Level(pub u32);

impl Level {
    pub const TOP: Level = Level(0);

    #[must_use]
    pub fn deeper(self) -> Level {
        Level(self.0 + 1)
    }
}

/// A type variable: identity (`id`) plus the level it was minted at.
/// `PartialEq`/`Eq`/`Hash` only consider `id`, matching "two variables are
/// equal iff their ids match".
#[derive(Clone, Copy, Debug)]
pub struct TypeVar {
    pub id: VarId,
    pub level: Level,
}

impl PartialEq for TypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for TypeVar {}
impl std::hash::Hash for TypeVar {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Process-wide (or per-run, if seeded) monotone fresh-variable counter.
///
/// §4.1: "Fresh variable minting is a process-wide monotone counter... it
/// also accepts an explicit level." §5: "the only cross-thread resource is
/// the fresh-variable counter, which must be atomic... to preserve the
/// global-uniqueness invariant." A single `VarGen` can safely be shared
/// (by reference) across threads doing independent elaboration, since each
/// call to `fresh` is a single atomic fetch-add.
#[derive(Debug)]
pub struct VarGen {
    next: AtomicU32,
}

impl VarGen {
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(0)
    }

    /// Start counting from `seed`. §6: "fresh-id seed — optional, for
    /// reproducible tests."
    #[must_use]
    pub fn seeded(seed: u32) -> Self {
        Self {
            next: AtomicU32::new(seed),
        }
    }

    #[must_use]
    pub fn fresh(&self, level: Level) -> TypeVar {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        TypeVar {
            id: VarId(id),
            level,
        }
    }

    #[must_use]
    pub fn fresh_type(&self, level: Level) -> Type {
        Type::Var(self.fresh(level))
    }
}

impl Default for VarGen {
    fn default() -> Self {
        Self::new()
    }
}

/// The primitive base types (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    String,
    Bool,
    Char,
    Unit,
}

impl Primitive {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Int => "Int",
            Primitive::Float => "Float",
            Primitive::String => "String",
            Primitive::Bool => "Bool",
            Primitive::Char => "Char",
            Primitive::Unit => "Unit",
        }
    }
}

/// A field of a record type, with an optional row variable tail marking
/// the record as open (invariant 4: row variables only reside in the tail
/// position, never as a field's value).
#[derive(Clone, Debug)]
pub struct RecordType {
    /// Insertion order is not observable for equality (§3), but is kept
    /// here for stable, readable rendering of error messages.
    pub fields: indexmap::IndexMap<String, Type>,
    pub row: Option<TypeVar>,
}

impl RecordType {
    #[must_use]
    pub fn closed(fields: indexmap::IndexMap<String, Type>) -> Self {
        Self { fields, row: None }
    }

    #[must_use]
    pub fn open(fields: indexmap::IndexMap<String, Type>, row: TypeVar) -> Self {
        Self {
            fields,
            row: Some(row),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.row.is_some()
    }
}

/// A lazy indirection to a named, parameterized type alias. Resolved
/// through the `AliasRegistry` on demand (§4.7); applying a substitution
/// to an alias reference only rewrites its argument list, never forces
/// expansion (§4.2).
#[derive(Clone, Debug)]
pub struct AliasRef {
    pub name: String,
    pub args: Vec<Type>,
}

/// The type algebra itself (§3).
#[derive(Clone, Debug)]
pub enum Type {
    Primitive(Primitive),
    /// A string literal type, e.g. `"pending"` — the atom of discriminated
    /// unions.
    Literal(String),
    Var(TypeVar),
    Function(Box<Type>, Box<Type>),
    Tuple(Vec<Type>),
    Record(RecordType),
    /// Semantic identity is the *set* of alternatives, not construction
    /// order; always flattened and always has at least two members
    /// (invariant 3) — use `Type::union` to build one.
    Union(Vec<Type>),
    /// Same set semantics as `Union`; use `Type::intersection` to build one.
    Intersection(Vec<Type>),
    Alias(AliasRef),
}

impl Type {
    #[must_use]
    pub fn function(domain: Type, codomain: Type) -> Type {
        Type::Function(Box::new(domain), Box::new(codomain))
    }

    /// Build a union, flattening nested unions, deduplicating alternatives
    /// by structural equivalence, and collapsing a singleton to its one
    /// member (invariant 3).
    #[must_use]
    pub fn union(alts: Vec<Type>) -> Type {
        let mut flat = Vec::with_capacity(alts.len());
        for alt in alts {
            match alt {
                Type::Union(members) => flat.extend(members),
                other => flat.push(other),
            }
        }
        dedup_structural(&mut flat);
        match flat.len() {
            0 => Type::Union(Vec::new()),
            1 => flat.into_iter().next().unwrap(),
            _ => Type::Union(flat),
        }
    }

    /// Build an intersection with the same flatten/dedup/collapse
    /// treatment as `union`.
    #[must_use]
    pub fn intersection(members: Vec<Type>) -> Type {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Type::Intersection(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        dedup_structural(&mut flat);
        match flat.len() {
            0 => Type::Intersection(Vec::new()),
            1 => flat.into_iter().next().unwrap(),
            _ => Type::Intersection(flat),
        }
    }

    #[must_use]
    pub fn is_string_literal_union(&self) -> bool {
        match self {
            Type::Literal(_) => true,
            Type::Union(members) => members.iter().all(Type::is_string_literal_union),
            _ => false,
        }
    }

    /// Free type variables reachable by any path, including row variables
    /// held in record tails (§4.1, used by generalization and the occurs
    /// check).
    #[must_use]
    pub fn free_vars(&self) -> FxHashSet<VarId> {
        let mut set = FxHashSet::default();
        collect_free_vars(self, &mut set);
        set
    }

    /// Does `var` occur anywhere inside `self`? Used by the occurs check
    /// (§4.3) for both ordinary variables and row variables.
    #[must_use]
    pub fn occurs(&self, var: VarId) -> bool {
        match self {
            Type::Var(v) => v.id == var,
            Type::Function(dom, cod) => dom.occurs(var) || cod.occurs(var),
            Type::Tuple(elems) => elems.iter().any(|t| t.occurs(var)),
            Type::Record(rec) => {
                rec.fields.values().any(|t| t.occurs(var)) || rec.row.is_some_and(|r| r.id == var)
            }
            Type::Union(members) | Type::Intersection(members) => {
                members.iter().any(|t| t.occurs(var))
            }
            Type::Alias(alias) => alias.args.iter().any(|t| t.occurs(var)),
            Type::Primitive(_) | Type::Literal(_) => false,
        }
    }
}

fn collect_free_vars(ty: &Type, set: &mut FxHashSet<VarId>) {
    match ty {
        Type::Var(v) => {
            set.insert(v.id);
        }
        Type::Function(dom, cod) => {
            collect_free_vars(dom, set);
            collect_free_vars(cod, set);
        }
        Type::Tuple(elems) => elems.iter().for_each(|t| collect_free_vars(t, set)),
        Type::Record(rec) => {
            rec.fields.values().for_each(|t| collect_free_vars(t, set));
            if let Some(row) = rec.row {
                set.insert(row.id);
            }
        }
        Type::Union(members) | Type::Intersection(members) => {
            members.iter().for_each(|t| collect_free_vars(t, set));
        }
        Type::Alias(alias) => alias.args.iter().for_each(|t| collect_free_vars(t, set)),
        Type::Primitive(_) | Type::Literal(_) => {}
    }
}

fn dedup_structural(types: &mut Vec<Type>) {
    let mut kept: Vec<Type> = Vec::with_capacity(types.len());
    for ty in types.drain(..) {
        if !kept.iter().any(|k| structural_eq(k, &ty)) {
            kept.push(ty);
        }
    }
    *types = kept;
}

/// Structural equivalence (§4.1): variant-by-variant, element-wise; unions
/// and intersections compared as sets; records compared as field maps plus
/// row-variable identity; aliases compared by name and argument list.
/// This is the solver's fast pre-filter: `a ≡ b ⇒ unify(a, b)` succeeds
/// with an empty substitution.
#[must_use]
pub fn structural_eq(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Primitive(x), Type::Primitive(y)) => x == y,
        (Type::Literal(x), Type::Literal(y)) => x == y,
        (Type::Var(x), Type::Var(y)) => x.id == y.id,
        (Type::Function(d1, c1), Type::Function(d2, c2)) => {
            structural_eq(d1, d2) && structural_eq(c1, c2)
        }
        (Type::Tuple(e1), Type::Tuple(e2)) => {
            e1.len() == e2.len() && e1.iter().zip(e2).all(|(x, y)| structural_eq(x, y))
        }
        (Type::Record(r1), Type::Record(r2)) => {
            r1.row.map(|v| v.id) == r2.row.map(|v| v.id)
                && r1.fields.len() == r2.fields.len()
                && r1.fields.iter().all(|(name, ty)| {
                    r2.fields.get(name).is_some_and(|other| structural_eq(ty, other))
                })
        }
        (Type::Union(x), Type::Union(y)) | (Type::Intersection(x), Type::Intersection(y)) => {
            x.len() == y.len()
                && x.iter().all(|a| y.iter().any(|b| structural_eq(a, b)))
                && y.iter().all(|b| x.iter().any(|a| structural_eq(a, b)))
        }
        (Type::Alias(x), Type::Alias(y)) => {
            x.name == y.name
                && x.args.len() == y.args.len()
                && x.args.iter().zip(&y.args).all(|(a, b)| structural_eq(a, b))
        }
        _ => false,
    }
}
