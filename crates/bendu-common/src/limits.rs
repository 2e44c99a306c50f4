//! Centralized limits and thresholds for the type-inference core.
//!
//! Collecting these in one module documents the rationale for each and
//! keeps `unify`/`solve`/the alias registry from drifting out of sync on
//! what "too deep" or "too large" means.

/// Maximum recursion depth for unification (occurs check, row extension,
/// alias expansion encountered mid-unify).
///
/// Pathological inputs (self-referential aliases that slip past the alias
/// registry's cycle check via an indirect argument, or deliberately
/// adversarial test fixtures) can otherwise overflow the stack before the
/// occurs check has a chance to reject them. `unify` guards its entry
/// point with this via `stacker::maybe_grow`.
pub const MAX_UNIFY_DEPTH: u32 = 512;

/// Maximum number of times the alias registry will expand a reference
/// while resolving `Type::AliasRef` during unification or normalization.
///
/// Distinct from cycle detection (§4.7): a chain of aliases
/// can be acyclic yet still be long enough to be effectively infinite for
/// a given query (e.g. a generated chain of a thousand single-use
/// aliases). Exceeding this is `TypeError::AliasExpansionTooDeep`, not
/// `TypeError::AliasCycle`.
pub const MAX_ALIAS_EXPANSION_DEPTH: u32 = 256;

/// Maximum number of constraints the solver will process for a single
/// top-level inference before giving up (enforced at `solve::solve`'s entry
/// point). Guards against runaway constraint generation on deeply nested
/// expressions; this is generous enough that no test in this crate
/// approaches it.
pub const MAX_SOLVER_CONSTRAINTS: usize = 100_000;

/// Initial capacity hint for a record's field map, used by the generator
/// when building a record literal's field map from scratch. Most records in
/// practice have a handful of fields; this avoids repeated small
/// reallocations without over-allocating for the common case.
pub const RECORD_FIELD_CAPACITY_HINT: usize = 8;
