//! The type environment (§5, §4.4): a persistent scoping stack from names
//! to type schemes, plus generalization and instantiation.

use crate::types::{Level, Type, VarGen, VarId};
use rustc_hash::FxHashSet;
use std::rc::Rc;

/// A quantified type: the variables in `vars` are bound, everything else in
/// `ty` is free with respect to the scheme's defining scope.
#[derive(Clone, Debug)]
pub struct Scheme {
    pub vars: Vec<VarId>,
    pub ty: Type,
}

impl Scheme {
    /// A scheme with no quantified variables — an ordinary monotype,
    /// usable anywhere a scheme is expected without widening it.
    #[must_use]
    pub fn monomorphic(ty: Type) -> Self {
        Scheme { vars: Vec::new(), ty }
    }

    /// Mint a fresh variable for every quantified variable and substitute
    /// it throughout the scheme's type (§9 "Instantiation").
    #[must_use]
    pub fn instantiate(&self, vgen: &VarGen, level: Level) -> Type {
        if self.vars.is_empty() {
            return self.ty.clone();
        }
        let mut subst = crate::subst::Substitution::empty();
        for var in &self.vars {
            subst.insert(*var, vgen.fresh_type(level));
        }
        subst.apply(&self.ty)
    }
}

/// One link of the persistent scope chain. Older scopes are shared
/// structurally with newer ones (§5: "the environment is a persistent
/// stack"), so cloning an `Env` to descend into a nested scope is cheap.
struct Frame {
    name: String,
    scheme: Scheme,
    parent: Option<Rc<Frame>>,
}

#[derive(Clone, Default)]
pub struct Env {
    top: Option<Rc<Frame>>,
}

impl Env {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` in a new, innermost scope, without disturbing the scope
    /// this `Env` was cloned from.
    #[must_use]
    pub fn bind(&self, name: impl Into<String>, scheme: Scheme) -> Env {
        Env {
            top: Some(Rc::new(Frame {
                name: name.into(),
                scheme,
                parent: self.top.clone(),
            })),
        }
    }

    /// Convenience for binding a lambda parameter or similar monomorphic
    /// name — never generalized (§4.4: "lambda parameters are never
    /// generalized").
    #[must_use]
    pub fn bind_mono(&self, name: impl Into<String>, ty: Type) -> Env {
        self.bind(name, Scheme::monomorphic(ty))
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        let mut frame = self.top.as_deref();
        while let Some(f) = frame {
            if f.name == name {
                return Some(&f.scheme);
            }
            frame = f.parent.as_deref();
        }
        None
    }

    /// The union of free variables across every scheme's *free* part (not
    /// its quantified variables) currently in scope — `fv(Gamma)` in the
    /// generalization rule (§4.4, §9).
    #[must_use]
    pub fn free_vars(&self) -> FxHashSet<VarId> {
        let mut set = FxHashSet::default();
        let mut frame = self.top.as_deref();
        while let Some(f) = frame {
            for v in f.scheme.ty.free_vars() {
                if !f.scheme.vars.contains(&v) {
                    set.insert(v);
                }
            }
            frame = f.parent.as_deref();
        }
        set
    }
}

/// Quantify every free variable of `ty` that does not escape to `env`
/// (§4.4 "generalize": `fv(τ) − fv(Γ)`). Only non-recursive `let` bindings
/// and top-level declarations are generalization points.
#[must_use]
pub fn generalize(env: &Env, ty: &Type) -> Scheme {
    let env_vars = env.free_vars();
    let mut vars: Vec<VarId> = ty.free_vars().into_iter().filter(|v| !env_vars.contains(v)).collect();
    vars.sort_unstable();
    Scheme { vars, ty: ty.clone() }
}
