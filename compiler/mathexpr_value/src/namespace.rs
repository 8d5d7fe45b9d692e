//! The built-in namespace.
//!
//! Holds the functions and constants every expression can reach, plus an
//! access policy: a forbidden name still resolves as present, but calling or
//! reading it fails with a distinct forbidden-access error.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{forbidden_access, undefined_function, EvalResult};
use crate::function::Function;
use crate::value::Value;

#[derive(Clone, Debug, Default)]
pub struct Namespace {
    entries: FxHashMap<String, Value>,
    forbidden: FxHashSet<String>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Register a function under its own name.
    pub fn insert_function(&mut self, function: Function) {
        self.entries
            .insert(function.name().to_owned(), Value::Function(function));
    }

    pub fn forbid(&mut self, name: impl Into<String>) {
        self.forbidden.insert(name.into());
    }

    pub fn allow(&mut self, name: &str) {
        self.forbidden.remove(name);
    }

    pub fn is_forbidden(&self, name: &str) -> bool {
        self.forbidden.contains(name)
    }

    /// Whether the name is bound, regardless of policy.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up a binding through the access policy.
    ///
    /// `Ok(None)` means the name is not bound at all.
    pub fn resolve(&self, name: &str) -> EvalResult<Option<&Value>> {
        match self.entries.get(name) {
            Some(_) if self.is_forbidden(name) => Err(forbidden_access(name)),
            found => Ok(found),
        }
    }

    /// Look up a binding that must exist.
    pub fn resolve_function(&self, name: &str) -> EvalResult<&Value> {
        self.resolve(name)?.ok_or_else(|| undefined_function(name))
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
