//! Variable scopes.
//!
//! Compiled expressions read and write variables through a [`ScopeRef`], a
//! shared single-threaded handle to any [`Scope`] implementation. The
//! evaluator never holds a borrow across a nested evaluation, so a function
//! body may freely read and write the scope it was defined in.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// Bound function parameters, keyed by parameter name.
pub type Args = FxHashMap<String, Value>;

/// Shared handle to a scope.
pub type ScopeRef = Rc<RefCell<dyn Scope>>;

/// A mutable mapping from variable names to values.
pub trait Scope {
    fn get(&self, name: &str) -> Option<Value>;

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or overwrite. Last write wins.
    fn set(&mut self, name: &str, value: Value);

    /// Names currently bound, sorted.
    fn keys(&self) -> Vec<String>;
}

/// A plain map scope.
#[derive(Clone, Debug, Default)]
pub struct MapScope {
    vars: FxHashMap<String, Value>,
}

impl MapScope {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn into_ref(self) -> ScopeRef {
        Rc::new(RefCell::new(self))
    }
}

impl Scope for MapScope {
    fn get(&self, name: &str) -> Option<Value> {
        self.vars.get(name).cloned()
    }

    fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_owned(), value);
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.vars.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for MapScope {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        MapScope {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Argument bindings layered over a parent scope.
///
/// Reads of a name bound in the overlay are served from it; every other
/// read goes to the parent. Writes always go to the parent, so the overlay
/// is immutable for the lifetime of the sub-scope.
pub struct PartitionedScope {
    parent: ScopeRef,
    overlay: Args,
}

impl PartitionedScope {
    pub fn new(parent: ScopeRef, overlay: Args) -> Self {
        PartitionedScope { parent, overlay }
    }

    pub fn into_ref(self) -> ScopeRef {
        Rc::new(RefCell::new(self))
    }
}

impl Scope for PartitionedScope {
    fn get(&self, name: &str) -> Option<Value> {
        match self.overlay.get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.borrow().get(name),
        }
    }

    fn has(&self, name: &str) -> bool {
        self.overlay.contains_key(name) || self.parent.borrow().has(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.parent.borrow_mut().set(name, value);
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = self.parent.borrow().keys();
        keys.extend(self.overlay.keys().cloned());
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}
