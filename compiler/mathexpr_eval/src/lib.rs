//! Mathexpr evaluation.
//!
//! Turns a parsed [`Node`] tree into a tree of evaluator closures once, then
//! runs the closures against any number of scopes. The standard namespace
//! binds every operator to a typed function by name, so `a + b` and
//! `add(a, b)` are the same call.
//!
//! ```text
//! source ──parse──▶ Node ──compile──▶ Evaluator ──(scope)──▶ Value
//! ```
//!
//! # Module Structure
//!
//! - [`compile`]: the node compiler and the evaluator closure type
//! - `builtins`: the standard namespace
//! - `engine`: [`Engine`], its builder and [`CompiledExpression`]
//! - `config`: [`Config`] and its JSON loading
//! - `context`: the per-evaluation optional-chaining state
//!
//! The free functions at the crate root share one default engine per
//! thread.

pub mod compile;

mod builtins;
mod config;
mod context;
mod engine;

use std::sync::Once;

pub use builtins::standard_namespace;
pub use config::{Config, ConfigError};
pub use context::EvalContext;
pub use engine::{CompiledExpression, Engine, EngineBuilder};

pub use mathexpr_ir::Node;
pub use mathexpr_value::{
    EvalError, EvalErrorKind, EvalResult, Function, MapScope, Namespace, Scope, ScopeRef,
    TypedFunction, Value,
};

thread_local! {
    static DEFAULT_ENGINE: Engine = Engine::new();
}

/// Evaluate one expression against a fresh scope with the default engine.
pub fn evaluate(source: &str) -> EvalResult {
    DEFAULT_ENGINE.with(|engine| engine.evaluate(source))
}

/// Evaluate one expression against `scope` with the default engine.
pub fn evaluate_with(source: &str, scope: &ScopeRef) -> EvalResult {
    DEFAULT_ENGINE.with(|engine| engine.evaluate_with(source, scope))
}

/// Evaluate expressions in order against one shared scope.
pub fn evaluate_all<S: AsRef<str>>(sources: &[S], scope: &ScopeRef) -> EvalResult<Vec<Value>> {
    DEFAULT_ENGINE.with(|engine| engine.evaluate_all(sources, scope))
}

pub fn parse(source: &str) -> EvalResult<Node> {
    DEFAULT_ENGINE.with(|engine| engine.parse(source))
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// ```bash
/// RUST_LOG=mathexpr_eval=debug my-app
/// RUST_LOG=mathexpr_eval::compile=trace my-app
/// ```
///
/// Safe to call more than once; later calls do nothing. A subscriber the
/// host already installed is left in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}
