//! The engine: a configured namespace plus the parse, compile and evaluate
//! entry points.

use std::rc::Rc;

use mathexpr_ir::Node;
use mathexpr_value::{EvalResult, Function, MapScope, Namespace, ScopeRef, Value};
use tracing::debug;

use crate::builtins::{parse_source, standard_namespace};
use crate::compile::{compile, ArgNames, Evaluator};
use crate::config::Config;
use crate::context::EvalContext;

/// Evaluates expressions against one namespace.
///
/// The namespace is built once and shared by every expression the engine
/// compiles. Variables live in the scope passed to each evaluation, so one
/// engine serves any number of independent scopes.
pub struct Engine {
    namespace: Rc<Namespace>,
    config: Config,
}

impl Engine {
    /// An engine with the default configuration.
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn namespace(&self) -> &Rc<Namespace> {
        &self.namespace
    }

    pub fn parse(&self, source: &str) -> EvalResult<Node> {
        parse_source(source)
    }

    /// Compile a tree once for repeated evaluation.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn compile(&self, node: &Node) -> EvalResult<CompiledExpression> {
        let evaluator = compile(node, &self.namespace, &ArgNames::default())?;
        Ok(CompiledExpression { evaluator })
    }

    /// Evaluate against a fresh, empty scope.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn evaluate(&self, source: &str) -> EvalResult {
        self.evaluate_with(source, &MapScope::new().into_ref())
    }

    #[tracing::instrument(level = "debug", skip(self, scope))]
    pub fn evaluate_with(&self, source: &str, scope: &ScopeRef) -> EvalResult {
        let node = self.parse(source)?;
        self.compile(&node)?.evaluate(scope)
    }

    /// Evaluate several expressions in order against one scope, so later
    /// expressions see earlier assignments. Stops at the first error.
    #[tracing::instrument(level = "debug", skip_all, fields(count = sources.len()))]
    pub fn evaluate_all<S: AsRef<str>>(
        &self,
        sources: &[S],
        scope: &ScopeRef,
    ) -> EvalResult<Vec<Value>> {
        sources
            .iter()
            .map(|source| self.evaluate_with(source.as_ref(), scope))
            .collect()
    }

    /// Render a tree with the configured parenthesis and implicit modes.
    pub fn format(&self, node: &Node) -> String {
        node.to_string_with(&self.config.render_options())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// A compiled tree, reusable across scopes.
#[derive(Clone)]
pub struct CompiledExpression {
    evaluator: Evaluator,
}

impl CompiledExpression {
    pub fn evaluate(&self, scope: &ScopeRef) -> EvalResult {
        (self.evaluator)(scope, &mathexpr_value::Args::default(), &mut EvalContext::new())
    }
}

/// Builder for [`Engine`].
///
/// Functions and constants added here are bound after the standard
/// namespace, so they replace built-ins of the same name. `allow` and
/// `forbid` apply after the configured forbidden list.
#[derive(Default)]
pub struct EngineBuilder {
    config: Config,
    functions: Vec<Function>,
    constants: Vec<(String, Value)>,
    allowed: Vec<String>,
    forbidden: Vec<String>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn allow(mut self, name: impl Into<String>) -> Self {
        self.allowed.push(name.into());
        self
    }

    #[must_use]
    pub fn forbid(mut self, name: impl Into<String>) -> Self {
        self.forbidden.push(name.into());
        self
    }

    pub fn build(self) -> Engine {
        let mut namespace = standard_namespace(&self.config);
        for function in self.functions {
            namespace.insert_function(function);
        }
        for (name, value) in self.constants {
            namespace.insert(name, value);
        }
        for name in &self.allowed {
            namespace.allow(name);
        }
        for name in self.forbidden {
            namespace.forbid(name);
        }
        debug!(names = namespace.names().len(), "built namespace");
        Engine {
            namespace: Rc::new(namespace),
            config: self.config,
        }
    }
}
