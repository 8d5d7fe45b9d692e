//! Functions over expressions themselves: `parse` and `evaluate`.
//!
//! Both are forbidden by the default configuration; an engine built with
//! `allow("parse")` or `allow("evaluate")` exposes them to expressions.

use mathexpr_ir::Node;
use mathexpr_parse::ParseError;
use mathexpr_value::errors::{arity_mismatch, syntax_error, type_error};
use mathexpr_value::{EvalError, EvalResult, Function, Namespace, TypedFunction, Value};

use super::helpers::unary;
use crate::compile::evaluate_node;

pub(super) fn register(namespace: &mut Namespace) {
    namespace.insert_function(Function::typed(
        TypedFunction::new("parse")
            .signature("string", unary(|source: String| parse_source(&source).map(Value::from))),
    ));
    namespace.insert_function(Function::raw("evaluate", |nodes, namespace, scope| {
        let [expression] = nodes else {
            return Err(arity_mismatch("evaluate", 1, nodes.len()));
        };
        let run = |source: &str| evaluate_node(&parse_source(source)?, namespace, scope);
        match evaluate_node(expression, namespace, scope)? {
            Value::String(source) => run(&source),
            Value::Array(sources) => sources
                .iter()
                .map(|source| match source {
                    Value::String(source) => run(source),
                    other => Err(type_error("a string", other.type_of())),
                })
                .collect::<EvalResult<Vec<_>>>()
                .map(Value::array),
            other => Err(type_error("a string or an Array of strings", other.type_of())),
        }
    }));
}

/// Parse expression text, reporting syntax errors as evaluation errors.
pub(crate) fn parse_source(source: &str) -> EvalResult<Node> {
    mathexpr_parse::parse(source).map_err(|err| from_parse_error(&err))
}

fn from_parse_error(err: &ParseError) -> EvalError {
    syntax_error(&err.message, err.position)
}
