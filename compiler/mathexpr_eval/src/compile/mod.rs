//! Compilation of node trees into evaluator closures.
//!
//! [`compile`] walks a tree once and returns an [`Evaluator`]: a closure over
//! `(scope, args, context)`. Every strategy decision that depends only on the
//! tree shape, the namespace and the set of parameter names in effect is made
//! here, once; the closures only do the work that depends on run-time values.
//!
//! # Module Structure
//!
//! - `symbol.rs`: argument, namespace and unit lookups
//! - `operator.rs`: operators, with arity-specialized and raw paths
//! - `conditional.rs`: lazy `? :`
//! - `access.rs`: accessors, index evaluation, optional chaining
//! - `assignment.rs`: variable, property and subscript assignment
//! - `call.rs`: function calls and function definitions
//! - `collections.rs`: ranges, arrays, objects and blocks

mod access;
mod assignment;
mod call;
mod collections;
mod conditional;
mod operator;
mod symbol;

use std::rc::Rc;

use mathexpr_ir::{Literal, Node, NodeRef};
use mathexpr_stack::ensure_sufficient_stack;
use mathexpr_value::errors::not_callable;
use mathexpr_value::{Args, EvalError, EvalResult, Function, Namespace, ScopeRef, Value};
use rustc_hash::FxHashSet;

use crate::context::EvalContext;

/// A compiled node.
pub type Evaluator = Rc<dyn Fn(&ScopeRef, &Args, &mut EvalContext) -> EvalResult>;

/// Names bound as function parameters at a point in the tree.
pub type ArgNames = FxHashSet<String>;

/// Compile `node` against `namespace`, with `arg_names` read from the
/// argument map instead of the scope.
pub fn compile(
    node: &Node,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    ensure_sufficient_stack(|| match node {
        Node::Accessor(_) | Node::FunctionCall(_) => {
            let link = compile_link(node, namespace, arg_names)?;
            Ok(chain_root(link))
        }
        Node::Array(array) => collections::compile_array(array, namespace, arg_names),
        Node::Assignment(assignment) => {
            assignment::compile_assignment(assignment, namespace, arg_names)
        }
        Node::Block(block) => collections::compile_block(block, namespace, arg_names),
        Node::Conditional(conditional) => {
            conditional::compile_conditional(conditional, namespace, arg_names)
        }
        Node::Constant(constant) => Ok(constant_evaluator(literal_value(constant.value()))),
        Node::FunctionAssignment(definition) => {
            call::compile_definition(definition, namespace, arg_names)
        }
        Node::Index(_) => Err(EvalError::new(
            "IndexNode cannot be evaluated on its own; use it inside an accessor",
        )),
        Node::Object(object) => collections::compile_object(object, namespace, arg_names),
        Node::Operator(op) => operator::compile(op, namespace, arg_names),
        Node::Parenthesis(paren) => compile(paren.inner(), namespace, arg_names),
        Node::Range(range) => collections::compile_range(range, namespace, arg_names),
        Node::Symbol(symbol) => Ok(symbol::compile(symbol, namespace, arg_names)),
    })
}

/// Compile one link of an accessor/call chain without closing the chain.
///
/// The receiver of a link is compiled as a link too, so a short circuit on
/// an early optional link reaches every later link. Anything that is not an
/// accessor or call starts a new chain.
fn compile_link(
    node: &Node,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    ensure_sufficient_stack(|| match node {
        Node::Accessor(accessor) => access::compile_accessor(accessor, namespace, arg_names),
        Node::FunctionCall(call) => call::compile_call(call, namespace, arg_names),
        other => compile(other, namespace, arg_names),
    })
}

/// Close a chain: its short circuit does not escape to the surrounding
/// expression.
fn chain_root(link: Evaluator) -> Evaluator {
    evaluator(move |scope, args, ctx| {
        let saved = ctx.enter_chain();
        let result = link(scope, args, ctx);
        ctx.exit_chain(saved);
        result
    })
}

/// Box a closure as an [`Evaluator`].
pub(crate) fn evaluator(
    f: impl Fn(&ScopeRef, &Args, &mut EvalContext) -> EvalResult + 'static,
) -> Evaluator {
    Rc::new(f)
}

fn constant_evaluator(value: Value) -> Evaluator {
    evaluator(move |_, _, _| Ok(value.clone()))
}

pub(crate) fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::string(s.as_str()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
        Literal::Undefined => Value::Undefined,
    }
}

/// Compile and run a node against `scope` with no parameters in effect.
///
/// Raw functions use this to evaluate the argument nodes they receive.
pub(crate) fn evaluate_node(
    node: &Node,
    namespace: &Rc<Namespace>,
    scope: &ScopeRef,
) -> EvalResult {
    let compiled = compile(node, namespace, &ArgNames::default())?;
    compiled(scope, &Args::default(), &mut EvalContext::new())
}

/// Compile every node of a list, in order.
fn compile_all(
    nodes: &[NodeRef],
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Vec<Evaluator>> {
    nodes
        .iter()
        .map(|node| compile(node, namespace, arg_names))
        .collect()
}

/// Resolve a namespace function that a node is bound to at compile time.
///
/// A missing binding and a forbidden one fail differently.
fn namespace_function(namespace: &Namespace, name: &str) -> EvalResult<Function> {
    match namespace.resolve_function(name)? {
        Value::Function(function) => Ok(function.clone()),
        other => Err(not_callable(name, other)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
