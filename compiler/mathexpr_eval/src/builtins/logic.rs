//! Logical operators.
//!
//! `and` and `or` are raw: they receive their operand nodes and evaluate
//! the right one only when the left one does not decide the result.

use std::rc::Rc;

use mathexpr_ir::NodeRef;
use mathexpr_value::errors::arity_mismatch;
use mathexpr_value::{EvalResult, Function, Namespace, ScopeRef};

use super::helpers::{elementwise_binary, elementwise_unary};
use crate::compile::evaluate_node;

/// Value kinds with a truth value.
const TRUTHY: &str = "number|boolean|string|BigNumber|Complex|Fraction|Unit|null|undefined";

pub(super) fn register(namespace: &mut Namespace) {
    namespace.insert_function(Function::raw("and", |nodes, namespace, scope| {
        short_circuit("and", false, nodes, namespace, scope)
    }));
    namespace.insert_function(Function::raw("or", |nodes, namespace, scope| {
        short_circuit("or", true, nodes, namespace, scope)
    }));
    namespace.insert_function(elementwise_unary("not", |f| {
        f.signature(TRUTHY, |args| Ok((!args[0].truthy()?).into()))
    }));
    namespace.insert_function(elementwise_binary("xor", |f| {
        f.signature(&format!("{TRUTHY}, {TRUTHY}"), |args| {
            Ok((args[0].truthy()? != args[1].truthy()?).into())
        })
    }));
}

/// Evaluate the left operand; when its truth value equals `decided_by`, that
/// is the result and the right operand is never evaluated.
fn short_circuit(
    name: &str,
    decided_by: bool,
    nodes: &[NodeRef],
    namespace: &Rc<Namespace>,
    scope: &ScopeRef,
) -> EvalResult {
    let [lhs, rhs] = nodes else {
        return Err(arity_mismatch(name, 2, nodes.len()));
    };
    let left = evaluate_node(lhs, namespace, scope)?.truthy()?;
    if left == decided_by {
        return Ok(left.into());
    }
    Ok(evaluate_node(rhs, namespace, scope)?.truthy()?.into())
}
