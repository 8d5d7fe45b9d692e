use std::rc::Rc;

use mathexpr_ir::ConditionalNode;
use mathexpr_value::{EvalResult, Namespace};

use super::{compile, evaluator, ArgNames, Evaluator};

/// `condition ? a : b`. All three parts are compiled up front; each run
/// evaluates the condition and exactly one branch.
pub(super) fn compile_conditional(
    node: &ConditionalNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let condition = compile(node.condition(), namespace, arg_names)?;
    let true_expr = compile(node.true_expr(), namespace, arg_names)?;
    let false_expr = compile(node.false_expr(), namespace, arg_names)?;
    Ok(evaluator(move |scope, args, ctx| {
        if condition(scope, args, ctx)?.truthy()? {
            true_expr(scope, args, ctx)
        } else {
            false_expr(scope, args, ctx)
        }
    }))
}
