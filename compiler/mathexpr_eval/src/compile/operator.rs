//! Operator nodes.
//!
//! The operator's function is bound from the namespace once, at compile
//! time. Unary and binary operators get closures that pass their operands in
//! a fixed-size array; wider operators collect into a vector. Raw functions
//! (`and`, `or`) receive the operand nodes and decide what to evaluate.

use std::rc::Rc;

use mathexpr_ir::OperatorNode;
use mathexpr_stack::ensure_sufficient_stack;
use mathexpr_value::{EvalResult, Namespace, PartitionedScope};

use super::{compile_all, evaluator, namespace_function, ArgNames, Evaluator};

pub(super) fn compile(
    op: &OperatorNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let function = namespace_function(namespace, op.fn_name())?;

    if function.is_raw() {
        let nodes = op.args().to_vec();
        let namespace = Rc::clone(namespace);
        return Ok(evaluator(move |scope, args, _| {
            let sub_scope = PartitionedScope::new(Rc::clone(scope), args.clone()).into_ref();
            function.call_raw(&nodes, &namespace, &sub_scope)
        }));
    }

    let operands = compile_all(op.args(), namespace, arg_names)?;
    let compiled = match operands.as_slice() {
        [operand] => {
            let operand = Rc::clone(operand);
            evaluator(move |scope, args, ctx| {
                ensure_sufficient_stack(|| {
                    let value = operand(scope, args, ctx)?;
                    function.call(&[value])
                })
            })
        }
        [lhs, rhs] => {
            let (lhs, rhs) = (Rc::clone(lhs), Rc::clone(rhs));
            evaluator(move |scope, args, ctx| {
                ensure_sufficient_stack(|| {
                    let left = lhs(scope, args, ctx)?;
                    let right = rhs(scope, args, ctx)?;
                    function.call(&[left, right])
                })
            })
        }
        _ => evaluator(move |scope, args, ctx| {
            let values = operands
                .iter()
                .map(|operand| operand(scope, args, ctx))
                .collect::<EvalResult<Vec<_>>>()?;
            function.call(&values)
        }),
    };
    Ok(compiled)
}
