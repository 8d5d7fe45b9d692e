use std::rc::Rc;

use indexmap::IndexMap;
use mathexpr_ir::{ArrayNode, BlockNode, ObjectNode, RangeNode};
use mathexpr_value::{EvalResult, Namespace, Value};

use super::{compile, compile_all, evaluator, namespace_function, ArgNames, Evaluator};

/// `start:end` and `start:step:end`, materialized by the namespace `range`.
pub(super) fn compile_range(
    range: &RangeNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let function = namespace_function(namespace, "range")?;
    let start = compile(range.start(), namespace, arg_names)?;
    let end = compile(range.end(), namespace, arg_names)?;
    let Some(step) = range.step() else {
        return Ok(evaluator(move |scope, args, ctx| {
            let start = start(scope, args, ctx)?;
            let end = end(scope, args, ctx)?;
            function.call(&[start, end])
        }));
    };
    let step = compile(step, namespace, arg_names)?;
    Ok(evaluator(move |scope, args, ctx| {
        let start = start(scope, args, ctx)?;
        let step = step(scope, args, ctx)?;
        let end = end(scope, args, ctx)?;
        function.call(&[start, end, step])
    }))
}

pub(super) fn compile_array(
    array: &ArrayNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let items = compile_all(array.items(), namespace, arg_names)?;
    Ok(evaluator(move |scope, args, ctx| {
        items
            .iter()
            .map(|item| item(scope, args, ctx))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::array)
    }))
}

pub(super) fn compile_object(
    object: &ObjectNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let properties = object
        .properties()
        .iter()
        .map(|(key, node)| Ok((key.clone(), compile(node, namespace, arg_names)?)))
        .collect::<EvalResult<Vec<(String, Evaluator)>>>()?;
    Ok(evaluator(move |scope, args, ctx| {
        let mut map = IndexMap::with_capacity(properties.len());
        for (key, property) in &properties {
            map.insert(key.clone(), property(scope, args, ctx)?);
        }
        Ok(Value::object(map))
    }))
}

/// Statements run in order; hidden ones (`;`-terminated) still run but are
/// left out of the result set.
pub(super) fn compile_block(
    block: &BlockNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let entries = block
        .blocks()
        .iter()
        .map(|entry| Ok((compile(&entry.node, namespace, arg_names)?, entry.visible)))
        .collect::<EvalResult<Vec<(Evaluator, bool)>>>()?;
    Ok(evaluator(move |scope, args, ctx| {
        let mut results = Vec::new();
        for (entry, visible) in &entries {
            let value = entry(scope, args, ctx)?;
            if *visible {
                results.push(value);
            }
        }
        Ok(Value::result_set(results))
    }))
}
