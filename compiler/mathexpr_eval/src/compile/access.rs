//! Accessors and index evaluation.
//!
//! An index is always evaluated against the object it subscripts: `end`
//! inside dimension `i` is bound as an argument holding the size of that
//! object's dimension `i`, so `a[end]` and `a.b[end - 1]` each refer to
//! their own receiver.

use std::rc::Rc;

use mathexpr_ir::{AccessorNode, IndexNode};
use mathexpr_value::{
    get_property, size, subset, Args, EvalError, EvalResult, IndexValue, Namespace, ScopeRef,
    Value,
};

use super::{compile, compile_link, evaluator, ArgNames, Evaluator};
use crate::context::EvalContext;

/// A compiled index: evaluates the dimensions against the indexed object.
pub(super) type IndexEvaluator =
    Rc<dyn Fn(&ScopeRef, &Args, &Value, &mut EvalContext) -> EvalResult<IndexValue>>;

fn index_evaluator(
    f: impl Fn(&ScopeRef, &Args, &Value, &mut EvalContext) -> EvalResult<IndexValue> + 'static,
) -> IndexEvaluator {
    Rc::new(f)
}

pub(super) fn compile_index(
    index: &IndexNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<IndexEvaluator> {
    if let Some(key) = index.object_property() {
        let key = IndexValue::property(key);
        return Ok(index_evaluator(move |_, _, _, _| Ok(key.clone())));
    }

    let mut with_end = arg_names.clone();
    with_end.insert("end".to_owned());
    let dims = index
        .dimensions()
        .iter()
        .map(|dim| {
            let needs_end = dim.references_end();
            let names = if needs_end { &with_end } else { arg_names };
            Ok((compile(dim, namespace, names)?, needs_end))
        })
        .collect::<EvalResult<Vec<(Evaluator, bool)>>>()?;

    Ok(index_evaluator(move |scope, args, object, ctx| {
        let sizes = size(object);
        let values = dims
            .iter()
            .enumerate()
            .map(|(i, (dim, needs_end))| {
                if !needs_end {
                    return dim(scope, args, ctx);
                }
                let end = sizes.get(i).copied().unwrap_or(0);
                let mut dim_args = args.clone();
                dim_args.insert("end".to_owned(), Value::Number(end as f64));
                dim(scope, &dim_args, ctx)
            })
            .collect::<EvalResult<Vec<_>>>()?;
        IndexValue::from_one_based(&values)
    }))
}

/// Evaluate the receiver of a chain link.
///
/// `None` means the chain is short-circuited: either an earlier optional
/// link already met a nullish receiver, or this link is optional and its
/// receiver is nullish.
pub(super) fn receiver(
    object: &Evaluator,
    optional: bool,
    scope: &ScopeRef,
    args: &Args,
    ctx: &mut EvalContext,
) -> EvalResult<Option<Value>> {
    let value = object(scope, args, ctx)?;
    if ctx.is_short_circuited() {
        return Ok(None);
    }
    if optional && value.is_nullish() {
        ctx.short_circuit();
        return Ok(None);
    }
    Ok(Some(value))
}

pub(super) fn index_of(accessor: &AccessorNode) -> EvalResult<&IndexNode> {
    accessor
        .index()
        .ok_or_else(|| EvalError::new("AccessorNode index must be an IndexNode"))
}

pub(super) fn compile_accessor(
    accessor: &AccessorNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let object = compile_link(accessor.object(), namespace, arg_names)?;
    let optional = accessor.optional_chaining();
    let index = index_of(accessor)?;

    if let Some(key) = index.object_property() {
        let key: Rc<str> = key.into();
        return Ok(evaluator(move |scope, args, ctx| {
            match receiver(&object, optional, scope, args, ctx)? {
                Some(object) => get_property(&object, &key),
                None => Ok(Value::Undefined),
            }
        }));
    }

    let index = compile_index(index, namespace, arg_names)?;
    Ok(evaluator(move |scope, args, ctx| {
        let Some(object) = receiver(&object, optional, scope, args, ctx)? else {
            return Ok(Value::Undefined);
        };
        let index = index(scope, args, &object, ctx)?;
        subset(&object, &index)
    }))
}
