//! Function calls and user function definitions.
//!
//! The callee strategy is chosen from the callee's shape when the call is
//! compiled:
//!
//! - a name that is not a parameter is resolved from the scope, then the
//!   namespace, on every call so rebinding a built-in is observed;
//! - a parameter name reads the argument map;
//! - `obj.method(..)` reads the method off the evaluated receiver;
//! - anything else is evaluated and must produce a function.
//!
//! Whichever way the callee is found, a raw function receives the argument
//! nodes; everything else receives the evaluated arguments.

use std::rc::Rc;

use mathexpr_ir::{FunctionAssignmentNode, FunctionNode, IndexNode, Node, NodeRef};
use mathexpr_stack::ensure_sufficient_stack;
use mathexpr_value::errors::{arity_mismatch, not_callable, undefined_symbol};
use mathexpr_value::{
    get_property, Args, EvalError, EvalErrorKind, EvalResult, Function, Namespace,
    PartitionedScope, ScopeRef, Value,
};
use smallvec::SmallVec;
use tracing::debug;

use super::access::{index_of, receiver};
use super::{compile, compile_all, compile_link, evaluator, ArgNames, Evaluator};
use crate::context::EvalContext;

/// The arguments of one call site, in both forms a callee may need.
struct CallArgs {
    nodes: Vec<NodeRef>,
    /// Compile failures are kept until a non-raw callee needs the values, so
    /// a raw callee may accept syntax the evaluator would reject.
    compiled: Result<Vec<Evaluator>, EvalError>,
    namespace: Rc<Namespace>,
}

impl CallArgs {
    fn compile(
        nodes: &[NodeRef],
        namespace: &Rc<Namespace>,
        arg_names: &ArgNames,
        callee_is_raw: bool,
    ) -> EvalResult<Self> {
        let compiled = compile_all(nodes, namespace, arg_names);
        if let (Err(err), false) = (&compiled, callee_is_raw) {
            return Err(err.clone());
        }
        Ok(CallArgs {
            nodes: nodes.to_vec(),
            compiled,
            namespace: Rc::clone(namespace),
        })
    }

    fn apply(
        &self,
        function: &Function,
        scope: &ScopeRef,
        args: &Args,
        ctx: &mut EvalContext,
    ) -> EvalResult {
        if function.is_raw() {
            debug!(function = function.name(), "passing argument nodes to raw function");
            let sub_scope = PartitionedScope::new(Rc::clone(scope), args.clone()).into_ref();
            return function.call_raw(&self.nodes, &self.namespace, &sub_scope);
        }
        let compiled = self.compiled.as_ref().map_err(Clone::clone)?;
        ensure_sufficient_stack(|| match compiled.as_slice() {
            [] => function.call(&[]),
            [only] => {
                let value = only(scope, args, ctx)?;
                function.call(&[value])
            }
            [first, second] => {
                let first = first(scope, args, ctx)?;
                let second = second(scope, args, ctx)?;
                function.call(&[first, second])
            }
            many => {
                let values = many
                    .iter()
                    .map(|arg| arg(scope, args, ctx))
                    .collect::<EvalResult<SmallVec<[Value; 4]>>>()?;
                function.call(&values)
            }
        })
    }
}

/// Require a callee value to be a function. A nullish callee of an optional
/// call short-circuits the chain instead.
fn callable(
    value: Value,
    source: &str,
    optional: bool,
    ctx: &mut EvalContext,
) -> EvalResult<Option<Function>> {
    match value {
        Value::Function(function) => Ok(Some(function)),
        nullish if optional && nullish.is_nullish() => {
            ctx.short_circuit();
            Ok(None)
        }
        other => Err(not_callable(source, &other)),
    }
}

pub(super) fn compile_call(
    call: &FunctionNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let optional = call.optional();
    match &**call.callee() {
        Node::Symbol(symbol) if !arg_names.contains(symbol.name()) => {
            let name: Rc<str> = symbol.name().into();
            let raw_at_compile = matches!(
                namespace.resolve(&name),
                Ok(Some(Value::Function(function))) if function.is_raw()
            );
            let call_args = CallArgs::compile(call.args(), namespace, arg_names, raw_at_compile)?;
            let namespace = Rc::clone(namespace);
            Ok(evaluator(move |scope, args, ctx| {
                let found = scope.borrow().get(&name);
                let value = match found {
                    Some(value) => value,
                    None => namespace.resolve_function(&name)?.clone(),
                };
                match callable(value, &name, optional, ctx)? {
                    Some(function) => call_args.apply(&function, scope, args, ctx),
                    None => Ok(Value::Undefined),
                }
            }))
        }
        Node::Symbol(symbol) => {
            let name: Rc<str> = symbol.name().into();
            let call_args = CallArgs::compile(call.args(), namespace, arg_names, false)?;
            Ok(evaluator(move |scope, args, ctx| {
                let value = args
                    .get(&*name)
                    .cloned()
                    .ok_or_else(|| undefined_symbol(&name))?;
                match callable(value, &name, optional, ctx)? {
                    Some(function) => call_args.apply(&function, scope, args, ctx),
                    None => Ok(Value::Undefined),
                }
            }))
        }
        Node::Accessor(accessor) if accessor.index().is_some_and(IndexNode::is_object_property) => {
            let method: Rc<str> = index_of(accessor)?
                .object_property()
                .unwrap_or_default()
                .into();
            let object = compile_link(accessor.object(), namespace, arg_names)?;
            let chained = accessor.optional_chaining();
            let call_args = CallArgs::compile(call.args(), namespace, arg_names, false)?;
            Ok(evaluator(move |scope, args, ctx| {
                let Some(object) = receiver(&object, chained, scope, args, ctx)? else {
                    return Ok(Value::Undefined);
                };
                let value = match get_property(&object, &method) {
                    Err(err)
                        if optional
                            && matches!(err.kind, EvalErrorKind::PropertyNotFound { .. }) =>
                    {
                        Value::Undefined
                    }
                    found => found?,
                };
                match callable(value, &method, optional, ctx)? {
                    Some(function) => call_args.apply(&function, scope, args, ctx),
                    None => Ok(Value::Undefined),
                }
            }))
        }
        other => {
            let source: Rc<str> = other.to_string().into();
            let callee = compile_link(other, namespace, arg_names)?;
            let call_args = CallArgs::compile(call.args(), namespace, arg_names, false)?;
            Ok(evaluator(move |scope, args, ctx| {
                let value = callee(scope, args, ctx)?;
                if ctx.is_short_circuited() {
                    return Ok(Value::Undefined);
                }
                match callable(value, &source, optional, ctx)? {
                    Some(function) => call_args.apply(&function, scope, args, ctx),
                    None => Ok(Value::Undefined),
                }
            }))
        }
    }
}

/// Compile `name(params...) = body`.
///
/// Evaluating the definition binds a function in the scope and returns it.
/// The function keeps its defining scope alive; calls read and write that
/// scope, never the caller's.
pub(super) fn compile_definition(
    definition: &FunctionAssignmentNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let mut body_names = arg_names.clone();
    body_names.extend(definition.params().iter().cloned());
    let body = compile(definition.expr(), namespace, &body_names)?;
    let name: Rc<str> = definition.name().into();
    let params: Rc<[String]> = definition.params().into();

    Ok(evaluator(move |scope, args, _| {
        let function = user_function(&name, &params, &body, scope, args);
        scope
            .borrow_mut()
            .set(&name, Value::Function(function.clone()));
        Ok(Value::Function(function))
    }))
}

fn user_function(
    name: &Rc<str>,
    params: &Rc<[String]>,
    body: &Evaluator,
    scope: &ScopeRef,
    outer_args: &Args,
) -> Function {
    let defining_scope = Rc::clone(scope);
    let outer_args = outer_args.clone();
    let fn_name = Rc::clone(name);
    let params = Rc::clone(params);
    let body = Rc::clone(body);

    Function::native(Rc::clone(name), move |values: &[Value]| {
        if values.len() != params.len() {
            return Err(arity_mismatch(&fn_name, params.len(), values.len()));
        }
        let mut call_args = outer_args.clone();
        for (param, value) in params.iter().zip(values) {
            call_args.insert(param.clone(), value.clone());
        }
        ensure_sufficient_stack(|| body(&defining_scope, &call_args, &mut EvalContext::new()))
    })
}
