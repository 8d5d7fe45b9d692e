//! Assignment to variables, properties and subscripts.
//!
//! Containers are values, so `a.b[2] = v` cannot patch `a` in place. The
//! target is compiled into a [`Place`]: a root variable plus the chain of
//! indices leading to the updated part. An update reads each level, builds
//! the replaced copy bottom-up and rebinds the root variable.

use std::rc::Rc;

use mathexpr_ir::{AssignmentNode, Node};
use mathexpr_value::{assign, subset, Args, EvalError, EvalResult, Namespace, ScopeRef, Value};

use super::access::{compile_index, index_of, IndexEvaluator};
use super::{compile, evaluator, symbol, ArgNames, Evaluator};
use crate::context::EvalContext;

type Update<'a> = dyn FnMut(Value, &mut EvalContext) -> EvalResult + 'a;

enum Place {
    Variable { name: Rc<str>, read: Evaluator },
    Nested { parent: Box<Place>, index: IndexEvaluator },
}

impl Place {
    fn compile(node: &Node, namespace: &Rc<Namespace>, arg_names: &ArgNames) -> EvalResult<Self> {
        match node {
            Node::Symbol(symbol) => Ok(Place::Variable {
                name: symbol.name().into(),
                read: symbol::compile(symbol, namespace, arg_names),
            }),
            Node::Accessor(accessor) => Ok(Place::Nested {
                parent: Box::new(Place::compile(accessor.object(), namespace, arg_names)?),
                index: compile_index(index_of(accessor)?, namespace, arg_names)?,
            }),
            Node::Parenthesis(paren) => Place::compile(paren.inner(), namespace, arg_names),
            other => Err(EvalError::new(format!(
                "Cannot assign to a {}",
                other.type_name()
            ))),
        }
    }

    /// Replace the value at this place with `update(current)`.
    fn update(
        &self,
        scope: &ScopeRef,
        args: &Args,
        ctx: &mut EvalContext,
        update: &mut Update<'_>,
    ) -> EvalResult<()> {
        match self {
            Place::Variable { name, read } => {
                let current = read(scope, args, ctx)?;
                let replaced = update(current, ctx)?;
                scope.borrow_mut().set(name, replaced);
                Ok(())
            }
            Place::Nested { parent, index } => {
                parent.update(scope, args, ctx, &mut |container, ctx| {
                    let index = index(scope, args, &container, ctx)?;
                    let child = subset(&container, &index)?;
                    let replaced = update(child, ctx)?;
                    assign(container, &index, replaced)
                })
            }
        }
    }
}

/// Compile `target = value`. Every form evaluates to the assigned value.
pub(super) fn compile_assignment(
    node: &AssignmentNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> EvalResult<Evaluator> {
    let value = compile(node.value(), namespace, arg_names)?;

    let Some(index) = node.index() else {
        let Node::Symbol(symbol) = &**node.object() else {
            return Err(EvalError::new(
                "Assignment target without an index must be a symbol",
            ));
        };
        let name: Rc<str> = symbol.name().into();
        return Ok(evaluator(move |scope, args, ctx| {
            let value = value(scope, args, ctx)?;
            scope.borrow_mut().set(&name, value.clone());
            Ok(value)
        }));
    };

    let place = Place::compile(node.object(), namespace, arg_names)?;
    let index = compile_index(index, namespace, arg_names)?;
    Ok(evaluator(move |scope, args, ctx| {
        let mut assigned = Value::Undefined;
        place.update(scope, args, ctx, &mut |container, ctx| {
            let index = index(scope, args, &container, ctx)?;
            let replacement = value(scope, args, ctx)?;
            assigned = replacement.clone();
            assign(container, &index, replacement)
        })?;
        Ok(assigned)
    }))
}
