//! Symbol lookup.
//!
//! The strategy is fixed when the symbol is compiled:
//!
//! 1. a parameter name reads the argument map and nothing else;
//! 2. a namespace name reads the scope first, so users can shadow built-ins;
//! 3. any other name reads the scope, then falls back to a valueless unit.

use std::rc::Rc;

use mathexpr_ir::SymbolNode;
use mathexpr_value::errors::undefined_symbol;
use mathexpr_value::{Namespace, Unit, Value};

use super::{evaluator, ArgNames, Evaluator};

pub(super) fn compile(
    symbol: &SymbolNode,
    namespace: &Rc<Namespace>,
    arg_names: &ArgNames,
) -> Evaluator {
    let name: Rc<str> = symbol.name().into();

    if arg_names.contains(symbol.name()) {
        return evaluator(move |_, args, _| {
            args.get(&*name)
                .cloned()
                .ok_or_else(|| undefined_symbol(&name))
        });
    }

    if namespace.contains(symbol.name()) {
        let namespace = Rc::clone(namespace);
        return evaluator(move |scope, _, _| {
            if let Some(value) = scope.borrow().get(&name) {
                return Ok(value);
            }
            namespace
                .resolve(&name)?
                .cloned()
                .ok_or_else(|| undefined_symbol(&name))
        });
    }

    evaluator(move |scope, _, _| {
        if let Some(value) = scope.borrow().get(&name) {
            return Ok(value);
        }
        Unit::parse(&name)
            .map(Value::Unit)
            .ok_or_else(|| undefined_symbol(&name))
    })
}
