//! Aggregates, ranges and subsets.

use std::cmp::Ordering;
use std::rc::Rc;

use mathexpr_value::{
    size, subset, EvalError, EvalResult, Function, IndexValue, Namespace, TypedFunction, Value,
};

use super::arithmetic::add_signatures;
use super::helpers::{arg, compare_real, flatten};
use crate::config::Config;

pub(super) fn register(namespace: &mut Namespace, config: &Config) {
    let epsilon = config.epsilon;
    namespace.insert_function(extremum("max", Ordering::Greater, epsilon));
    namespace.insert_function(extremum("min", Ordering::Less, epsilon));
    namespace.insert_function(sum());
    namespace.insert_function(Function::typed(
        TypedFunction::new("size").signature("any", |args| {
            Ok(Value::array(
                size(&args[0])
                    .into_iter()
                    .map(|n| Value::Number(n as f64))
                    .collect(),
            ))
        }),
    ));
    namespace.insert_function(Function::typed(
        TypedFunction::new("range")
            .signature("number, number", |args| {
                range(arg(args, 0)?, arg(args, 1)?, 1.0)
            })
            .signature("number, number, number", |args| {
                range(arg(args, 0)?, arg(args, 1)?, arg(args, 2)?)
            }),
    ));
    namespace.insert_function(Function::typed(
        TypedFunction::new("subset").signature("any, ...any", |args| {
            let index = IndexValue::from_one_based(&args[1..])?;
            subset(&args[0], &index)
        }),
    ));
}

/// The scalars an aggregate runs over: the flattened array when called with
/// one array, otherwise the arguments themselves.
fn operands(args: &[Value]) -> Vec<Value> {
    match args {
        [Value::Array(items)] => flatten(items),
        _ => flatten(args),
    }
}

/// `max`/`min`: the operand that compares as `wanted` against every other.
fn extremum(name: &'static str, wanted: Ordering, epsilon: f64) -> Function {
    let pick = move |args: &[Value]| -> EvalResult {
        let mut values = operands(args).into_iter();
        let Some(mut best) = values.next() else {
            return Err(EvalError::new(format!(
                "Cannot calculate {name}, empty collection"
            )));
        };
        for value in values {
            if compare_real(&value, &best, epsilon)? == wanted {
                best = value;
            }
        }
        Ok(best)
    };
    Function::typed(TypedFunction::new(name).signature("...any", pick))
}

fn sum() -> Function {
    let add = Rc::new(add_signatures(TypedFunction::new("add")));
    Function::typed(TypedFunction::new("sum").signature("...any", move |args| {
        let mut values = operands(args).into_iter();
        let Some(first) = values.next() else {
            return Ok(Value::Number(0.0));
        };
        values.try_fold(first, |total, value| add.call(&[total, value]))
    }))
}

/// Inclusive range from `start` towards `end` in steps of `step`.
fn range(start: f64, end: f64, step: f64) -> EvalResult {
    if step == 0.0 || step.is_nan() {
        return Err(EvalError::new("Step must be a non-zero number"));
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(EvalError::new("Range bounds must be finite"));
    }
    let span = (end - start) / step;
    if span < 0.0 {
        return Ok(Value::array(Vec::new()));
    }
    // Tolerate rounding in fractional steps such as 0:0.1:0.3.
    let count = (span + 1e-10).floor() as usize + 1;
    Ok(Value::array(
        (0..count)
            .map(|i| Value::Number(start + i as f64 * step))
            .collect(),
    ))
}
