//! Shared helpers for kernel implementations.

use std::cmp::Ordering;
use std::rc::Rc;

use mathexpr_value::errors::{dimension_mismatch, type_error};
use mathexpr_value::{
    Complex64, Decimal, EvalError, EvalResult, Fraction, Function, TypedFunction, Unit, Value,
};
use rust_decimal::prelude::ToPrimitive;

/// A typed argument extracted from a [`Value`] after dispatch picked a
/// signature.
pub(super) trait Arg: Sized {
    const TYPE: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl Arg for f64 {
    const TYPE: &'static str = "number";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_number()
    }
}

impl Arg for bool {
    const TYPE: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl Arg for Decimal {
    const TYPE: &'static str = "BigNumber";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::BigNumber(d) => Some(*d),
            _ => None,
        }
    }
}

impl Arg for Complex64 {
    const TYPE: &'static str = "Complex";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Complex(c) => Some(*c),
            _ => None,
        }
    }
}

impl Arg for Fraction {
    const TYPE: &'static str = "Fraction";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Fraction(f) => Some(*f),
            _ => None,
        }
    }
}

impl Arg for Unit {
    const TYPE: &'static str = "Unit";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Unit(u) => Some(*u),
            _ => None,
        }
    }
}

impl Arg for String {
    const TYPE: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl Arg for Value {
    const TYPE: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

pub(super) fn arg<A: Arg>(args: &[Value], i: usize) -> EvalResult<A> {
    args.get(i).and_then(A::from_value).ok_or_else(|| {
        type_error(A::TYPE, args.get(i).map_or("nothing", Value::type_of))
    })
}

/// Adapt a one-argument kernel to the signature calling convention.
pub(super) fn unary<A: Arg>(
    f: impl Fn(A) -> EvalResult + 'static,
) -> impl Fn(&[Value]) -> EvalResult {
    move |args| f(arg(args, 0)?)
}

/// Adapt a two-argument kernel to the signature calling convention.
pub(super) fn binary<A: Arg, B: Arg>(
    f: impl Fn(A, B) -> EvalResult + 'static,
) -> impl Fn(&[Value]) -> EvalResult {
    move |args| f(arg(args, 0)?, arg(args, 1)?)
}

#[cold]
pub(super) fn big_overflow() -> EvalError {
    EvalError::new("BigNumber overflow")
}

pub(super) fn big_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(f64::NAN)
}

/// A function whose scalar signatures also apply element-wise to arrays.
///
/// `signatures` is applied twice: once for the scalar function the array
/// signatures recurse into, once for the function itself.
pub(super) fn elementwise_unary(
    name: &str,
    signatures: impl Fn(TypedFunction) -> TypedFunction,
) -> Function {
    let scalar = Rc::new(signatures(TypedFunction::new(name)));
    Function::typed(
        signatures(TypedFunction::new(name))
            .signature("Array", move |args| map_deep(&scalar, &args[0])),
    )
}

/// Binary counterpart of [`elementwise_unary`]: an array operand is paired
/// element by element with another array of the same length, or with every
/// element when the other operand is a scalar.
pub(super) fn elementwise_binary(
    name: &str,
    signatures: impl Fn(TypedFunction) -> TypedFunction,
) -> Function {
    let scalar = Rc::new(signatures(TypedFunction::new(name)));
    let right = Rc::clone(&scalar);
    Function::typed(
        signatures(TypedFunction::new(name))
            .signature("Array, any", move |args| zip_deep(&scalar, &args[0], &args[1]))
            .signature("any, Array", move |args| zip_deep(&right, &args[0], &args[1])),
    )
}

pub(super) fn map_deep(f: &TypedFunction, value: &Value) -> EvalResult {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| map_deep(f, item))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::array),
        scalar => f.call(std::slice::from_ref(scalar)),
    }
}

pub(super) fn zip_deep(f: &TypedFunction, a: &Value, b: &Value) -> EvalResult {
    match (a, b) {
        (Value::Array(xs), Value::Array(ys)) => {
            if xs.len() != ys.len() {
                return Err(dimension_mismatch(xs.len(), ys.len()));
            }
            xs.iter()
                .zip(ys.iter())
                .map(|(x, y)| zip_deep(f, x, y))
                .collect::<EvalResult<Vec<_>>>()
                .map(Value::array)
        }
        (Value::Array(xs), y) => xs
            .iter()
            .map(|x| zip_deep(f, x, y))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::array),
        (x, Value::Array(ys)) => ys
            .iter()
            .map(|y| zip_deep(f, x, y))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::array),
        (x, y) => f.call(&[x.clone(), y.clone()]),
    }
}

/// Every scalar of a nested array, in row-major order.
pub(super) fn flatten(values: &[Value]) -> Vec<Value> {
    let mut flat = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Array(items) => flat.extend(flatten(items)),
            scalar => flat.push(scalar.clone()),
        }
    }
    flat
}

/// Relative comparison of two numbers with tolerance `epsilon`.
pub(super) fn nearly_equal(x: f64, y: f64, epsilon: f64) -> bool {
    if x == y {
        return true;
    }
    if x.is_nan() || y.is_nan() || !x.is_finite() || !y.is_finite() {
        return false;
    }
    let diff = (x - y).abs();
    diff <= f64::EPSILON || diff <= x.abs().max(y.abs()) * epsilon
}

/// Order two real scalars. Mixed numeric kinds compare as numbers.
pub(super) fn compare_real(a: &Value, b: &Value, epsilon: f64) -> EvalResult<Ordering> {
    match (a, b) {
        (Value::BigNumber(x), Value::BigNumber(y)) => Ok(x.cmp(y)),
        (Value::Fraction(x), Value::Fraction(y)) => Ok(x.cmp(y)),
        (Value::Unit(x), Value::Unit(y)) => {
            x.compare(y)?;
            Ok(order_numbers(x.to_si(), y.to_si(), epsilon))
        }
        (Value::String(x), Value::String(y)) => Ok(x.as_str().cmp(y.as_str())),
        _ => Ok(order_numbers(real(a)?, real(b)?, epsilon)),
    }
}

fn order_numbers(x: f64, y: f64, epsilon: f64) -> Ordering {
    if nearly_equal(x, y, epsilon) {
        Ordering::Equal
    } else if x < y {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// A real scalar as a number.
pub(super) fn real(value: &Value) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Boolean(b) => Ok(f64::from(u8::from(*b))),
        Value::BigNumber(d) => Ok(big_to_f64(*d)),
        Value::Fraction(f) => Ok(f.to_f64()),
        other => Err(type_error("a real number", other.type_of())),
    }
}

/// A number that must be an integer, for kernels like `factorial`.
pub(super) fn integer(n: f64, what: &str) -> EvalResult<i64> {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.007_199_254_740_992e15 {
        Ok(n as i64)
    } else {
        Err(type_error(what, "number"))
    }
}
