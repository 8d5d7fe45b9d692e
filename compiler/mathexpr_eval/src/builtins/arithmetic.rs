//! Arithmetic operators: `+ - * / mod ^`, their element-wise forms, unary
//! signs and factorial.
//!
//! Scalars follow the value kinds: numbers use IEEE arithmetic (`1/0` is
//! `Infinity`), BigNumbers and Fractions are exact and fail on overflow or
//! division by zero, Complex numbers use `num-complex`, and Units scale and
//! add within one dimension. Arrays are handled element-wise except by
//! `multiply`, which is the matrix product.

use std::rc::Rc;

use mathexpr_value::errors::{division_by_zero, type_error};
use mathexpr_value::{
    Complex64, Decimal, EvalResult, Fraction, Function, Namespace, TypedFunction, Unit, Value,
};
use rust_decimal::MathematicalOps;

use super::helpers::{
    big_overflow, big_to_f64, binary, elementwise_binary, elementwise_unary, integer, unary,
    zip_deep,
};
use super::matrix::matrix_product;
use crate::config::Config;

pub(super) fn register(namespace: &mut Namespace, config: &Config) {
    let predictable = config.predictable;
    namespace.insert_function(elementwise_binary("add", add_signatures));
    namespace.insert_function(elementwise_binary("subtract", subtract_signatures));
    namespace.insert_function(multiply());
    namespace.insert_function(elementwise_binary("dotMultiply", multiply_signatures));
    namespace.insert_function(elementwise_binary("divide", divide_signatures));
    namespace.insert_function(elementwise_binary("dotDivide", divide_signatures));
    namespace.insert_function(elementwise_binary("mod", mod_signatures));
    namespace.insert_function(Function::typed(pow_signatures(
        TypedFunction::new("pow"),
        predictable,
    )));
    namespace.insert_function(elementwise_binary("dotPow", move |f| {
        pow_signatures(f, predictable)
    }));
    namespace.insert_function(elementwise_unary("unaryMinus", unary_minus_signatures));
    namespace.insert_function(elementwise_unary("unaryPlus", unary_plus_signatures));
    namespace.insert_function(elementwise_unary("factorial", factorial_signatures));
}

pub(super) fn add_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number, number", binary(|a: f64, b: f64| Ok((a + b).into())))
        .signature(
            "BigNumber, BigNumber",
            binary(|a: Decimal, b: Decimal| {
                a.checked_add(b).map(Value::from).ok_or_else(big_overflow)
            }),
        )
        .signature(
            "Fraction, Fraction",
            binary(|a: Fraction, b: Fraction| a.checked_add(&b).map(Value::from)),
        )
        .signature(
            "Complex, Complex",
            binary(|a: Complex64, b: Complex64| Ok((a + b).into())),
        )
        .signature(
            "Unit, Unit",
            binary(|a: Unit, b: Unit| a.checked_add(&b).map(Value::from)),
        )
}

fn subtract_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number, number", binary(|a: f64, b: f64| Ok((a - b).into())))
        .signature(
            "BigNumber, BigNumber",
            binary(|a: Decimal, b: Decimal| {
                a.checked_sub(b).map(Value::from).ok_or_else(big_overflow)
            }),
        )
        .signature(
            "Fraction, Fraction",
            binary(|a: Fraction, b: Fraction| a.checked_sub(&b).map(Value::from)),
        )
        .signature(
            "Complex, Complex",
            binary(|a: Complex64, b: Complex64| Ok((a - b).into())),
        )
        .signature(
            "Unit, Unit",
            binary(|a: Unit, b: Unit| a.checked_sub(&b).map(Value::from)),
        )
}

pub(super) fn multiply_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number, number", binary(|a: f64, b: f64| Ok((a * b).into())))
        .signature(
            "BigNumber, BigNumber",
            binary(|a: Decimal, b: Decimal| {
                a.checked_mul(b).map(Value::from).ok_or_else(big_overflow)
            }),
        )
        .signature(
            "Fraction, Fraction",
            binary(|a: Fraction, b: Fraction| a.checked_mul(&b).map(Value::from)),
        )
        .signature(
            "Complex, Complex",
            binary(|a: Complex64, b: Complex64| Ok((a * b).into())),
        )
        .signature(
            "number, Unit",
            binary(|n: f64, u: Unit| Ok(u.scale(n).into())),
        )
        .signature(
            "Unit, number",
            binary(|u: Unit, n: f64| Ok(u.scale(n).into())),
        )
}

/// `multiply`: the matrix product for two arrays, broadcasting for an array
/// and a scalar.
fn multiply() -> Function {
    let scalar = Rc::new(multiply_signatures(TypedFunction::new("multiply")));
    let sum = Rc::new(add_signatures(TypedFunction::new("add")));
    let (left, right) = (Rc::clone(&scalar), Rc::clone(&scalar));
    Function::typed(
        multiply_signatures(TypedFunction::new("multiply"))
            .signature("Array, Array", move |args| {
                matrix_product(&scalar, &sum, &args[0], &args[1])
            })
            .signature("Array, any", move |args| zip_deep(&left, &args[0], &args[1]))
            .signature("any, Array", move |args| zip_deep(&right, &args[0], &args[1])),
    )
}

fn divide_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number, number", binary(|a: f64, b: f64| Ok((a / b).into())))
        .signature(
            "BigNumber, BigNumber",
            binary(|a: Decimal, b: Decimal| {
                if b.is_zero() {
                    return Err(division_by_zero());
                }
                a.checked_div(b).map(Value::from).ok_or_else(big_overflow)
            }),
        )
        .signature(
            "Fraction, Fraction",
            binary(|a: Fraction, b: Fraction| a.checked_div(&b).map(Value::from)),
        )
        .signature(
            "Complex, Complex",
            binary(|a: Complex64, b: Complex64| Ok((a / b).into())),
        )
        .signature(
            "Unit, number",
            binary(|u: Unit, n: f64| Ok(u.scale(1.0 / n).into())),
        )
        .signature(
            "Unit, Unit",
            binary(|a: Unit, b: Unit| {
                a.compare(&b)?;
                Ok((a.to_si() / b.to_si()).into())
            }),
        )
}

/// `x mod y` is `x - y * floor(x / y)`, so the result takes the sign of `y`.
/// `x mod 0` is `x`.
fn mod_signatures(f: TypedFunction) -> TypedFunction {
    f.signature(
        "number, number",
        binary(|x: f64, y: f64| {
            if y == 0.0 {
                return Ok(x.into());
            }
            Ok((x - y * (x / y).floor()).into())
        }),
    )
    .signature(
        "BigNumber, BigNumber",
        binary(|x: Decimal, y: Decimal| {
            if y.is_zero() {
                return Ok(x.into());
            }
            x.checked_div(y)
                .map(|q| q.floor())
                .and_then(|q| y.checked_mul(q))
                .and_then(|p| x.checked_sub(p))
                .map(Value::from)
                .ok_or_else(big_overflow)
        }),
    )
}

fn pow_signatures(f: TypedFunction, predictable: bool) -> TypedFunction {
    f.signature(
        "number, number",
        binary(move |x: f64, y: f64| {
            if x < 0.0 && y.fract() != 0.0 && !predictable {
                return Ok(Complex64::new(x, 0.0).powf(y).into());
            }
            Ok(x.powf(y).into())
        }),
    )
    .signature(
        "BigNumber, BigNumber",
        binary(|x: Decimal, y: Decimal| {
            x.checked_powd(y).map(Value::from).ok_or_else(big_overflow)
        }),
    )
    .signature(
        "Fraction, number",
        binary(|x: Fraction, y: f64| match integer(y, "an integer exponent") {
            Ok(n) => fraction_pow(x, n),
            Err(_) => Ok(x.to_f64().powf(y).into()),
        }),
    )
    .signature(
        "Complex, Complex",
        binary(|x: Complex64, y: Complex64| Ok(x.powc(y).into())),
    )
}

fn fraction_pow(base: Fraction, exponent: i64) -> EvalResult {
    let mut result = Fraction::integer(1);
    for _ in 0..exponent.unsigned_abs() {
        result = result.checked_mul(&base)?;
    }
    if exponent < 0 {
        result = Fraction::integer(1).checked_div(&result)?;
    }
    Ok(result.into())
}

fn unary_minus_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number", unary(|x: f64| Ok((-x).into())))
        .signature("BigNumber", unary(|x: Decimal| Ok((-x).into())))
        .signature("Fraction", unary(|x: Fraction| x.checked_neg().map(Value::from)))
        .signature("Complex", unary(|x: Complex64| Ok((-x).into())))
        .signature("Unit", unary(|u: Unit| Ok(u.scale(-1.0).into())))
}

fn unary_plus_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number|BigNumber|Fraction|Complex|Unit", |args| {
        Ok(args[0].clone())
    })
    .signature(
        "string",
        unary(|s: String| {
            s.trim()
                .parse::<f64>()
                .map(Value::from)
                .map_err(|_| type_error("a numeric string", &format!("{s:?}")))
        }),
    )
}

fn factorial_signatures(f: TypedFunction) -> TypedFunction {
    f.signature(
        "number",
        unary(|x: f64| {
            let n = integer(x, "a non-negative integer")?;
            if n < 0 {
                return Err(type_error("a non-negative integer", &x.to_string()));
            }
            Ok((1..=n).fold(1.0, |acc, k| acc * k as f64).into())
        }),
    )
    .signature(
        "BigNumber",
        unary(|x: Decimal| {
            let n = integer(big_to_f64(x), "a non-negative integer")?;
            if n < 0 {
                return Err(type_error("a non-negative integer", &x.to_string()));
            }
            (1..=n)
                .try_fold(Decimal::ONE, |acc, k| acc.checked_mul(Decimal::from(k)))
                .map(Value::from)
                .ok_or_else(big_overflow)
        }),
    )
}
