//! Elementary functions: roots, exponentials, trigonometry and rounding.

use mathexpr_value::{
    Complex64, Decimal, EvalError, Fraction, Namespace, TypedFunction, Unit, Value,
};
use rust_decimal::MathematicalOps;
use rust_decimal::RoundingStrategy;

use super::helpers::{big_overflow, big_to_f64, binary, elementwise_unary, integer, unary};
use crate::config::Config;

pub(super) fn register(namespace: &mut Namespace, config: &Config) {
    let predictable = config.predictable;
    namespace.insert_function(elementwise_unary("sqrt", move |f| {
        sqrt_signatures(f, predictable)
    }));
    namespace.insert_function(elementwise_unary("abs", abs_signatures));
    namespace.insert_function(elementwise_unary("exp", exp_signatures));
    namespace.insert_function(elementwise_unary("log", move |f| {
        log_signatures(f, predictable)
    }));
    namespace.insert_function(elementwise_unary("sin", |f| {
        trig_signatures(f, f64::sin, Complex64::sin)
    }));
    namespace.insert_function(elementwise_unary("cos", |f| {
        trig_signatures(f, f64::cos, Complex64::cos)
    }));
    namespace.insert_function(elementwise_unary("tan", |f| {
        trig_signatures(f, f64::tan, Complex64::tan)
    }));
    namespace.insert_function(elementwise_unary("floor", |f| {
        rounding_signatures(f, Rounding::Floor)
    }));
    namespace.insert_function(elementwise_unary("ceil", |f| {
        rounding_signatures(f, Rounding::Ceil)
    }));
    namespace.insert_function(elementwise_unary("round", |f| {
        rounding_signatures(f, Rounding::Round)
            .signature(
                "number, number",
                binary(|x: f64, digits: f64| {
                    let digits = integer(digits, "an integer number of decimals")?;
                    let scale = f64::powi(10.0, digits as i32);
                    Ok(((x * scale).round() / scale).into())
                }),
            )
            .signature(
                "BigNumber, number",
                binary(|x: Decimal, digits: f64| {
                    let digits = integer(digits, "an integer number of decimals")?;
                    let digits = u32::try_from(digits)
                        .map_err(|_| EvalError::new("Number of decimals must be non-negative"))?;
                    Ok(x
                        .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
                        .into())
                }),
            )
    }));
}

fn sqrt_signatures(f: TypedFunction, predictable: bool) -> TypedFunction {
    f.signature(
        "number",
        unary(move |x: f64| {
            if x < 0.0 && !predictable {
                return Ok(Value::complex(0.0, (-x).sqrt()));
            }
            Ok(x.sqrt().into())
        }),
    )
    .signature(
        "BigNumber",
        unary(move |x: Decimal| match x.sqrt() {
            Some(root) => Ok(root.into()),
            None if predictable => Ok(f64::NAN.into()),
            None => Ok(Value::complex(0.0, (-big_to_f64(x)).sqrt())),
        }),
    )
    .signature("Complex", unary(|z: Complex64| Ok(z.sqrt().into())))
}

fn abs_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number", unary(|x: f64| Ok(x.abs().into())))
        .signature("BigNumber", unary(|x: Decimal| Ok(x.abs().into())))
        .signature(
            "Fraction",
            unary(|x: Fraction| {
                if x.numerator() < 0 {
                    x.checked_neg().map(Value::from)
                } else {
                    Ok(x.into())
                }
            }),
        )
        .signature("Complex", unary(|z: Complex64| Ok(z.norm().into())))
        .signature(
            "Unit",
            unary(|u: Unit| match u.value() {
                Some(v) if v < 0.0 => Ok(u.scale(-1.0).into()),
                _ => Ok(u.into()),
            }),
        )
}

fn exp_signatures(f: TypedFunction) -> TypedFunction {
    f.signature("number", unary(|x: f64| Ok(x.exp().into())))
        .signature(
            "BigNumber",
            unary(|x: Decimal| x.checked_exp().map(Value::from).ok_or_else(big_overflow)),
        )
        .signature("Complex", unary(|z: Complex64| Ok(z.exp().into())))
}

/// `log(x)` is the natural logarithm, `log(x, base)` any other.
fn log_signatures(f: TypedFunction, predictable: bool) -> TypedFunction {
    f.signature(
        "number",
        unary(move |x: f64| {
            if x < 0.0 && !predictable {
                return Ok(Complex64::new(x, 0.0).ln().into());
            }
            Ok(x.ln().into())
        }),
    )
    .signature(
        "number, number",
        binary(|x: f64, base: f64| Ok((x.ln() / base.ln()).into())),
    )
    .signature(
        "BigNumber",
        unary(|x: Decimal| {
            x.checked_ln().map(Value::from).ok_or_else(|| {
                EvalError::new("Logarithm of a BigNumber requires a positive value")
            })
        }),
    )
    .signature("Complex", unary(|z: Complex64| Ok(z.ln().into())))
}

fn trig_signatures(
    f: TypedFunction,
    real: fn(f64) -> f64,
    complex: fn(Complex64) -> Complex64,
) -> TypedFunction {
    f.signature("number", unary(move |x: f64| Ok(real(x).into())))
        .signature("Complex", unary(move |z: Complex64| Ok(complex(z).into())))
}

#[derive(Clone, Copy)]
enum Rounding {
    Floor,
    Ceil,
    Round,
}

impl Rounding {
    fn number(self, x: f64) -> f64 {
        match self {
            Rounding::Floor => x.floor(),
            Rounding::Ceil => x.ceil(),
            Rounding::Round => x.round(),
        }
    }

    fn big(self, x: Decimal) -> Decimal {
        match self {
            Rounding::Floor => x.floor(),
            Rounding::Ceil => x.ceil(),
            Rounding::Round => x.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    /// Denominators are positive, so Euclidean division floors.
    fn fraction(self, x: Fraction) -> Fraction {
        let (n, d) = (x.numerator(), x.denominator());
        Fraction::integer(match self {
            Rounding::Floor => n.div_euclid(d),
            Rounding::Ceil => -(-n).div_euclid(d),
            Rounding::Round if n < 0 => -(2 * -n + d).div_euclid(2 * d),
            Rounding::Round => (2 * n + d).div_euclid(2 * d),
        })
    }
}

fn rounding_signatures(f: TypedFunction, mode: Rounding) -> TypedFunction {
    f.signature("number", unary(move |x: f64| Ok(mode.number(x).into())))
        .signature("BigNumber", unary(move |x: Decimal| Ok(mode.big(x).into())))
        .signature("Fraction", unary(move |x: Fraction| Ok(mode.fraction(x).into())))
        .signature(
            "Complex",
            unary(move |z: Complex64| {
                Ok(Complex64::new(mode.number(z.re), mode.number(z.im)).into())
            }),
        )
}
