//! Constants, type inspection and conversions between value kinds.

use std::f64::consts;

use mathexpr_value::errors::type_error;
use mathexpr_value::{
    Complex64, Decimal, EvalResult, Fraction, Function, Namespace, TypedFunction, Unit, Value,
};

use super::helpers::{
    big_overflow, big_to_f64, binary, elementwise_binary, elementwise_unary, integer, unary,
};

pub(super) fn register_constants(namespace: &mut Namespace) {
    namespace.insert("pi", consts::PI);
    namespace.insert("PI", consts::PI);
    namespace.insert("e", consts::E);
    namespace.insert("E", consts::E);
    namespace.insert("tau", consts::TAU);
    namespace.insert("phi", 1.618_033_988_749_895);
    namespace.insert("i", Complex64::new(0.0, 1.0));
    namespace.insert("Infinity", f64::INFINITY);
    namespace.insert("NaN", f64::NAN);
    namespace.insert("LN2", consts::LN_2);
    namespace.insert("LN10", consts::LN_10);
    namespace.insert("SQRT2", consts::SQRT_2);
}

pub(super) fn register(namespace: &mut Namespace) {
    namespace.insert_function(Function::typed(
        TypedFunction::new("typeOf")
            .signature("any", |args| Ok(Value::string(args[0].type_of()))),
    ));
    namespace.insert_function(elementwise_unary("bignumber", bignumber_signatures));
    namespace.insert_function(fraction());
    namespace.insert_function(Function::typed(
        TypedFunction::new("complex")
            .signature("number", unary(|re: f64| Ok(Value::complex(re, 0.0))))
            .signature(
                "number, number",
                binary(|re: f64, im: f64| Ok(Value::complex(re, im))),
            )
            .signature("Complex", |args| Ok(args[0].clone())),
    ));
    namespace.insert_function(elementwise_unary("re", |f| {
        f.signature("number", |args| Ok(args[0].clone()))
            .signature("Complex", unary(|z: Complex64| Ok(z.re.into())))
    }));
    namespace.insert_function(elementwise_unary("im", |f| {
        f.signature("number", |_| Ok(Value::Number(0.0)))
            .signature("Complex", unary(|z: Complex64| Ok(z.im.into())))
    }));
    namespace.insert_function(elementwise_binary("to", |f| {
        f.signature(
            "Unit, Unit",
            binary(|from: Unit, to: Unit| from.to(&to).map(Value::from)),
        )
    }));
}

fn bignumber_signatures(f: TypedFunction) -> TypedFunction {
    f.signature(
        "number",
        unary(|x: f64| {
            Decimal::try_from(x)
                .map(Value::from)
                .map_err(|_| type_error("a number within BigNumber range", &x.to_string()))
        }),
    )
    .signature(
        "string",
        unary(|s: String| {
            s.trim()
                .parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(s.trim()))
                .map(Value::from)
                .map_err(|_| type_error("a numeric string", &format!("{s:?}")))
        }),
    )
    .signature("BigNumber", |args| Ok(args[0].clone()))
    .signature(
        "Fraction",
        unary(|x: Fraction| {
            Decimal::from(x.numerator())
                .checked_div(Decimal::from(x.denominator()))
                .map(Value::from)
                .ok_or_else(big_overflow)
        }),
    )
}

fn fraction() -> Function {
    Function::typed(
        TypedFunction::new("fraction")
            .signature("number", unary(|x: f64| Fraction::from_f64(x).map(Value::from)))
            .signature(
                "number, number",
                binary(|n: f64, d: f64| {
                    Fraction::new(integer(n, "an integer")?, integer(d, "an integer")?)
                        .map(Value::from)
                }),
            )
            .signature("Fraction", |args| Ok(args[0].clone()))
            .signature(
                "BigNumber",
                unary(|x: Decimal| Fraction::from_f64(big_to_f64(x)).map(Value::from)),
            )
            .signature("string", unary(|s: String| parse_fraction(&s))),
    )
}

/// `"3/4"`, `"-2"` or a decimal such as `"0.125"`.
fn parse_fraction(text: &str) -> EvalResult {
    let invalid = || type_error("a fraction string", &format!("{text:?}"));
    let text = text.trim();
    if let Some((n, d)) = text.split_once('/') {
        let n = n.trim().parse::<i64>().map_err(|_| invalid())?;
        let d = d.trim().parse::<i64>().map_err(|_| invalid())?;
        return Fraction::new(n, d).map(Value::from);
    }
    let x = text.parse::<f64>().map_err(|_| invalid())?;
    Fraction::from_f64(x).map(Value::from)
}
