//! Relational operators.
//!
//! Numbers compare with the configured relative tolerance, so
//! `0.1 + 0.2 == 0.3` holds. BigNumbers and Fractions compare exactly.

use std::cmp::Ordering;

use mathexpr_value::{Complex64, Namespace, TypedFunction};

use super::helpers::{binary, compare_real, elementwise_binary, nearly_equal};
use crate::config::Config;

const ORDERED: [&str; 5] = [
    "number, number",
    "BigNumber, BigNumber",
    "Fraction, Fraction",
    "Unit, Unit",
    "string, string",
];

pub(super) fn register(namespace: &mut Namespace, config: &Config) {
    let epsilon = config.epsilon;
    namespace.insert_function(elementwise_binary("equal", move |f| {
        equality_signatures(f, epsilon, false)
    }));
    namespace.insert_function(elementwise_binary("unequal", move |f| {
        equality_signatures(f, epsilon, true)
    }));
    let relations: [(&str, fn(Ordering) -> bool); 4] = [
        ("smaller", Ordering::is_lt),
        ("larger", Ordering::is_gt),
        ("smallerEq", Ordering::is_le),
        ("largerEq", Ordering::is_ge),
    ];
    for (name, test) in relations {
        namespace.insert_function(elementwise_binary(name, move |f| {
            ordered_signatures(f, epsilon, test)
        }));
    }
}

fn ordered_signatures(
    f: TypedFunction,
    epsilon: f64,
    test: fn(Ordering) -> bool,
) -> TypedFunction {
    ORDERED.into_iter().fold(f, |f, pattern| {
        f.signature(pattern, move |args| {
            Ok(test(compare_real(&args[0], &args[1], epsilon)?).into())
        })
    })
}

fn equality_signatures(f: TypedFunction, epsilon: f64, negate: bool) -> TypedFunction {
    let test: fn(Ordering) -> bool = if negate { Ordering::is_ne } else { Ordering::is_eq };
    ordered_signatures(f, epsilon, test)
        .signature(
            "Complex, Complex",
            binary(move |a: Complex64, b: Complex64| {
                let equal =
                    nearly_equal(a.re, b.re, epsilon) && nearly_equal(a.im, b.im, epsilon);
                Ok((equal != negate).into())
            }),
        )
        .signature("null|undefined, any", move |args| {
            Ok(((args[0] == args[1]) != negate).into())
        })
        .signature("any, null|undefined", move |args| {
            Ok(((args[0] == args[1]) != negate).into())
        })
}
