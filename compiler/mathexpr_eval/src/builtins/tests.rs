use super::*;

use mathexpr_value::{Decimal, EvalErrorKind, EvalResult, Fraction, Value};
use pretty_assertions::assert_eq;

use crate::engine::Engine;

fn eval(source: &str) -> EvalResult {
    Engine::new().evaluate(source)
}

fn number(source: &str) -> f64 {
    match eval(source).unwrap() {
        Value::Number(n) => n,
        other => panic!("{source}: expected a number, got {other}"),
    }
}

fn numbers(values: &[f64]) -> Value {
    Value::array(values.iter().copied().map(Value::Number).collect())
}

fn matrix(rows: &[&[f64]]) -> Value {
    Value::array(rows.iter().map(|row| numbers(row)).collect())
}

// Arithmetic

#[test]
fn scalar_arithmetic() {
    assert_eq!(number("(2 + 3) / 4"), 1.25);
    assert_eq!(number("7 - 10"), -3.0);
    assert_eq!(number("5!"), 120.0);
    assert_eq!(number("+\"42\""), 42.0);
}

#[test]
fn modulo_takes_the_sign_of_the_divisor() {
    assert_eq!(number("-7 mod 3"), 2.0);
    assert_eq!(number("7 mod -3"), -2.0);
    assert_eq!(number("7 mod 0"), 7.0);
}

#[test]
fn sqrt_of_a_negative_number_is_complex() {
    assert_eq!(eval("sqrt(-4)").unwrap(), Value::complex(0.0, 2.0));
}

#[test]
fn predictable_sqrt_of_a_negative_number_is_nan() {
    let config = Config {
        predictable: true,
        ..Config::default()
    };
    let engine = Engine::builder().config(config).build();
    let value = engine.evaluate("sqrt(-4)").unwrap();
    assert!(value.as_number().is_some_and(f64::is_nan));
}

#[test]
fn complex_arithmetic() {
    assert_eq!(eval("(1 + 2i) * i").unwrap(), Value::complex(-2.0, 1.0));
    assert_eq!(number("re(3 - 4i)"), 3.0);
    assert_eq!(number("abs(3 - 4i)"), 5.0);
}

#[test]
fn bignumber_arithmetic_is_exact() {
    assert_eq!(
        eval("bignumber(\"0.1\") + bignumber(\"0.2\")").unwrap(),
        Value::BigNumber(Decimal::new(3, 1))
    );
}

#[test]
fn fraction_arithmetic_is_exact() {
    assert_eq!(
        eval("fraction(1, 3) + fraction(1, 6)").unwrap(),
        Value::Fraction(Fraction::new(1, 2).unwrap())
    );
    assert_eq!(
        eval("fraction(\"3/4\")").unwrap(),
        Value::Fraction(Fraction::new(3, 4).unwrap())
    );
}

#[test]
fn division_of_bignumbers_by_zero_fails() {
    let err = eval("bignumber(1) / bignumber(0)").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
}

// Arrays and matrices

#[test]
fn scalars_broadcast_over_arrays() {
    assert_eq!(eval("[1, 2, 3] + 1").unwrap(), numbers(&[2.0, 3.0, 4.0]));
    assert_eq!(eval("2 * [1, 2]").unwrap(), numbers(&[2.0, 4.0]));
    assert_eq!(eval("abs([-1, 2])").unwrap(), numbers(&[1.0, 2.0]));
}

#[test]
fn element_wise_operands_must_agree_in_size() {
    let err = eval("[1, 2] + [1, 2, 3]").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DimensionMismatch { .. }));
}

#[test]
fn multiply_is_the_matrix_product() {
    assert_eq!(
        eval("[[1, 2], [3, 4]] * [[5, 6], [7, 8]]").unwrap(),
        matrix(&[&[19.0, 22.0], &[43.0, 50.0]])
    );
    assert_eq!(number("[1, 2, 3] * [4, 5, 6]"), 32.0);
    assert_eq!(
        eval("[[1, 2], [3, 4]] * [1, 1]").unwrap(),
        numbers(&[3.0, 7.0])
    );
}

#[test]
fn dot_multiply_is_element_wise() {
    assert_eq!(
        eval("[[1, 2], [3, 4]] .* [[5, 6], [7, 8]]").unwrap(),
        matrix(&[&[5.0, 12.0], &[21.0, 32.0]])
    );
}

// Comparison and logic

#[test]
fn equality_tolerates_rounding() {
    assert_eq!(eval("0.1 + 0.2 == 0.3").unwrap(), Value::Boolean(true));
    assert_eq!(eval("0.1 + 0.2 != 0.3").unwrap(), Value::Boolean(false));
}

#[test]
fn relational_operators_order_strings_and_units() {
    assert_eq!(eval("\"a\" < \"b\"").unwrap(), Value::Boolean(true));
    assert_eq!(eval("2 m > 150 cm").unwrap(), Value::Boolean(true));
    assert_eq!(eval("3 <= 3").unwrap(), Value::Boolean(true));
}

#[test]
fn nullish_values_equal_only_themselves() {
    assert_eq!(eval("null == null").unwrap(), Value::Boolean(true));
    assert_eq!(eval("null == 0").unwrap(), Value::Boolean(false));
}

#[test]
fn logic_uses_truth_values() {
    assert_eq!(eval("1 and 0").unwrap(), Value::Boolean(false));
    assert_eq!(eval("0 or \"x\"").unwrap(), Value::Boolean(true));
    assert_eq!(eval("not 0").unwrap(), Value::Boolean(true));
    assert_eq!(eval("true xor true").unwrap(), Value::Boolean(false));
}

// Numeric functions

#[test]
fn logarithms() {
    assert!((number("log(8, 2)") - 3.0).abs() < 1e-12);
    assert_eq!(number("log(1)"), 0.0);
    assert_eq!(eval("log(-1)").unwrap().type_of(), "Complex");
}

#[test]
fn rounding() {
    assert_eq!(number("round(3.14159, 2)"), 3.14);
    assert_eq!(number("floor(-2.5)"), -3.0);
    assert_eq!(number("ceil(2.1)"), 3.0);
    assert_eq!(eval("round([1.4, 1.6])").unwrap(), numbers(&[1.0, 2.0]));
}

// Collections

#[test]
fn max_and_min_accept_arguments_or_one_array() {
    assert_eq!(number("max(1, 5, 3)"), 5.0);
    assert_eq!(number("max([1, 7, 2])"), 7.0);
    assert_eq!(number("min([[4, 2], [3, 9]])"), 2.0);
}

#[test]
fn max_of_nothing_fails() {
    assert!(eval("max([])").is_err());
}

#[test]
fn sum_of_nothing_is_zero() {
    assert_eq!(number("sum([1, 2, 3])"), 6.0);
    assert_eq!(number("sum([])"), 0.0);
}

#[test]
fn size_reports_every_dimension() {
    assert_eq!(
        eval("size([[1, 2], [3, 4], [5, 6]])").unwrap(),
        numbers(&[3.0, 2.0])
    );
    assert_eq!(eval("size(5)").unwrap(), numbers(&[]));
}

#[test]
fn range_rejects_a_zero_step() {
    assert!(eval("range(1, 5, 0)").is_err());
    assert_eq!(eval("range(5, 1)").unwrap(), numbers(&[]));
    assert_eq!(eval("range(5, 1, -2)").unwrap(), numbers(&[5.0, 3.0, 1.0]));
}

#[test]
fn subset_uses_one_based_positions() {
    assert_eq!(number("subset([10, 20, 30], 2)"), 20.0);
}

// Construction and units

#[test]
fn constants_are_bound() {
    assert_eq!(number("pi"), std::f64::consts::PI);
    assert_eq!(eval("i").unwrap(), Value::complex(0.0, 1.0));
}

#[test]
fn type_of_names_value_kinds() {
    assert_eq!(eval("typeOf(1)").unwrap(), Value::string("number"));
    assert_eq!(eval("typeOf(\"a\")").unwrap(), Value::string("string"));
    assert_eq!(eval("typeOf([1])").unwrap(), Value::string("Array"));
}

#[test]
fn units_convert_within_a_dimension() {
    let Value::Unit(inches) = eval("5 cm to inch").unwrap() else {
        panic!("expected a unit");
    };
    assert_eq!(inches.name(), "inch");
    assert!((inches.value().unwrap() - 5.0 / 2.54).abs() < 1e-9);
    assert!(eval("5 cm to kg").is_err());
}

// Namespace policy

#[test]
fn meta_functions_are_forbidden_by_default() {
    let err = eval("evaluate(\"1 + 1\")").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ForbiddenAccess {
            name: "evaluate".to_owned()
        }
    );
}

#[test]
fn allowed_meta_functions_evaluate_text() {
    let engine = Engine::builder().allow("evaluate").allow("parse").build();
    assert_eq!(
        engine.evaluate("evaluate(\"2 + 3\")").unwrap(),
        Value::Number(5.0)
    );
    assert_eq!(
        engine.evaluate("evaluate([\"1\", \"2 * 2\"])").unwrap(),
        numbers(&[1.0, 4.0])
    );
    assert_eq!(
        engine.evaluate("typeOf(parse(\"1 + x\"))").unwrap(),
        Value::string("OperatorNode")
    );
}

#[test]
fn standard_namespace_applies_configured_forbidden_names() {
    let config = Config {
        forbidden: vec!["sqrt".to_owned()],
        ..Config::default()
    };
    let namespace = standard_namespace(&config);
    assert!(namespace.is_forbidden("sqrt"));
    assert!(!namespace.is_forbidden("evaluate"));
}
