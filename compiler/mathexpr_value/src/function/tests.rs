use super::*;

use pretty_assertions::assert_eq;

use crate::errors::EvalErrorKind;
use crate::scope::MapScope;

fn tag(label: &'static str) -> impl Fn(&[Value]) -> EvalResult {
    move |_| Ok(Value::string(label))
}

fn add() -> TypedFunction {
    TypedFunction::new("add")
        .signature("number, number", |args| {
            Ok(Value::Number(
                args[0].expect_number("number")? + args[1].expect_number("number")?,
            ))
        })
        .signature("Complex, Complex", tag("complex"))
        .signature("string, string", tag("strings"))
}

#[test]
fn exact_signature_wins() {
    let f = add();
    assert_eq!(
        f.call(&[Value::Number(1.0), Value::Number(2.0)]).unwrap(),
        Value::Number(3.0)
    );
    assert_eq!(
        f.call(&[Value::string("a"), Value::string("b")]).unwrap(),
        Value::string("strings")
    );
}

#[test]
fn boolean_converts_to_number() {
    assert_eq!(
        add().call(&[Value::Boolean(true), Value::Number(2.0)]).unwrap(),
        Value::Number(3.0)
    );
}

#[test]
fn number_converts_to_complex_when_no_number_signature_fits() {
    let f = add();
    assert_eq!(
        f.call(&[Value::Number(1.0), Value::complex(0.0, 1.0)])
            .unwrap(),
        Value::string("complex")
    );
}

#[test]
fn unmatched_types_report_actual_types() {
    let err = add()
        .call(&[Value::Number(1.0), Value::string("x")])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NoMatchingSignature {
            name: "add".to_owned(),
            types: vec!["number".to_owned(), "string".to_owned()],
        }
    );
}

#[test]
fn wrong_count_is_an_arity_error() {
    let err = add().call(&[Value::Number(1.0)]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ArityMismatch {
            name: "add".to_owned(),
            expected: 2,
            got: 1,
        }
    );
}

#[test]
fn variadic_needs_at_least_one() {
    let max = TypedFunction::new("max").signature("...number", tag("max"));
    assert!(max.call(&[Value::Number(1.0)]).is_ok());
    assert!(max
        .call(&[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
        .is_ok());
    let err = max.call(&[]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ArityMismatch {
            name: "max".to_owned(),
            expected: 1,
            got: 0,
        }
    );
}

#[test]
fn alternatives_and_any() {
    let size = TypedFunction::new("size")
        .signature("Array|Matrix", tag("array"))
        .signature("any", tag("scalar"));
    assert_eq!(
        size.call(&[Value::array(vec![])]).unwrap(),
        Value::string("array")
    );
    assert_eq!(
        size.call(&[Value::Null]).unwrap(),
        Value::string("scalar")
    );
}

#[test]
fn patterns_are_listed_in_order() {
    let f = add();
    let patterns: Vec<&str> = f.patterns().collect();
    assert_eq!(
        patterns,
        vec!["number, number", "Complex, Complex", "string, string"]
    );
}

#[test]
fn raw_functions_refuse_values() {
    let raw = Function::raw("and", |_, _, _| Ok(Value::Boolean(true)));
    assert!(raw.is_raw());
    assert!(raw.call(&[]).is_err());

    let namespace = Rc::new(Namespace::new());
    let scope = MapScope::new().into_ref();
    assert_eq!(
        raw.call_raw(&[], &namespace, &scope).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn identity_equality() {
    let f = Function::typed(add());
    let g = f.clone();
    assert!(f.ptr_eq(&g));
    assert!(!f.ptr_eq(&Function::typed(add())));
    assert_eq!(f.name(), "add");
}
