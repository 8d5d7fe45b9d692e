//! End-to-end evaluation through the public entry points.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use indexmap::IndexMap;
use mathexpr_eval::{
    evaluate, evaluate_all, evaluate_with, Config, Engine, EvalErrorKind, Function, MapScope,
    TypedFunction, Value,
};
use pretty_assertions::assert_eq;

#[test]
fn evaluates_a_single_expression() {
    assert_eq!(evaluate("(2 + 3) / 4").unwrap(), Value::Number(1.25));
    assert_eq!(evaluate("sqrt(-4)").unwrap(), Value::complex(0.0, 2.0));
}

#[test]
fn evaluates_against_a_caller_scope() {
    let scope = MapScope::new().with("a", 3.0).with("b", 4.0).into_ref();
    assert_eq!(evaluate_with("a * b", &scope).unwrap(), Value::Number(12.0));
}

#[test]
fn batch_evaluation_shares_one_scope() {
    let scope = MapScope::new().into_ref();
    let results = evaluate_all(&["a = 3", "b = 4", "a * b"], &scope).unwrap();
    assert_eq!(
        results,
        vec![Value::Number(3.0), Value::Number(4.0), Value::Number(12.0)]
    );
    assert_eq!(scope.borrow().get("b"), Some(Value::Number(4.0)));
}

#[test]
fn batch_evaluation_stops_at_the_first_error() {
    let scope = MapScope::new().into_ref();
    let err = evaluate_all(&["a = 1", "nope(1)", "b = 2"], &scope).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UndefinedFunction { .. }));
    assert_eq!(scope.borrow().get("b"), None);
}

#[test]
fn untaken_branches_are_never_evaluated() {
    assert_eq!(
        evaluate("true ? 1 : undefined_fn()").unwrap(),
        Value::Number(1.0)
    );
}

#[test]
fn optional_chaining_yields_undefined() {
    let scope = MapScope::new().with("a", Value::Null).into_ref();
    assert_eq!(evaluate_with("a?.b.c", &scope).unwrap(), Value::Undefined);
}

#[test]
fn assignments_return_the_assigned_value() {
    let scope = MapScope::new().into_ref();
    assert_eq!(evaluate_with("a = 3", &scope).unwrap(), Value::Number(3.0));

    let scope = MapScope::new()
        .with("a", Value::object(IndexMap::new()))
        .into_ref();
    assert_eq!(evaluate_with("a.b = 3", &scope).unwrap(), Value::Number(3.0));
    let Some(Value::Object(a)) = scope.borrow().get("a") else {
        panic!("expected an object");
    };
    assert_eq!(a.get("b"), Some(&Value::Number(3.0)));
}

#[test]
fn nested_subscript_assignment() {
    let scope = MapScope::new().into_ref();
    evaluate_with("m = [[1, 2], [3, 4]]", &scope).unwrap();
    evaluate_with("m[2, 1] = 7", &scope).unwrap();
    assert_eq!(evaluate_with("m[2, 1] + m[end, end]", &scope).unwrap(), Value::Number(11.0));
}

#[test]
fn functions_see_their_scope_but_not_leak_parameters() {
    let scope = MapScope::new().with("a", 2.0).into_ref();
    evaluate_with("f(x) = x + a", &scope).unwrap();
    assert_eq!(evaluate_with("f(5)", &scope).unwrap(), Value::Number(7.0));
    assert!(!scope.borrow().has("x"));
    evaluate_with("a = 10", &scope).unwrap();
    assert_eq!(evaluate_with("f(5)", &scope).unwrap(), Value::Number(15.0));
}

#[test]
fn recursive_functions() {
    let scope = MapScope::new().into_ref();
    evaluate_with("fact(n) = n <= 1 ? 1 : n * fact(n - 1)", &scope).unwrap();
    assert_eq!(evaluate_with("fact(6)", &scope).unwrap(), Value::Number(720.0));
}

#[test]
fn forbidden_and_undefined_functions_fail_differently() {
    let forbidden = evaluate("evaluate(\"1\")").unwrap_err();
    assert_eq!(
        forbidden.kind,
        EvalErrorKind::ForbiddenAccess {
            name: "evaluate".to_owned()
        }
    );
    let missing = evaluate("nosuchfn(1)").unwrap_err();
    assert_eq!(
        missing.kind,
        EvalErrorKind::UndefinedFunction {
            name: "nosuchfn".to_owned()
        }
    );
}

#[test]
fn syntax_errors_carry_a_position() {
    let err = evaluate("1 +").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Syntax { .. }));
}

#[test]
fn units_convert() {
    let Value::Unit(unit) = evaluate("5 cm to inch").unwrap() else {
        panic!("expected a unit");
    };
    assert!((unit.value().unwrap() - 1.968_503_937).abs() < 1e-6);
}

#[test]
fn end_refers_to_the_indexed_object() {
    let scope = MapScope::new().into_ref();
    evaluate_with("v = [1, 2, 3, 4, 5]", &scope).unwrap();
    assert_eq!(
        evaluate_with("v[end - 1:end]", &scope).unwrap(),
        Value::array(vec![Value::Number(4.0), Value::Number(5.0)])
    );
}

#[test]
fn compiled_expressions_are_reusable() {
    let engine = Engine::new();
    let node = engine.parse("x ^ 2 + 1").unwrap();
    let compiled = engine.compile(&node).unwrap();
    for (x, expected) in [(1.0, 2.0), (2.0, 5.0), (3.0, 10.0)] {
        let scope = MapScope::new().with("x", x).into_ref();
        assert_eq!(compiled.evaluate(&scope).unwrap(), Value::Number(expected));
    }
}

#[test]
fn builder_functions_replace_builtins() {
    let engine = Engine::builder()
        .function(Function::typed(
            TypedFunction::new("double").signature("number", |args| {
                Ok(Value::Number(2.0 * args[0].expect_number("a number")?))
            }),
        ))
        .constant("answer", 42.0)
        .build();
    assert_eq!(engine.evaluate("double(answer)").unwrap(), Value::Number(84.0));
}

#[test]
fn builder_forbids_names() {
    let engine = Engine::builder().forbid("sqrt").build();
    let err = engine.evaluate("sqrt(4)").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ForbiddenAccess { .. }));
}

#[test]
fn configuration_loads_from_json() {
    let config = Config::from_json_str(r#"{"predictable": true, "forbidden": []}"#).unwrap();
    let engine = Engine::builder().config(config).build();
    assert!(engine
        .evaluate("sqrt(-1)")
        .unwrap()
        .as_number()
        .is_some_and(f64::is_nan));
    assert_eq!(engine.evaluate("evaluate(\"2\")").unwrap(), Value::Number(2.0));
}

#[test]
fn format_uses_configured_render_options() {
    let engine = Engine::new();
    let node = engine.parse("(1 + 2) * x").unwrap();
    assert_eq!(engine.format(&node), "(1 + 2) * x");
}
