use super::*;

use indexmap::IndexMap;
use mathexpr_value::{EvalErrorKind, MapScope};
use pretty_assertions::assert_eq;

use crate::builtins::standard_namespace;
use crate::config::Config;

fn namespace() -> Rc<Namespace> {
    Rc::new(standard_namespace(&Config::default()))
}

fn compiled(source: &str, arg_names: &[&str]) -> EvalResult<Evaluator> {
    let node = mathexpr_parse::parse(source).unwrap();
    let names: ArgNames = arg_names.iter().map(|name| (*name).to_owned()).collect();
    compile(&node, &namespace(), &names)
}

fn run(source: &str, scope: &ScopeRef) -> EvalResult {
    compiled(source, &[])?(scope, &Args::default(), &mut EvalContext::new())
}

fn empty() -> ScopeRef {
    MapScope::new().into_ref()
}

fn numbers(values: &[f64]) -> Value {
    Value::array(values.iter().copied().map(Value::Number).collect())
}

// Symbols

#[test]
fn parameters_read_the_argument_map_not_the_scope() {
    let scope = MapScope::new().with("x", 100.0).into_ref();
    let evaluate = compiled("x + 1", &["x"]).unwrap();
    let mut args = Args::default();
    args.insert("x".to_owned(), Value::Number(2.0));
    assert_eq!(
        evaluate(&scope, &args, &mut EvalContext::new()).unwrap(),
        Value::Number(3.0)
    );
}

#[test]
fn scope_shadows_namespace_constants() {
    let scope = MapScope::new().with("pi", 3.0).into_ref();
    assert_eq!(run("pi", &scope).unwrap(), Value::Number(3.0));
    assert_eq!(run("pi", &empty()).unwrap(), Value::Number(std::f64::consts::PI));
}

#[test]
fn unknown_names_fall_back_to_units() {
    let value = run("cm", &empty()).unwrap();
    assert_eq!(value.type_of(), "Unit");
}

#[test]
fn unknown_names_without_a_unit_are_undefined() {
    let err = run("nosuchname", &empty()).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedSymbol {
            name: "nosuchname".to_owned()
        }
    );
}

// Operators and conditionals

#[test]
fn operators_call_their_namespace_functions() {
    assert_eq!(run("(2 + 3) / 4", &empty()).unwrap(), Value::Number(1.25));
    assert_eq!(run("2 ^ 3 ^ 2", &empty()).unwrap(), Value::Number(512.0));
    assert_eq!(run("-(1 + 2)", &empty()).unwrap(), Value::Number(-3.0));
}

#[test]
fn conditional_evaluates_one_branch() {
    assert_eq!(
        run("true ? 1 : undefined_fn()", &empty()).unwrap(),
        Value::Number(1.0)
    );
    assert_eq!(
        run("0 ? undefined_fn() : 2", &empty()).unwrap(),
        Value::Number(2.0)
    );
}

#[test]
fn conditional_rejects_conditions_without_truth_value() {
    let err = run("[1] ? 1 : 2", &empty()).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::UnsupportedCondition { .. }));
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(
        run("false and undefined_fn()", &empty()).unwrap(),
        Value::Boolean(false)
    );
    assert_eq!(
        run("true or undefined_fn()", &empty()).unwrap(),
        Value::Boolean(true)
    );
}

// Accessors

#[test]
fn optional_chain_short_circuits_every_later_link() {
    let scope = MapScope::new().with("a", Value::Null).into_ref();
    assert_eq!(run("a?.b.c", &scope).unwrap(), Value::Undefined);
    assert_eq!(run("a?.b.c.d", &scope).unwrap(), Value::Undefined);
}

#[test]
fn optional_markers_later_in_a_chain() {
    let scope = empty();
    run("a = {b: {c: null}}", &scope).unwrap();
    assert_eq!(run("a?.b.c?.d.e", &scope).unwrap(), Value::Undefined);
    assert!(run("a?.b.c.d?.e", &scope).is_err());

    run("a = {b: {c: {d: {e: 5}}}}", &scope).unwrap();
    assert_eq!(run("a?.b.c?.d.e", &scope).unwrap(), Value::Number(5.0));
}

#[test]
fn short_circuit_does_not_escape_into_operands() {
    let scope = MapScope::new().with("a", Value::Null).into_ref();
    assert_eq!(
        run("[a?.b.c, 1 + 1]", &scope).unwrap(),
        Value::array(vec![Value::Undefined, Value::Number(2.0)])
    );
}

#[test]
fn parentheses_end_a_chain() {
    let scope = MapScope::new().with("a", Value::Null).into_ref();
    let err = run("(a?.b).c", &scope).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::InvalidPropertyAccess { .. }));
}

#[test]
fn plain_access_on_null_fails() {
    let scope = MapScope::new().with("a", Value::Null).into_ref();
    assert!(run("a.b", &scope).is_err());
}

#[test]
fn optional_call_on_null_callee_is_undefined() {
    let scope = MapScope::new().with("f", Value::Null).into_ref();
    assert_eq!(run("f?.(1)", &scope).unwrap(), Value::Undefined);
}

#[test]
fn optional_method_call_on_a_missing_method_is_undefined() {
    let scope = MapScope::new()
        .with("o", Value::object(IndexMap::new()))
        .into_ref();
    assert_eq!(run("o.m?.()", &scope).unwrap(), Value::Undefined);
    assert_eq!(run("o?.m?.()", &scope).unwrap(), Value::Undefined);
    assert_eq!(run("o.m?.(1).x", &scope).unwrap(), Value::Undefined);

    let err = run("o.m()", &scope).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::PropertyNotFound {
            key: "m".to_owned()
        }
    );
}

#[test]
fn optional_method_call_still_calls_a_present_method() {
    let double = Function::native("double", |args: &[Value]| {
        Ok(Value::Number(2.0 * args[0].expect_number("a number")?))
    });
    let methods = IndexMap::from([("double".to_owned(), Value::Function(double))]);
    let scope = MapScope::new().with("o", Value::object(methods)).into_ref();
    assert_eq!(run("o.double?.(3)", &scope).unwrap(), Value::Number(6.0));
}

#[test]
fn missing_property_is_an_error() {
    let scope = MapScope::new()
        .with("a", Value::object(IndexMap::new()))
        .into_ref();
    let err = run("a.b", &scope).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::PropertyNotFound {
            key: "b".to_owned()
        }
    );
}

#[test]
fn end_is_the_size_of_the_indexed_dimension() {
    let scope = MapScope::new()
        .with("x", numbers(&[10.0, 20.0, 30.0, 40.0]))
        .into_ref();
    assert_eq!(run("x[end]", &scope).unwrap(), Value::Number(40.0));
    assert_eq!(run("x[end - 1]", &scope).unwrap(), Value::Number(30.0));
    assert_eq!(
        run("x[2:end]", &scope).unwrap(),
        numbers(&[20.0, 30.0, 40.0])
    );
}

#[test]
fn end_binds_per_receiver() {
    let scope = MapScope::new()
        .with("x", numbers(&[1.0, 2.0, 3.0]))
        .with("y", numbers(&[5.0, 6.0]))
        .into_ref();
    assert_eq!(run("x[end] + y[end]", &scope).unwrap(), Value::Number(9.0));
}

// Assignment

#[test]
fn assignment_binds_and_returns_the_value() {
    let scope = empty();
    assert_eq!(run("a = 3", &scope).unwrap(), Value::Number(3.0));
    assert_eq!(scope.borrow().get("a"), Some(Value::Number(3.0)));
}

#[test]
fn property_assignment_returns_the_assigned_value() {
    let scope = MapScope::new()
        .with("a", Value::object(IndexMap::new()))
        .into_ref();
    assert_eq!(run("a.b = 3", &scope).unwrap(), Value::Number(3.0));
    assert_eq!(run("a.b", &scope).unwrap(), Value::Number(3.0));
}

#[test]
fn subscript_assignment_rebinds_the_variable() {
    let scope = MapScope::new()
        .with("a", numbers(&[1.0, 2.0, 3.0]))
        .into_ref();
    assert_eq!(run("a[2] = 9", &scope).unwrap(), Value::Number(9.0));
    assert_eq!(
        scope.borrow().get("a"),
        Some(numbers(&[1.0, 9.0, 3.0]))
    );
}

#[test]
fn nested_property_assignment_rebuilds_every_level() {
    let scope = empty();
    run("a = {b: {c: 1}, k: 2}", &scope).unwrap();
    assert_eq!(run("a.b.c = 5", &scope).unwrap(), Value::Number(5.0));
    assert_eq!(run("a.b.c", &scope).unwrap(), Value::Number(5.0));
    assert_eq!(run("a.k", &scope).unwrap(), Value::Number(2.0));
}

#[test]
fn subscript_assignment_through_a_property() {
    let scope = empty();
    run("a = {b: [1, 2, 3]}", &scope).unwrap();
    assert_eq!(run("a.b[2] = 9", &scope).unwrap(), Value::Number(9.0));
    assert_eq!(run("a.b", &scope).unwrap(), numbers(&[1.0, 9.0, 3.0]));

    let Some(Value::Object(a)) = scope.borrow().get("a") else {
        panic!("expected an object");
    };
    assert_eq!(a.get("b"), Some(&numbers(&[1.0, 9.0, 3.0])));
}

#[test]
fn end_inside_a_nested_assignment_index() {
    let scope = empty();
    run("a = {b: [1, 2, 3]}", &scope).unwrap();
    assert_eq!(run("a.b[end] = 7", &scope).unwrap(), Value::Number(7.0));
    assert_eq!(run("a.b", &scope).unwrap(), numbers(&[1.0, 2.0, 7.0]));
}

// Functions

#[test]
fn defined_functions_close_over_their_scope() {
    let scope = MapScope::new().with("a", 2.0).into_ref();
    run("f(x) = x + a", &scope).unwrap();
    assert_eq!(run("f(5)", &scope).unwrap(), Value::Number(7.0));
    assert!(!scope.borrow().has("x"));
}

#[test]
fn defined_functions_check_arity() {
    let scope = empty();
    run("f(x, y) = x * y", &scope).unwrap();
    let err = run("f(1)", &scope).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ArityMismatch { .. }));
}

#[test]
fn calling_a_non_function_fails() {
    let scope = MapScope::new().with("n", 4.0).into_ref();
    let err = run("n(1)", &scope).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::NotCallable { .. }));
}

#[test]
fn not_callable_names_the_callee_source() {
    let four = Function::native("four", |_: &[Value]| Ok(Value::Number(4.0)));
    let scope = MapScope::new().with("g", Value::Function(four)).into_ref();
    let err = run("g()(2)", &scope).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NotCallable {
            source: "g()".to_owned(),
            value: "4".to_owned(),
        }
    );
}

#[test]
fn raw_callees_are_rechecked_on_every_call() {
    let mut namespace = standard_namespace(&Config::default());
    namespace.insert_function(Function::raw("quote", |nodes, _, _| {
        Ok(Value::string(nodes[0].to_string()))
    }));
    let node = mathexpr_parse::parse("quote(1 + 1)").unwrap();
    let evaluate = compile(&node, &Rc::new(namespace), &ArgNames::default()).unwrap();

    let raw = evaluate(&empty(), &Args::default(), &mut EvalContext::new()).unwrap();
    assert_eq!(raw, Value::string("1 + 1"));

    let first = Function::native("first", |args: &[Value]| Ok(args[0].clone()));
    let rebound = MapScope::new()
        .with("quote", Value::Function(first))
        .into_ref();
    let evaluated = evaluate(&rebound, &Args::default(), &mut EvalContext::new()).unwrap();
    assert_eq!(evaluated, Value::Number(2.0));
}

#[test]
fn compiling_twice_gives_equivalent_evaluators() {
    let scope = MapScope::new().with("x", 4.0).into_ref();
    let first = compiled("x ^ 2 - 1", &[]).unwrap();
    let second = compiled("x ^ 2 - 1", &[]).unwrap();
    let mut ctx = EvalContext::new();
    assert_eq!(
        first(&scope, &Args::default(), &mut ctx).unwrap(),
        second(&scope, &Args::default(), &mut ctx).unwrap()
    );
}

#[test]
fn methods_are_read_from_the_receiver() {
    let double = Function::native("double", |args: &[Value]| {
        Ok(Value::Number(2.0 * args[0].expect_number("a number")?))
    });
    let methods = IndexMap::from([("double".to_owned(), Value::Function(double))]);
    let scope = MapScope::new().with("obj", Value::object(methods)).into_ref();
    assert_eq!(run("obj.double(4)", &scope).unwrap(), Value::Number(8.0));
}

// Collections

#[test]
fn blocks_collect_visible_results() {
    let scope = empty();
    assert_eq!(
        run("a = 1; b = 2\na + b", &scope).unwrap(),
        Value::result_set(vec![Value::Number(2.0), Value::Number(3.0)])
    );
}

#[test]
fn ranges_are_inclusive() {
    assert_eq!(run("1:3", &empty()).unwrap(), numbers(&[1.0, 2.0, 3.0]));
    assert_eq!(run("0:2:6", &empty()).unwrap(), numbers(&[0.0, 2.0, 4.0, 6.0]));
}

#[test]
fn object_literals_keep_key_order() {
    let value = run("{b: 1, a: 2}", &empty()).unwrap();
    let Value::Object(map) = value else {
        panic!("expected object");
    };
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["b", "a"]);
}
