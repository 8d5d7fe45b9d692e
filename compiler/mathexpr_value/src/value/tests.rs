use super::*;

use mathexpr_ir::{Literal, SymbolNode};
use pretty_assertions::assert_eq;

use crate::errors::EvalErrorKind;

#[test]
fn type_tags() {
    assert_eq!(Value::Number(1.0).type_of(), "number");
    assert_eq!(Value::string("a").type_of(), "string");
    assert_eq!(Value::complex(0.0, 1.0).type_of(), "Complex");
    assert_eq!(Value::array(vec![]).type_of(), "Array");
    assert_eq!(Value::Null.type_of(), "null");
    assert_eq!(Value::from(Node::from(Literal::Number(1.0))).type_of(), "ConstantNode");
}

#[test]
fn truthiness_table() {
    let cases = [
        (Value::Number(0.0), false),
        (Value::Number(f64::NAN), false),
        (Value::Number(-2.0), true),
        (Value::Boolean(true), true),
        (Value::string(""), false),
        (Value::string("0"), true),
        (Value::Null, false),
        (Value::Undefined, false),
        (Value::BigNumber(Decimal::ZERO), false),
        (Value::BigNumber(Decimal::new(1, 3)), true),
        (Value::complex(0.0, 0.0), false),
        (Value::complex(0.0, 2.0), true),
    ];
    for (value, expected) in cases {
        assert_eq!(value.truthy().unwrap(), expected, "{value:?}");
    }
}

#[test]
fn unit_truthiness_follows_value() {
    assert!(Value::Unit(Unit::parse("cm").unwrap().with_value(2.0)).truthy().unwrap());
    assert!(!Value::Unit(Unit::parse("cm").unwrap()).truthy().unwrap());
}

#[test]
fn containers_have_no_truth_value() {
    let err = Value::array(vec![Value::Number(1.0)]).truthy().unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnsupportedCondition {
            type_name: "Array".to_owned()
        }
    );
}

#[test]
fn complex_formatting() {
    assert_eq!(Value::complex(0.0, 2.0).to_string(), "2i");
    assert_eq!(Value::complex(0.0, -1.0).to_string(), "-i");
    assert_eq!(Value::complex(1.0, -2.0).to_string(), "1 - 2i");
    assert_eq!(Value::complex(3.0, 1.0).to_string(), "3 + i");
    assert_eq!(Value::complex(4.0, 0.0).to_string(), "4");
}

#[test]
fn container_formatting() {
    let matrix = Value::array(vec![
        Value::array(vec![Value::Number(1.0), Value::Number(2.0)]),
        Value::array(vec![Value::Number(3.0), Value::Number(4.0)]),
    ]);
    assert_eq!(matrix.to_string(), "[[1, 2], [3, 4]]");

    let mut map = IndexMap::new();
    map.insert("a".to_owned(), Value::string("x"));
    assert_eq!(Value::object(map).to_string(), r#"{"a": "x"}"#);
}

#[test]
fn clone_shares_payload() {
    let a = Value::array(vec![Value::Number(1.0)]);
    let b = a.clone();
    let (Value::Array(x), Value::Array(y)) = (&a, &b) else {
        panic!("not arrays");
    };
    assert!(Heap::ptr_eq(x, y));
}

#[test]
fn node_values_convert_back() {
    let node: NodeRef = Rc::new(Node::Symbol(SymbolNode::new("x").unwrap()));
    let back = NodeRef::try_from(Value::Node(Rc::clone(&node))).unwrap();
    assert!(Rc::ptr_eq(&node, &back));

    let err = NodeRef::try_from(Value::Number(1.0)).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
}
