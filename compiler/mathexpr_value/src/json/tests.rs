use super::*;

use mathexpr_ir::SymbolNode;
use pretty_assertions::assert_eq;

use crate::function::Function;

fn round_trip(value: &Value) -> Value {
    revive(&value.to_json().unwrap()).unwrap()
}

#[test]
fn complex_encoding() {
    let value = Value::complex(0.0, 2.0);
    assert_eq!(
        value.to_json().unwrap(),
        json!({ "mathjs": "Complex", "re": 0.0, "im": 2.0 })
    );
    assert_eq!(round_trip(&value), value);
}

#[test]
fn tagged_numbers_survive() {
    let big = Value::BigNumber(Decimal::from_str("0.1").unwrap());
    let third = Value::Fraction(Fraction::new(1, 3).unwrap());
    let length = Value::Unit(Unit::parse("cm").unwrap().with_value(5.0));
    for value in [big, third, length] {
        assert_eq!(round_trip(&value), value);
    }
}

#[test]
fn fraction_fields_may_be_strings() {
    let json = json!({ "mathjs": "Fraction", "n": "2", "d": "4" });
    assert_eq!(
        revive(&json).unwrap(),
        Value::Fraction(Fraction::new(1, 2).unwrap())
    );
}

#[test]
fn valueless_unit() {
    let json = json!({ "mathjs": "Unit", "value": null, "unit": "km" });
    let value = revive(&json).unwrap();
    assert_eq!(value.to_string(), "km");
}

#[test]
fn non_finite_numbers() {
    let json = Value::Number(f64::NEG_INFINITY).to_json().unwrap();
    assert_eq!(json, json!({ "mathjs": "number", "value": "-Infinity" }));
    assert_eq!(revive(&json).unwrap(), Value::Number(f64::NEG_INFINITY));
}

#[test]
fn node_json_revives_as_node() {
    let node = Node::Symbol(SymbolNode::new("x").unwrap());
    let value = revive(&node.to_json()).unwrap();
    assert_eq!(value.type_of(), "SymbolNode");
    assert_eq!(value, Value::node(Rc::new(node)));
}

#[test]
fn nested_containers() {
    let mut map = IndexMap::new();
    map.insert("z".to_owned(), Value::complex(1.0, -1.0));
    map.insert("a".to_owned(), Value::array(vec![Value::Boolean(true), Value::Null]));
    let value = Value::object(map);
    let json = value.to_json().unwrap();
    assert_eq!(
        json.as_object().unwrap().keys().collect::<Vec<_>>(),
        vec!["z", "a"]
    );
    assert_eq!(revive(&json).unwrap(), value);
}

#[test]
fn result_sets_and_matrices() {
    let set = Value::result_set(vec![Value::Number(3.0), Value::Number(4.0)]);
    assert_eq!(round_trip(&set), set);

    let matrix = json!({ "mathjs": "DenseMatrix", "data": [[1, 2], [3, 4]], "size": [2, 2] });
    assert_eq!(revive(&matrix).unwrap().to_string(), "[[1, 2], [3, 4]]");
}

#[test]
fn unknown_tag_is_a_plain_object() {
    let json = json!({ "mathjs": "Chain", "value": 1 });
    let value = revive(&json).unwrap();
    assert_eq!(value.type_of(), "Object");
}

#[test]
fn functions_cannot_be_encoded() {
    let f = Value::Function(Function::native("sqrt", |args| Ok(args[0].clone())));
    assert!(f.to_json().is_err());
}

#[test]
fn malformed_tags_are_errors() {
    assert!(revive(&json!({ "mathjs": "Complex", "re": 1 })).is_err());
    assert!(revive(&json!({ "mathjs": "Unit", "value": 1, "unit": "parsec" })).is_err());
    assert!(revive(&json!({ "mathjs": "Fraction", "n": 1, "d": 0 })).is_err());
}
