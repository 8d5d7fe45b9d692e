use super::*;
use pretty_assertions::assert_eq;

fn sym(name: &str) -> NodeRef {
    Rc::new(Node::Symbol(SymbolNode::new(name).unwrap()))
}

fn lit(value: Literal) -> NodeRef {
    Rc::new(Node::Constant(ConstantNode::new(value)))
}

fn num(n: f64) -> NodeRef {
    lit(Literal::Number(n))
}

fn round_trip(node: &Node) {
    let decoded = Node::from_json(&node.to_json()).unwrap();
    assert_eq!(&decoded, node);
}

#[test]
fn test_round_trip_every_variant() {
    let add = Rc::new(Node::Operator(
        OperatorNode::new("+", "add", vec![sym("x"), num(2.0)]).unwrap(),
    ));
    let percent = Node::Operator(
        OperatorNode::new("/", "divide", vec![num(50.0), num(100.0)])
            .unwrap()
            .with_percentage(true),
    );
    let two_x = Node::Operator(
        OperatorNode::new("*", "multiply", vec![num(2.0), sym("x")])
            .unwrap()
            .with_implicit(true),
    );
    let index = Rc::new(Node::Index(IndexNode::new(vec![num(1.0), sym("end")], false)));
    let dot = Rc::new(Node::Index(IndexNode::property("b")));
    let mut properties = IndexMap::new();
    properties.insert("a".to_owned(), num(1.0));
    properties.insert("b c".to_owned(), lit(Literal::String("s".into())));

    let nodes = vec![
        Node::Symbol(SymbolNode::new("x").unwrap()),
        Node::Constant(ConstantNode::new(Literal::Number(1.5))),
        Node::Constant(ConstantNode::new(Literal::Number(f64::INFINITY))),
        Node::Constant(ConstantNode::new(Literal::String("hi".into()))),
        Node::Constant(ConstantNode::new(Literal::Boolean(false))),
        Node::Constant(ConstantNode::new(Literal::Null)),
        Node::Constant(ConstantNode::new(Literal::Undefined)),
        (*add).clone(),
        percent,
        two_x,
        Node::Conditional(ConditionalNode::new(sym("c"), num(1.0), num(2.0))),
        Node::Parenthesis(ParenthesisNode::new(Rc::clone(&add))),
        Node::Accessor(AccessorNode::new(sym("a"), Rc::clone(&index), true).unwrap()),
        Node::Assignment(AssignmentNode::new(sym("a"), Some(Rc::clone(&dot)), num(3.0)).unwrap()),
        Node::Assignment(AssignmentNode::new(sym("a"), None, Rc::clone(&add)).unwrap()),
        Node::FunctionCall(FunctionNode::new(sym("f"), vec![num(1.0)], true)),
        Node::FunctionAssignment(
            FunctionAssignmentNode::new("f", vec!["x".to_owned()], Rc::clone(&add))
                .unwrap()
                .with_types(vec!["number".to_owned()])
                .unwrap(),
        ),
        Node::Range(RangeNode::new(num(1.0), sym("end"), Some(num(2.0)))),
        Node::Range(RangeNode::new(num(1.0), num(5.0), None)),
        (*index).clone(),
        Node::Array(ArrayNode::new(vec![num(1.0), Rc::clone(&add)])),
        Node::Object(ObjectNode::new(properties)),
        Node::Block(BlockNode::new(vec![
            BlockEntry { node: Rc::clone(&add), visible: false },
            BlockEntry { node: sym("x"), visible: true },
        ])),
    ];
    for node in &nodes {
        round_trip(node);
    }
}

#[test]
fn test_encoding_shape() {
    let node = Node::Operator(OperatorNode::new("+", "add", vec![sym("x"), num(2.0)]).unwrap());
    assert_eq!(
        node.to_json(),
        json!({
            "mathjs": "OperatorNode",
            "op": "+",
            "fn": "add",
            "args": [
                { "mathjs": "SymbolNode", "name": "x" },
                { "mathjs": "ConstantNode", "value": 2.0 },
            ],
            "implicit": false,
            "isPercentage": false,
        })
    );
}

#[test]
fn test_non_node_condition_is_a_type_error() {
    let json = json!({
        "mathjs": "ConditionalNode",
        "condition": 1,
        "trueExpr": { "mathjs": "ConstantNode", "value": 1 },
        "falseExpr": { "mathjs": "ConstantNode", "value": 2 },
    });
    let err = Node::from_json(&json).unwrap_err();
    assert_eq!(
        err,
        NodeError::TypeMismatch {
            node: "ConditionalNode",
            param: "condition".to_owned(),
            expected: "a Node",
            actual: "number".to_owned(),
        }
    );
    assert!(err.to_string().starts_with("TypeError"));
}

#[test]
fn test_unknown_and_missing() {
    assert_eq!(
        Node::from_json(&json!({ "mathjs": "WidgetNode" })).unwrap_err(),
        NodeError::UnknownType("WidgetNode".to_owned())
    );
    assert!(matches!(
        Node::from_json(&json!({ "mathjs": "ParenthesisNode" })).unwrap_err(),
        NodeError::MissingField { field, .. } if field == "content"
    ));
}

#[test]
fn test_decoding_validates_assignment_target() {
    let json = json!({
        "mathjs": "AssignmentNode",
        "object": { "mathjs": "SymbolNode", "name": "end" },
        "index": null,
        "value": { "mathjs": "ConstantNode", "value": 1 },
    });
    assert_eq!(
        Node::from_json(&json).unwrap_err(),
        NodeError::ReservedSymbol("end".to_owned())
    );
}
