use super::*;
use pretty_assertions::assert_eq;

fn sym(name: &str) -> NodeRef {
    Rc::new(Node::Symbol(SymbolNode::new(name).unwrap()))
}

fn num(n: f64) -> NodeRef {
    Rc::new(Node::Constant(ConstantNode::new(Literal::Number(n))))
}

fn index(dims: Vec<NodeRef>) -> NodeRef {
    Rc::new(Node::Index(IndexNode::new(dims, false)))
}

#[test]
fn test_assignment_requires_symbol_or_accessor() {
    let err = AssignmentNode::new(num(1.0), None, num(2.0)).unwrap_err();
    assert_eq!(
        err,
        NodeError::TypeMismatch {
            node: "AssignmentNode",
            param: "object".to_owned(),
            expected: "SymbolNode or AccessorNode",
            actual: "ConstantNode".to_owned(),
        }
    );
}

#[test]
fn test_assignment_to_end_is_rejected() {
    let err = AssignmentNode::new(sym("end"), None, num(2.0)).unwrap_err();
    assert_eq!(err, NodeError::ReservedSymbol("end".to_owned()));
    assert!(err.to_string().contains("reserved symbol"));
}

#[test]
fn test_assignment_index_must_be_index_node() {
    let err = AssignmentNode::new(sym("a"), Some(num(1.0)), num(2.0)).unwrap_err();
    assert!(matches!(err, NodeError::TypeMismatch { ref param, .. } if param == "index"));
}

#[test]
fn test_accessor_requires_index_node() {
    assert!(AccessorNode::new(sym("a"), sym("b"), false).is_err());
    assert!(AccessorNode::new(sym("a"), index(vec![num(1.0)]), false).is_ok());
}

#[test]
fn test_invalid_names() {
    assert!(SymbolNode::new("").is_err());
    assert!(SymbolNode::new("2x").is_err());
    assert!(OperatorNode::new("+", "add me", vec![]).is_err());
    assert!(OperatorNode::new("", "add", vec![]).is_err());
    assert!(FunctionAssignmentNode::new("f", vec!["1x".to_owned()], num(1.0)).is_err());
}

#[test]
fn test_operator_arity() {
    assert!(matches!(
        OperatorNode::new("-", "unaryMinus", vec![]),
        Err(NodeError::Arity { count: 0, .. })
    ));
    assert!(matches!(
        OperatorNode::new("-", "subtract", vec![sym("a"), sym("b"), sym("c")]),
        Err(NodeError::Arity { count: 3, .. })
    ));
    assert!(OperatorNode::new("+", "add", vec![sym("a"), sym("b"), sym("c")]).is_ok());
    assert!(OperatorNode::new("*", "multiply", vec![sym("a"), sym("b"), sym("c")]).is_ok());
    assert!(OperatorNode::new("-", "unaryMinus", vec![sym("a")]).is_ok());
}

#[test]
fn test_identifier_and_content() {
    let add = Node::Operator(OperatorNode::new("+", "add", vec![num(1.0), num(2.0)]).unwrap());
    assert_eq!(add.identifier(), "OperatorNode:add");
    assert_eq!(add.type_name(), "OperatorNode");

    let wrapped = Node::Parenthesis(ParenthesisNode::new(Rc::new(Node::Parenthesis(
        ParenthesisNode::new(Rc::new(add.clone())),
    ))));
    assert_eq!(wrapped.content(), &add);
    assert_eq!(wrapped.identifier(), "ParenthesisNode");
}

#[test]
fn test_range_needs_end() {
    let range = RangeNode::new(num(1.0), sym("end"), None);
    assert!(range.needs_end());

    let plain = RangeNode::new(num(1.0), sym("n"), None);
    assert!(!plain.needs_end());

    // `end` inside a nested subscript belongs to that subscript
    let nested = Rc::new(Node::Accessor(
        AccessorNode::new(sym("b"), index(vec![sym("end")]), false).unwrap(),
    ));
    assert!(!RangeNode::new(num(1.0), nested, None).needs_end());
}

#[test]
fn test_index_object_property() {
    let dot = IndexNode::property("b");
    assert!(dot.is_object_property());
    assert_eq!(dot.object_property(), Some("b"));
    assert!(dot.dot_notation());

    let numeric = IndexNode::new(vec![num(1.0)], false);
    assert!(!numeric.is_object_property());
}

#[test]
fn test_function_assignment_types_default_to_any() {
    let params = vec!["x".to_owned(), "y".to_owned()];
    let f = FunctionAssignmentNode::new("f", params, sym("x")).unwrap();
    assert_eq!(f.types(), ["any", "any"]);
    assert!(f.clone().with_types(vec!["number".to_owned()]).is_err());
}

#[test]
fn test_clone_is_shallow() {
    let child = num(3.0);
    let node = Node::Parenthesis(ParenthesisNode::new(Rc::clone(&child)));
    let copy = node.clone();
    match (&node, &copy) {
        (Node::Parenthesis(a), Node::Parenthesis(b)) => assert!(Rc::ptr_eq(a.inner(), b.inner())),
        _ => unreachable!(),
    }
    assert_eq!(Rc::strong_count(&child), 3);
}
