use super::*;
use crate::node::{ConstantNode, SymbolNode};
use pretty_assertions::assert_eq;

fn sym(name: &str) -> NodeRef {
    Rc::new(Node::Symbol(SymbolNode::new(name).unwrap()))
}

fn num(n: f64) -> NodeRef {
    Rc::new(Node::Constant(ConstantNode::new(Literal::Number(n))))
}

fn op(symbol: &str, name: &str, args: Vec<NodeRef>) -> NodeRef {
    Rc::new(Node::Operator(OperatorNode::new(symbol, name, args).unwrap()))
}

#[test]
fn test_for_each_is_shallow_with_paths() {
    let tree = op("+", "add", vec![sym("x"), op("*", "multiply", vec![num(2.0), sym("y")])]);
    let mut seen = Vec::new();
    tree.for_each(|child, path, parent| {
        assert_eq!(parent.type_name(), "OperatorNode");
        seen.push((path.to_owned(), child.type_name()));
    });
    assert_eq!(
        seen,
        vec![
            ("args[0]".to_owned(), "SymbolNode"),
            ("args[1]".to_owned(), "OperatorNode"),
        ]
    );
}

#[test]
fn test_conditional_paths() {
    let node = Node::Conditional(ConditionalNode::new(sym("c"), num(1.0), num(2.0)));
    let paths: Vec<String> = node.children().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, ["condition", "trueExpr", "falseExpr"]);
}

#[test]
fn test_map_wraps_plain_values_in_constants() {
    let tree = op("+", "add", vec![sym("x"), sym("y")]);
    let mapped = tree
        .map(|child, _, _| match &**child {
            Node::Symbol(s) if s.name() == "x" => 10.0_f64.into_node(),
            _ => Rc::clone(child),
        })
        .unwrap();
    assert_eq!(mapped.to_string(), "10 + y");
    // the original is untouched
    assert_eq!(tree.to_string(), "x + y");
}

#[test]
fn test_map_revalidates() {
    let accessor = Node::Accessor(
        AccessorNode::new(sym("a"), Rc::new(Node::Index(IndexNode::property("b"))), false).unwrap(),
    );
    let result = accessor.map(|child, path, _| {
        if path == "index" {
            sym("oops")
        } else {
            Rc::clone(child)
        }
    });
    assert!(result.is_err());
}

#[test]
fn test_traverse_is_preorder() {
    let tree = op("+", "add", vec![sym("x"), op("*", "multiply", vec![num(2.0), sym("y")])]);
    let mut order = Vec::new();
    tree.traverse(|node, _, _| order.push(node.to_string()));
    assert_eq!(order, ["x + 2 * y", "x", "2 * y", "2", "y"]);
}

#[test]
fn test_transform_replaces_symbols() {
    let tree = op("+", "add", vec![sym("x"), op("^", "pow", vec![sym("x"), num(2.0)])]);
    let replaced = tree
        .transform(|node, _, _| node.is_symbol_named("x").then(|| num(3.0)))
        .unwrap();
    assert_eq!(replaced.to_string(), "3 + 3 ^ 2");
}

#[test]
fn test_filter_collects_matches() {
    let tree = op("+", "add", vec![sym("x"), op("*", "multiply", vec![num(2.0), sym("y")])]);
    let symbols: Vec<String> = tree
        .filter(|node| matches!(node, Node::Symbol(_)))
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(symbols, ["x", "y"]);
}
