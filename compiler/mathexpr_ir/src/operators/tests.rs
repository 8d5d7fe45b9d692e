use super::*;
use std::rc::Rc;

use crate::literal::Literal;
use crate::node::{ConstantNode, NodeRef, ParenthesisNode, RangeNode, SymbolNode};

fn sym(name: &str) -> NodeRef {
    Rc::new(Node::Symbol(SymbolNode::new(name).unwrap()))
}

fn num(n: f64) -> NodeRef {
    Rc::new(Node::Constant(ConstantNode::new(Literal::Number(n))))
}

fn op(symbol: &str, name: &str, args: Vec<NodeRef>) -> Node {
    Node::Operator(OperatorNode::new(symbol, name, args).unwrap())
}

fn parens_of(node: &Node, mode: ParenthesisMode) -> Vec<bool> {
    match node {
        Node::Operator(o) => operand_parens(node, o, mode, ImplicitMode::Hide, false),
        _ => unreachable!(),
    }
}

#[test]
fn test_levels_are_ordered() {
    let add = level_of("OperatorNode:add").unwrap();
    let mul = level_of("OperatorNode:multiply").unwrap();
    let pow = level_of("OperatorNode:pow").unwrap();
    let range = level_of("RangeNode").unwrap();
    let conditional = level_of("ConditionalNode").unwrap();
    assert!(conditional < range && range < add && add < mul && mul < pow);
    assert_eq!(level_of("SymbolNode"), None);
}

#[test]
fn test_implicit_multiplication_binds_tighter() {
    let explicit = op("*", "multiply", vec![num(2.0), sym("x")]);
    let implicit = Node::Operator(
        OperatorNode::new("*", "multiply", vec![num(2.0), sym("x")])
            .unwrap()
            .with_implicit(true),
    );
    let p = |n: &Node, m| precedence(n, ParenthesisMode::Keep, m);
    assert_eq!(p(&implicit, ImplicitMode::Hide), p(&explicit, ImplicitMode::Hide).map(|l| l + 1));
    assert_eq!(p(&implicit, ImplicitMode::Show), p(&explicit, ImplicitMode::Show));
}

#[test]
fn test_subtraction_is_not_associative() {
    let b_minus_c = Rc::new(op("-", "subtract", vec![sym("b"), sym("c")]));
    let right_nested = op("-", "subtract", vec![sym("a"), b_minus_c]);
    assert_eq!(parens_of(&right_nested, ParenthesisMode::Keep), [false, true]);

    let a_minus_b = Rc::new(op("-", "subtract", vec![sym("a"), sym("b")]));
    let left_nested = op("-", "subtract", vec![a_minus_b, sym("c")]);
    assert_eq!(parens_of(&left_nested, ParenthesisMode::Keep), [false, false]);
}

#[test]
fn test_addition_associates_with_subtraction() {
    let b_minus_c = Rc::new(op("-", "subtract", vec![sym("b"), sym("c")]));
    let node = op("+", "add", vec![sym("a"), b_minus_c]);
    assert_eq!(parens_of(&node, ParenthesisMode::Keep), [false, false]);
}

#[test]
fn test_power_is_right_associative() {
    let a_pow_b = Rc::new(op("^", "pow", vec![sym("a"), sym("b")]));
    let left_nested = op("^", "pow", vec![a_pow_b, sym("c")]);
    assert_eq!(parens_of(&left_nested, ParenthesisMode::Keep), [true, false]);

    let b_pow_c = Rc::new(op("^", "pow", vec![sym("b"), sym("c")]));
    let right_nested = op("^", "pow", vec![sym("a"), b_pow_c]);
    assert_eq!(parens_of(&right_nested, ParenthesisMode::Keep), [false, false]);
}

#[test]
fn test_unary_minus_wraps_weaker_operand() {
    let nested = op("-", "unaryMinus", vec![Rc::new(op("-", "unaryMinus", vec![sym("x")]))]);
    assert_eq!(parens_of(&nested, ParenthesisMode::Keep), [true]);
    let atom = op("-", "unaryMinus", vec![sym("x")]);
    assert_eq!(parens_of(&atom, ParenthesisMode::Keep), [false]);
}

#[test]
fn test_parenthesis_modes() {
    let grouped = Rc::new(Node::Parenthesis(ParenthesisNode::new(Rc::new(op(
        "+",
        "add",
        vec![sym("a"), sym("b")],
    )))));
    let node = op("*", "multiply", vec![grouped, sym("c")]);
    // the parenthesis node prints its own glyphs in keep mode
    assert_eq!(parens_of(&node, ParenthesisMode::Keep), [false, false]);
    assert_eq!(parens_of(&node, ParenthesisMode::Auto), [true, false]);

    let product = Rc::new(op("*", "multiply", vec![sym("b"), sym("c")]));
    let sum = op("+", "add", vec![sym("a"), product]);
    assert_eq!(parens_of(&sum, ParenthesisMode::All), [false, true]);
}

#[test]
fn test_constant_after_implicit_operand_is_wrapped() {
    let two_x = Rc::new(Node::Operator(
        OperatorNode::new("*", "multiply", vec![num(2.0), sym("x")])
            .unwrap()
            .with_implicit(true),
    ));
    let node = Node::Operator(
        OperatorNode::new("*", "multiply", vec![two_x, num(3.0)])
            .unwrap()
            .with_implicit(true),
    );
    assert_eq!(parens_of(&node, ParenthesisMode::Keep), [false, true]);
}

#[test]
fn test_child_needs_parens_for_range_bounds() {
    let range = Node::Range(RangeNode::new(
        sym("a"),
        Rc::new(Node::Range(RangeNode::new(num(1.0), num(2.0), None))),
        None,
    ));
    let inner = match &range {
        Node::Range(r) => Rc::clone(r.end()),
        _ => unreachable!(),
    };
    let (keep, hide) = (ParenthesisMode::Keep, ImplicitMode::Hide);
    assert!(child_needs_parens(&range, &inner, keep, hide, true));
    assert!(!child_needs_parens(&range, &num(1.0), keep, hide, true));
}
