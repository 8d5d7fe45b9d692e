//! Operator precedence, associativity and the parenthesization policy.
//!
//! Tables are keyed by [`Node::identifier`]: `"OperatorNode:<fn>"` for
//! operators, the node type name otherwise. A lower level binds weaker.

use crate::literal::Literal;
use crate::node::{Node, OperatorNode};
use crate::render::{ImplicitMode, ParenthesisMode};

/// Precedence levels, weakest first.
const PRECEDENCE: &[&[&str]] = &[
    &["AssignmentNode", "FunctionAssignmentNode"],
    &["ConditionalNode"],
    &["OperatorNode:or"],
    &["OperatorNode:xor"],
    &["OperatorNode:and"],
    &["OperatorNode:bitOr"],
    &["OperatorNode:bitXor"],
    &["OperatorNode:bitAnd"],
    &[
        "OperatorNode:equal",
        "OperatorNode:unequal",
        "OperatorNode:smaller",
        "OperatorNode:larger",
        "OperatorNode:smallerEq",
        "OperatorNode:largerEq",
    ],
    &[
        "OperatorNode:leftShift",
        "OperatorNode:rightArithShift",
        "OperatorNode:rightLogShift",
    ],
    &["OperatorNode:to"],
    &["RangeNode"],
    &["OperatorNode:add", "OperatorNode:subtract"],
    &[
        "OperatorNode:multiply",
        "OperatorNode:divide",
        "OperatorNode:dotMultiply",
        "OperatorNode:dotDivide",
        "OperatorNode:mod",
    ],
    &[
        "OperatorNode:unaryPlus",
        "OperatorNode:unaryMinus",
        "OperatorNode:bitNot",
        "OperatorNode:not",
    ],
    &["OperatorNode:pow", "OperatorNode:dotPow"],
    &["OperatorNode:factorial"],
    &["OperatorNode:ctranspose", "OperatorNode:transpose"],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Precedence level of an identifier, `None` for nodes that never need
/// parentheses (symbols, constants, calls, ...).
pub fn level_of(identifier: &str) -> Option<usize> {
    PRECEDENCE
        .iter()
        .position(|level| level.contains(&identifier))
}

fn subject(node: &Node, parenthesis: ParenthesisMode) -> &Node {
    if parenthesis == ParenthesisMode::Keep {
        node
    } else {
        node.content()
    }
}

/// Precedence of `node` in the current rendering modes.
///
/// Hidden implicit multiplication binds one level tighter than explicit
/// multiplication, so `2 x / 3` and `a / 2 x` keep their grouping.
pub fn precedence(
    node: &Node,
    parenthesis: ParenthesisMode,
    implicit: ImplicitMode,
) -> Option<usize> {
    let node = subject(node, parenthesis);
    let level = level_of(&node.identifier())?;
    match node {
        Node::Operator(op)
            if op.implicit() && op.fn_name() == "multiply" && implicit == ImplicitMode::Hide =>
        {
            Some(level + 1)
        }
        _ => Some(level),
    }
}

pub fn associativity(node: &Node, parenthesis: ParenthesisMode) -> Option<Associativity> {
    let identifier = subject(node, parenthesis).identifier();
    match identifier.as_str() {
        "OperatorNode:unaryPlus"
        | "OperatorNode:unaryMinus"
        | "OperatorNode:bitNot"
        | "OperatorNode:not"
        | "OperatorNode:pow"
        | "OperatorNode:dotPow" => Some(Associativity::Right),
        "OperatorNode:or"
        | "OperatorNode:xor"
        | "OperatorNode:and"
        | "OperatorNode:bitOr"
        | "OperatorNode:bitXor"
        | "OperatorNode:bitAnd"
        | "OperatorNode:equal"
        | "OperatorNode:unequal"
        | "OperatorNode:smaller"
        | "OperatorNode:larger"
        | "OperatorNode:smallerEq"
        | "OperatorNode:largerEq"
        | "OperatorNode:leftShift"
        | "OperatorNode:rightArithShift"
        | "OperatorNode:rightLogShift"
        | "OperatorNode:to"
        | "OperatorNode:add"
        | "OperatorNode:subtract"
        | "OperatorNode:multiply"
        | "OperatorNode:divide"
        | "OperatorNode:dotMultiply"
        | "OperatorNode:dotDivide"
        | "OperatorNode:mod"
        | "OperatorNode:factorial"
        | "OperatorNode:ctranspose"
        | "OperatorNode:transpose" => Some(Associativity::Left),
        _ => None,
    }
}

/// Whether `(a op b) op2 c == a op (b op2 c)` holds for `a`'s operator with
/// `b`'s operator.
pub fn is_associative_with(a: &Node, b: &Node, parenthesis: ParenthesisMode) -> bool {
    let a = subject(a, parenthesis).identifier();
    let b = subject(b, parenthesis).identifier();
    let with: &[&str] = match a.as_str() {
        "OperatorNode:add" => &["OperatorNode:add", "OperatorNode:subtract"],
        "OperatorNode:multiply" => &["OperatorNode:multiply", "OperatorNode:divide"],
        _ => &[],
    };
    with.contains(&b.as_str())
}

/// TeX renders these without surrounding parentheses on the given side.
fn latex_parens_allowed(identifier: &str) -> bool {
    !matches!(identifier, "OperatorNode:divide" | "ConditionalNode")
}

fn latex_left_parens_allowed(identifier: &str) -> bool {
    !matches!(identifier, "OperatorNode:divide" | "ConditionalNode")
}

fn latex_right_parens_allowed(identifier: &str) -> bool {
    !matches!(
        identifier,
        "OperatorNode:divide" | "OperatorNode:pow" | "OperatorNode:dotPow" | "ConditionalNode"
    )
}

fn starts_with_constant(node: &Node, parenthesis: ParenthesisMode) -> bool {
    let mut current = node;
    if parenthesis == ParenthesisMode::Auto {
        current = current.content();
    }
    match current {
        Node::Constant(_) => true,
        Node::Operator(op) => op
            .args()
            .first()
            .is_some_and(|first| starts_with_constant(first, parenthesis)),
        _ => false,
    }
}

/// A negative number printed bare as the base of `^` reads back as the
/// negation of the power (`-2 ^ 2` is `-(2 ^ 2)`).
fn is_negative_constant(node: &Node, parenthesis: ParenthesisMode) -> bool {
    matches!(
        subject(node, parenthesis),
        Node::Constant(constant)
            if matches!(constant.value(), Literal::Number(n) if n.is_sign_negative())
    )
}

/// Decide, per operand, whether it must be wrapped in parentheses.
///
/// `root` is the operator node itself (as a [`Node`]), `op` its payload.
pub fn operand_parens(
    root: &Node,
    op: &OperatorNode,
    parenthesis: ParenthesisMode,
    implicit: ImplicitMode,
    latex: bool,
) -> Vec<bool> {
    let mut result = grouping_parens(root, op, parenthesis, implicit, latex);
    let is_power = matches!(op.fn_name(), "pow" | "dotPow");
    if let (true, [base, _], Some(wrap)) = (is_power, op.args(), result.first_mut()) {
        if is_negative_constant(base, parenthesis) {
            *wrap = true;
        }
    }
    result
}

/// Parentheses required by precedence and associativity alone.
fn grouping_parens(
    root: &Node,
    op: &OperatorNode,
    parenthesis: ParenthesisMode,
    implicit: ImplicitMode,
    latex: bool,
) -> Vec<bool> {
    let args = op.args();
    let root_id = root.identifier();

    if parenthesis == ParenthesisMode::All {
        return args
            .iter()
            .map(|arg| {
                !matches!(
                    arg.content(),
                    Node::Array(_) | Node::Constant(_) | Node::Symbol(_) | Node::Parenthesis(_)
                )
            })
            .collect();
    }

    let root_precedence = precedence(root, parenthesis, implicit);
    let root_assoc = associativity(root, parenthesis);
    let content_id = |n: &Node| subject(n, parenthesis).identifier();

    let mut result = match args {
        [] => Vec::new(),
        [operand] => {
            let operand_precedence = precedence(operand, parenthesis, implicit);
            let suppressed = latex
                && operand_precedence.is_some()
                && (!latex_left_parens_allowed(&content_id(root))
                    || !latex_parens_allowed(&content_id(operand)));
            let needs = match (operand_precedence, root_precedence) {
                _ if suppressed => false,
                (Some(inner), Some(outer)) => inner <= outer,
                _ => false,
            };
            vec![needs]
        }
        [lhs, rhs] => {
            let lhs_precedence = precedence(lhs, parenthesis, implicit);
            let mut lhs_parens = match (lhs_precedence, root_precedence) {
                (None, _) | (_, None) => false,
                (Some(l), Some(p)) => {
                    (l == p
                        && root_assoc == Some(Associativity::Right)
                        && !is_associative_with(root, lhs, parenthesis))
                        || l < p
                }
            };
            let rhs_precedence = precedence(rhs, parenthesis, implicit);
            let mut rhs_parens = match (rhs_precedence, root_precedence) {
                (None, _) | (_, None) => false,
                (Some(r), Some(p)) => {
                    (r == p
                        && root_assoc == Some(Associativity::Left)
                        && !is_associative_with(root, rhs, parenthesis))
                        || r < p
                }
            };
            if latex {
                let root_id = content_id(root);
                if lhs_precedence.is_some()
                    && (!latex_left_parens_allowed(&root_id)
                        || !latex_parens_allowed(&content_id(lhs)))
                {
                    lhs_parens = false;
                }
                if rhs_precedence.is_some()
                    && (!latex_right_parens_allowed(&root_id)
                        || !latex_parens_allowed(&content_id(rhs)))
                {
                    rhs_parens = false;
                }
            }
            vec![lhs_parens, rhs_parens]
        }
        _ => args
            .iter()
            .map(|arg| {
                let arg_precedence = precedence(arg, parenthesis, implicit);
                match (arg_precedence, root_precedence) {
                    (None, _) | (_, None) => false,
                    (Some(a), Some(p)) => {
                        (a == p
                            && root_assoc == associativity(arg, parenthesis)
                            && !is_associative_with(root, arg, parenthesis))
                            || a < p
                    }
                }
            })
            .collect(),
    };

    // A constant right after an unparenthesized operand of hidden implicit
    // multiplication would read as one juxtaposed token (`2 (x+1) 3`).
    if args.len() >= 2
        && root_id == "OperatorNode:multiply"
        && op.implicit()
        && implicit == ImplicitMode::Hide
    {
        for i in 1..result.len() {
            if starts_with_constant(&args[i], parenthesis)
                && !result[i - 1]
                && (parenthesis != ParenthesisMode::Keep
                    || !matches!(*args[i - 1], Node::Parenthesis(_)))
            {
                result[i] = true;
            }
        }
    }

    result
}

/// Generic rule for a child of a non-operator node: wrap it when it binds
/// weaker than (or, with `or_equal`, as weak as) the parent.
pub fn child_needs_parens(
    parent: &Node,
    child: &Node,
    parenthesis: ParenthesisMode,
    implicit: ImplicitMode,
    or_equal: bool,
) -> bool {
    if parenthesis == ParenthesisMode::All {
        return true;
    }
    match (
        precedence(child, parenthesis, implicit),
        precedence(parent, parenthesis, implicit),
    ) {
        (Some(c), Some(p)) => c < p || (or_equal && c == p),
        _ => false,
    }
}

/// Receivers of `.prop`, `[i]` and `(args)` print bare only when they are
/// atoms.
pub fn receiver_needs_parens(node: &Node) -> bool {
    !matches!(
        node,
        Node::Accessor(_)
            | Node::Array(_)
            | Node::Constant(_)
            | Node::FunctionCall(_)
            | Node::Object(_)
            | Node::Parenthesis(_)
            | Node::Symbol(_)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
