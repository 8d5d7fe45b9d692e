use crate::literal::quote;
use crate::node::{IndexNode, Node, NodeRef, OperatorNode};
use crate::operators::{
    associativity, child_needs_parens, operand_parens, receiver_needs_parens, Associativity,
};

use super::{ImplicitMode, ParenthesisMode, RenderOptions};

pub(super) fn render(node: &Node, o: &RenderOptions) -> String {
    match node {
        Node::Symbol(s) => s.name().to_owned(),
        Node::Constant(c) => c.value().to_string(),
        Node::Parenthesis(p) => {
            if o.parenthesis == ParenthesisMode::Keep {
                format!("({})", render(p.inner(), o))
            } else {
                render(p.inner(), o)
            }
        }
        Node::Operator(op) => operator(node, op, o),
        Node::Conditional(c) => {
            let wrap = |child: &NodeRef, or_equal: bool| {
                let text = render(child, o);
                if matches!(**child, Node::Operator(_))
                    || child_needs_parens(node, child, o.parenthesis, o.implicit, or_equal)
                {
                    format!("({text})")
                } else {
                    text
                }
            };
            format!(
                "{} ? {} : {}",
                wrap(c.condition(), true),
                wrap(c.true_expr(), true),
                wrap(c.false_expr(), false)
            )
        }
        Node::Accessor(a) => {
            let index = a.index().map(|i| index(i, a.optional_chaining(), o));
            format!("{}{}", receiver(a.object(), o), index.unwrap_or_default())
        }
        Node::Index(i) => index(i, false, o),
        Node::Assignment(a) => {
            let mut target = render(a.object(), o);
            if let Some(i) = a.index() {
                target.push_str(&index(i, false, o));
            }
            let mut value = render(a.value(), o);
            if child_needs_parens(node, a.value(), o.parenthesis, o.implicit, true) {
                value = format!("({value})");
            }
            format!("{target} = {value}")
        }
        Node::FunctionAssignment(f) => {
            let mut expr = render(f.expr(), o);
            if child_needs_parens(node, f.expr(), o.parenthesis, o.implicit, true) {
                expr = format!("({expr})");
            }
            format!("{}({}) = {expr}", f.name(), f.params().join(", "))
        }
        Node::FunctionCall(f) => {
            let args: Vec<String> = f.args().iter().map(|a| render(a, o)).collect();
            format!(
                "{}{}({})",
                receiver(f.callee(), o),
                if f.optional() { "?." } else { "" },
                args.join(", ")
            )
        }
        Node::Range(r) => {
            let part = |child: &NodeRef| {
                let text = render(child, o);
                if child_needs_parens(node, child, o.parenthesis, o.implicit, true) {
                    format!("({text})")
                } else {
                    text
                }
            };
            match r.step() {
                Some(step) => format!("{}:{}:{}", part(r.start()), part(step), part(r.end())),
                None => format!("{}:{}", part(r.start()), part(r.end())),
            }
        }
        Node::Array(a) => {
            let items: Vec<String> = a.items().iter().map(|i| render(i, o)).collect();
            format!("[{}]", items.join(", "))
        }
        Node::Object(obj) => {
            let entries: Vec<String> = obj
                .properties()
                .iter()
                .map(|(key, value)| format!("{}: {}", quote(key), render(value, o)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Node::Block(b) => b
            .blocks()
            .iter()
            .map(|entry| {
                let text = render(&entry.node, o);
                if entry.visible {
                    text
                } else {
                    text + ";"
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn receiver(object: &Node, o: &RenderOptions) -> String {
    let text = render(object, o);
    if receiver_needs_parens(object) {
        format!("({text})")
    } else {
        text
    }
}

fn index(i: &IndexNode, optional: bool, o: &RenderOptions) -> String {
    match (i.dot_notation(), i.object_property()) {
        (true, Some(key)) => format!("{}.{key}", if optional { "?" } else { "" }),
        _ => {
            let dims: Vec<String> = i.dimensions().iter().map(|d| render(d, o)).collect();
            format!("{}[{}]", if optional { "?." } else { "" }, dims.join(", "))
        }
    }
}

fn is_named(op: &str) -> bool {
    op.chars().any(char::is_alphabetic)
}

fn operator(node: &Node, op: &OperatorNode, o: &RenderOptions) -> String {
    let parens = operand_parens(node, op, o.parenthesis, o.implicit, false);
    let operands: Vec<String> = op
        .args()
        .iter()
        .zip(&parens)
        .map(|(arg, wrap)| {
            let text = render(arg, o);
            if *wrap {
                format!("({text})")
            } else {
                text
            }
        })
        .collect();
    let hidden_implicit =
        op.implicit() && op.fn_name() == "multiply" && o.implicit == ImplicitMode::Hide;

    match operands.as_slice() {
        [operand] => {
            let space = if is_named(op.op()) { " " } else { "" };
            match associativity(node, o.parenthesis) {
                Some(Associativity::Right) => format!("{}{space}{operand}", op.op()),
                Some(Associativity::Left) => format!("{operand}{space}{}", op.op()),
                None => format!("{operand}{}", op.op()),
            }
        }
        [lhs, rhs] => {
            if hidden_implicit {
                format!("{lhs} {rhs}")
            } else {
                format!("{lhs} {} {rhs}", op.op())
            }
        }
        many if matches!(op.fn_name(), "add" | "multiply") && many.len() > 2 => {
            if hidden_implicit {
                many.join(" ")
            } else {
                many.join(&format!(" {} ", op.op()))
            }
        }
        _ => {
            let args: Vec<String> = op.args().iter().map(|a| render(a, o)).collect();
            format!("{}({})", op.fn_name(), args.join(", "))
        }
    }
}
