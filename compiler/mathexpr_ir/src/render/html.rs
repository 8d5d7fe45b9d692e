use crate::literal::{quote, Literal};
use crate::node::{IndexNode, Node, NodeRef, OperatorNode};
use crate::operators::{
    associativity, child_needs_parens, operand_parens, receiver_needs_parens, Associativity,
};

use super::{ImplicitMode, ParenthesisMode, RenderOptions};

const OPEN_ROUND: &str = r#"<span class="math-parenthesis math-round-parenthesis">(</span>"#;
const CLOSE_ROUND: &str = r#"<span class="math-parenthesis math-round-parenthesis">)</span>"#;
const SEPARATOR: &str = r#"<span class="math-separator">,</span>"#;
const OPEN_SQUARE: &str = r#"<span class="math-parenthesis math-square-parenthesis">[</span>"#;
const CLOSE_SQUARE: &str = r#"<span class="math-parenthesis math-square-parenthesis">]</span>"#;
const OPEN_CURLY: &str = r#"<span class="math-parenthesis math-curly-parenthesis">{</span>"#;
const CLOSE_CURLY: &str = r#"<span class="math-parenthesis math-curly-parenthesis">}</span>"#;

const VARIABLE_ASSIGNMENT: &str = concat!(
    "math-operator math-assignment-operator ",
    "math-variable-assignment-operator math-binary-operator"
);
const PROPERTY_ASSIGNMENT: &str = concat!(
    "math-operator math-assignment-operator ",
    "math-property-assignment-operator math-binary-operator"
);

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn span(class: &str, text: &str) -> String {
    format!(r#"<span class="{class}">{}</span>"#, escape(text))
}

fn round(inner: &str) -> String {
    format!("{OPEN_ROUND}{inner}{CLOSE_ROUND}")
}

fn join_separated(parts: &[String]) -> String {
    parts.join(SEPARATOR)
}

pub(super) fn render(node: &Node, o: &RenderOptions) -> String {
    match node {
        Node::Symbol(s) => span("math-symbol", s.name()),
        Node::Constant(c) => match c.value() {
            Literal::Number(_) => span("math-number", &c.value().to_string()),
            Literal::String(_) => span("math-string", &c.value().to_string()),
            Literal::Boolean(_) => span("math-boolean", &c.value().to_string()),
            Literal::Null => span("math-null-symbol", "null"),
            Literal::Undefined => span("math-undefined", "undefined"),
        },
        Node::Parenthesis(p) => {
            if o.parenthesis == ParenthesisMode::Keep {
                round(&render(p.inner(), o))
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
                    round(&text)
                } else {
                    text
                }
            };
            format!(
                "{}{}{}{}{}",
                wrap(c.condition(), true),
                span("math-operator math-conditional-operator", "?"),
                wrap(c.true_expr(), true),
                span("math-operator math-conditional-operator", ":"),
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
                value = round(&value);
            }
            format!("{target}{}{value}", span(VARIABLE_ASSIGNMENT, "="))
        }
        Node::FunctionAssignment(f) => {
            let params: Vec<String> = f
                .params()
                .iter()
                .map(|p| span("math-symbol math-parameter", p))
                .collect();
            let mut expr = render(f.expr(), o);
            if child_needs_parens(node, f.expr(), o.parenthesis, o.implicit, true) {
                expr = round(&expr);
            }
            format!(
                "{}{}{}{expr}",
                span("math-function", f.name()),
                round(&join_separated(&params)),
                span(VARIABLE_ASSIGNMENT, "=")
            )
        }
        Node::FunctionCall(f) => {
            let args: Vec<String> = f.args().iter().map(|a| render(a, o)).collect();
            let callee = match &**f.callee() {
                Node::Symbol(s) => span("math-function", s.name()),
                other => receiver(other, o),
            };
            let optional = if f.optional() {
                span("math-operator math-accessor-operator", "?.")
            } else {
                String::new()
            };
            format!("{callee}{optional}{}", round(&join_separated(&args)))
        }
        Node::Range(r) => {
            let part = |child: &NodeRef| {
                let text = render(child, o);
                if child_needs_parens(node, child, o.parenthesis, o.implicit, true) {
                    round(&text)
                } else {
                    text
                }
            };
            let colon = span("math-operator math-range-operator", ":");
            match r.step() {
                Some(step) => format!(
                    "{}{colon}{}{colon}{}",
                    part(r.start()),
                    part(step),
                    part(r.end())
                ),
                None => format!("{}{colon}{}", part(r.start()), part(r.end())),
            }
        }
        Node::Array(a) => {
            let items: Vec<String> = a.items().iter().map(|i| render(i, o)).collect();
            format!("{OPEN_SQUARE}{}{CLOSE_SQUARE}", join_separated(&items))
        }
        Node::Object(obj) => {
            let entries: Vec<String> = obj
                .properties()
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}{}{}",
                        span("math-symbol math-property", &quote(key)),
                        span(PROPERTY_ASSIGNMENT, ":"),
                        render(value, o)
                    )
                })
                .collect();
            format!("{OPEN_CURLY}{}{CLOSE_CURLY}", join_separated(&entries))
        }
        Node::Block(b) => b
            .blocks()
            .iter()
            .map(|entry| {
                let text = render(&entry.node, o);
                if entry.visible {
                    text
                } else {
                    text + r#"<span class="math-separator">;</span>"#
                }
            })
            .collect::<Vec<_>>()
            .join(r#"<span class="math-separator"><br /></span>"#),
    }
}

fn receiver(object: &Node, o: &RenderOptions) -> String {
    let text = render(object, o);
    if receiver_needs_parens(object) {
        round(&text)
    } else {
        text
    }
}

fn index(i: &IndexNode, optional: bool, o: &RenderOptions) -> String {
    let accessor = if optional { "?." } else { "." };
    match (i.dot_notation(), i.object_property()) {
        (true, Some(key)) => format!(
            "{}{}",
            span("math-operator math-accessor-operator", accessor),
            span("math-symbol math-property", key)
        ),
        _ => {
            let dims: Vec<String> = i.dimensions().iter().map(|d| render(d, o)).collect();
            let prefix = if optional {
                span("math-operator math-accessor-operator", "?.")
            } else {
                String::new()
            };
            format!("{prefix}{OPEN_SQUARE}{}{CLOSE_SQUARE}", join_separated(&dims))
        }
    }
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
                round(&text)
            } else {
                text
            }
        })
        .collect();
    let hidden_implicit =
        op.implicit() && op.fn_name() == "multiply" && o.implicit == ImplicitMode::Hide;
    let binary = |symbol: &str| {
        if hidden_implicit {
            span("math-operator math-binary-operator math-implicit-binary-operator", "")
        } else {
            span(
                "math-operator math-binary-operator math-explicit-binary-operator",
                symbol,
            )
        }
    };

    match operands.as_slice() {
        [operand] => match associativity(node, o.parenthesis) {
            Some(Associativity::Left) => format!(
                "{operand}{}",
                span("math-operator math-unary-operator math-righthand-unary-operator", op.op())
            ),
            _ => format!(
                "{}{operand}",
                span("math-operator math-unary-operator math-lefthand-unary-operator", op.op())
            ),
        },
        [lhs, rhs] => format!("{lhs}{}{rhs}", binary(op.op())),
        many if matches!(op.fn_name(), "add" | "multiply") && many.len() > 2 => {
            many.join(&binary(op.op()))
        }
        _ => {
            let args: Vec<String> = op.args().iter().map(|a| render(a, o)).collect();
            format!(
                "{}{}",
                span("math-function", op.fn_name()),
                round(&join_separated(&args))
            )
        }
    }
}
