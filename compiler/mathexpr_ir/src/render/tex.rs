use crate::literal::{format_number, Literal};
use crate::node::{FunctionNode, IndexNode, Node, NodeRef, OperatorNode};
use crate::operators::{
    associativity, child_needs_parens, operand_parens, receiver_needs_parens, Associativity,
};

use super::{ImplicitMode, ParenthesisMode, RenderOptions, TexOverride};

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "varpi", "rho", "varrho",
    "sigma", "varsigma", "tau", "upsilon", "phi", "varphi", "chi", "psi", "omega", "Gamma",
    "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
];

fn symbol(name: &str) -> String {
    match name {
        "Infinity" => r"\infty".to_owned(),
        "NaN" => r"\mathrm{NaN}".to_owned(),
        "null" | "undefined" | "true" | "false" => format!(r"\mathrm{{{name}}}"),
        _ if GREEK.contains(&name) => format!("\\{name}"),
        _ => name.to_owned(),
    }
}

fn number(n: f64) -> String {
    let text = format_number(n);
    match text.split_once('e') {
        Some((mantissa, exp)) => format!(r"{mantissa}\cdot10^{{{exp}}}"),
        None => match text.as_str() {
            "Infinity" => r"\infty".to_owned(),
            "-Infinity" => r"-\infty".to_owned(),
            "NaN" => r"\mathrm{NaN}".to_owned(),
            _ => text,
        },
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '{' | '}' | '$' | '&' | '#' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            other => out.push(other),
        }
    }
    out
}

fn round(inner: &str) -> String {
    format!(r"\left({inner}\right)")
}

fn operator_symbol(fn_name: &str, op: &str) -> String {
    match fn_name {
        "add" => "+",
        "subtract" | "unaryMinus" => "-",
        "unaryPlus" => "+",
        "multiply" => r"\cdot",
        "dotMultiply" => r".\cdot",
        "dotDivide" => "./",
        "mod" => r"\mod",
        "pow" => "^",
        "dotPow" => ".^",
        "not" => r"\neg",
        "and" => r"\wedge",
        "or" => r"\vee",
        "xor" => r"\veebar",
        "equal" => "=",
        "unequal" => r"\neq",
        "smaller" => "<",
        "larger" => ">",
        "smallerEq" => r"\leq",
        "largerEq" => r"\geq",
        "factorial" => "!",
        "to" => r"\rightarrow",
        _ => return op.to_owned(),
    }
    .to_owned()
}

pub(super) fn render(node: &Node, o: &RenderOptions) -> String {
    match node {
        Node::Symbol(s) => symbol(s.name()),
        Node::Constant(c) => match c.value() {
            Literal::Number(n) => number(*n),
            Literal::String(s) => format!(r#"\mathtt{{"{}"}}"#, escape_text(s)),
            Literal::Boolean(true) => r"\mathrm{True}".to_owned(),
            Literal::Boolean(false) => r"\mathrm{False}".to_owned(),
            Literal::Null => r"\mathrm{null}".to_owned(),
            Literal::Undefined => r"\mathrm{undefined}".to_owned(),
        },
        Node::Parenthesis(p) => {
            if o.parenthesis == ParenthesisMode::Keep {
                round(&render(p.inner(), o))
            } else {
                render(p.inner(), o)
            }
        }
        Node::Operator(op) => operator(node, op, o),
        Node::Conditional(c) => format!(
            concat!(
                r"\begin{{cases}} {{{}}}, &\quad{{\text{{if }}\;{}}}\\",
                r"{{{}}}, &\quad{{\text{{otherwise}}}}\end{{cases}}"
            ),
            render(c.true_expr(), o),
            render(c.condition(), o),
            render(c.false_expr(), o)
        ),
        Node::Accessor(a) => {
            let index = a.index().map(|i| index(i, o)).unwrap_or_default();
            format!("{}{index}", receiver(a.object(), o))
        }
        Node::Index(i) => index(i, o),
        Node::Assignment(a) => {
            let mut target = render(a.object(), o);
            if let Some(i) = a.index() {
                target.push_str(&index(i, o));
            }
            let mut value = render(a.value(), o);
            if child_needs_parens(node, a.value(), o.parenthesis, o.implicit, true) {
                value = round(&value);
            }
            format!("{target}:={value}")
        }
        Node::FunctionAssignment(f) => {
            let params: Vec<String> = f.params().iter().map(|p| symbol(p.as_str())).collect();
            let mut expr = render(f.expr(), o);
            if child_needs_parens(node, f.expr(), o.parenthesis, o.implicit, true) {
                expr = round(&expr);
            }
            format!(r"\mathrm{{{}}}{}:={expr}", f.name(), round(&params.join(",")))
        }
        Node::FunctionCall(f) => function_call(f, o),
        Node::Range(r) => {
            let part = |child: &NodeRef| {
                let text = render(child, o);
                if child_needs_parens(node, child, o.parenthesis, o.implicit, true) {
                    round(&text)
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
            let rows: Vec<String> = a
                .items()
                .iter()
                .map(|item| match &**item {
                    Node::Array(row) => row
                        .items()
                        .iter()
                        .map(|cell| render(cell, o))
                        .collect::<Vec<_>>()
                        .join("&"),
                    other => render(other, o),
                })
                .collect();
            format!(r"\begin{{bmatrix}}{}\end{{bmatrix}}", rows.join(r"\\"))
        }
        Node::Object(obj) => {
            let entries: String = obj
                .properties()
                .iter()
                .map(|(key, value)| {
                    format!(r"\mathbf{{{}:}} & {}\\", escape_text(key), render(value, o))
                })
                .collect();
            format!(r"\left\{{\begin{{array}}{{ll}}{entries}\end{{array}}\right\}}")
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
            .join("\\;\\;\n"),
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

fn index(i: &IndexNode, o: &RenderOptions) -> String {
    match (i.dot_notation(), i.object_property()) {
        (true, Some(key)) => format!(".{}", escape_text(key)),
        _ => {
            let dims: Vec<String> = i.dimensions().iter().map(|d| render(d, o)).collect();
            format!("_{{{}}}", dims.join(","))
        }
    }
}

/// Built-in templates for functions with a conventional notation.
fn default_template(name: &str) -> Option<&'static str> {
    Some(match name {
        "sqrt" => r"\sqrt{${args[0]}}",
        "abs" => r"\left|${args[0]}\right|",
        "exp" => r"\exp\left(${args[0]}\right)",
        "log" => r"\ln\left(${args[0]}\right)",
        "sin" => r"\sin\left(${args[0]}\right)",
        "cos" => r"\cos\left(${args[0]}\right)",
        "tan" => r"\tan\left(${args[0]}\right)",
        "factorial" => r"\left(${args[0]}\right)!",
        _ => return None,
    })
}

/// Expand `${name}`, `${args}` and `${args[i]}`. Unknown placeholders are
/// emitted verbatim.
fn expand_template(template: &str, name: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let field = &after[..end];
        let replacement = match field {
            "name" => Some(name.to_owned()),
            "args" => Some(args.join(",")),
            _ => field
                .strip_prefix("args[")
                .and_then(|i| i.strip_suffix(']'))
                .and_then(|i| i.parse::<usize>().ok())
                .and_then(|i| args.get(i).cloned()),
        };
        match replacement {
            Some(text) => out.push_str(&text),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn function_call(f: &FunctionNode, o: &RenderOptions) -> String {
    let name = f.name();
    match o.tex_override(name) {
        Some(TexOverride::Callback(callback)) => return callback(f, o),
        Some(TexOverride::Template(template)) => {
            let args: Vec<String> = f.args().iter().map(|a| render(a, o)).collect();
            return expand_template(template, &symbol(name), &args);
        }
        None => {}
    }
    let args: Vec<String> = f.args().iter().map(|a| render(a, o)).collect();
    if let Node::Symbol(_) = &**f.callee() {
        if let Some(template) = default_template(name) {
            return expand_template(template, name, &args);
        }
        return format!(r"\mathrm{{{name}}}{}", round(&args.join(",")));
    }
    format!("{}{}", receiver(f.callee(), o), round(&args.join(",")))
}

fn operator(node: &Node, op: &OperatorNode, o: &RenderOptions) -> String {
    let parens = operand_parens(node, op, o.parenthesis, o.implicit, true);
    let symbol_tex = operator_symbol(op.fn_name(), op.op());
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

    match operands.as_slice() {
        [operand] => match associativity(node, o.parenthesis) {
            Some(Associativity::Left) => format!("{operand}{symbol_tex}"),
            _ if symbol_tex.starts_with('\\') => format!("{symbol_tex} {operand}"),
            _ => format!("{symbol_tex}{operand}"),
        },
        [lhs, rhs] => match op.fn_name() {
            "divide" => format!(r"\frac{{{lhs}}}{{{rhs}}}"),
            "pow" => {
                let base = op.args()[0].content();
                let lhs = if matches!(base, Node::Conditional(_))
                    || base.identifier() == "OperatorNode:divide"
                {
                    round(&format!("{{{lhs}}}"))
                } else {
                    format!("{{{lhs}}}")
                };
                format!("{lhs}^{{{rhs}}}")
            }
            _ if hidden_implicit => format!(r"{lhs}\,{rhs}"),
            _ => format!("{lhs} {symbol_tex} {rhs}"),
        },
        many if matches!(op.fn_name(), "add" | "multiply") && many.len() > 2 => {
            if hidden_implicit {
                many.join(r"\,")
            } else {
                many.join(&format!(" {symbol_tex} "))
            }
        }
        _ => {
            let args: Vec<String> = op.args().iter().map(|a| render(a, o)).collect();
            format!(r"\mathrm{{{}}}{}", op.fn_name(), round(&args.join(",")))
        }
    }
}
