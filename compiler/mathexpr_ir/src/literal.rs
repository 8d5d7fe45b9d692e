//! Constant values stored directly in the tree.

use std::fmt;

/// A literal held by a [`ConstantNode`](crate::ConstantNode).
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
}

impl Literal {
    /// Type name of the literal, matching the runtime `typeOf` names.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
            Literal::Boolean(_) => "boolean",
            Literal::Null => "null",
            Literal::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => f.write_str(&format_number(*n)),
            Literal::String(s) => f.write_str(&quote(s)),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
            Literal::Undefined => f.write_str("undefined"),
        }
    }
}

/// Format a number the way expressions print it.
///
/// Integers print without a fractional part, very large and very small
/// magnitudes switch to exponent notation with an explicit sign
/// (`1e+21`, `1e-8`), and non-finite values print as `Infinity`,
/// `-Infinity` and `NaN`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-7) {
        let formatted = format!("{n:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    format!("{n}")
}

/// Double-quote a string with JSON escaping.
pub(crate) fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integers_and_fractions() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(1.25), "1.25");
    }

    #[test]
    fn test_format_extremes() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(2e-8), "2e-8");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::String("a\"b".into()).to_string(), r#""a\"b""#);
        assert_eq!(Literal::Boolean(true).to_string(), "true");
        assert_eq!(Literal::Undefined.to_string(), "undefined");
    }
}
