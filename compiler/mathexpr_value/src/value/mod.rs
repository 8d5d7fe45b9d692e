//! Runtime values.
//!
//! `Value` is a closed union. Every variant has a stable type tag from
//! [`Value::type_of`]; typed dispatch and the conditional truthiness table
//! both key on that tag. Heap payloads sit behind [`Heap`], so cloning a value
//! never copies an array or object.

mod heap;

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use mathexpr_ir::{format_number, Node, NodeRef};
use num_complex::Complex64;
use rust_decimal::Decimal;

use crate::errors::{type_error, unsupported_condition, EvalError, EvalResult};
use crate::fraction::Fraction;
use crate::function::Function;
use crate::unit::Unit;

pub use heap::Heap;

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Heap<String>),
    /// Arbitrary-precision decimal.
    BigNumber(Decimal),
    Complex(Complex64),
    Fraction(Fraction),
    Unit(Unit),
    /// Nested arrays form matrices; `[[1, 2], [3, 4]]` has size `[2, 2]`.
    Array(Heap<Vec<Value>>),
    /// Ordered string-keyed record.
    Object(Heap<IndexMap<String, Value>>),
    Function(Function),
    Node(NodeRef),
    /// Visible results of a multi-statement block, in order.
    ResultSet(Heap<Vec<Value>>),
}

impl Value {
    // Factories

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    #[inline]
    pub fn object(map: IndexMap<String, Value>) -> Self {
        Value::Object(Heap::new(map))
    }

    #[inline]
    pub fn result_set(entries: Vec<Value>) -> Self {
        Value::ResultSet(Heap::new(entries))
    }

    #[inline]
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(Complex64::new(re, im))
    }

    #[inline]
    pub fn node(node: impl Into<NodeRef>) -> Self {
        Value::Node(node.into())
    }

    /// Stable type tag used as the dispatch key.
    ///
    /// Nodes report their variant name (`"OperatorNode"`); signatures match
    /// any of them with the pattern `Node`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::BigNumber(_) => "BigNumber",
            Value::Complex(_) => "Complex",
            Value::Fraction(_) => "Fraction",
            Value::Unit(_) => "Unit",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Function(_) => "function",
            Value::Node(node) => node.type_name(),
            Value::ResultSet(_) => "ResultSet",
        }
    }

    /// Truthiness as used by conditional expressions.
    ///
    /// The table is closed: arrays, objects, functions and nodes have no
    /// truth value and fail with an unsupported-condition error.
    pub fn truthy(&self) -> EvalResult<bool> {
        fn number(n: f64) -> bool {
            n != 0.0 && !n.is_nan()
        }
        Ok(match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => number(*n),
            Value::String(s) => !s.is_empty(),
            Value::BigNumber(d) => !d.is_zero(),
            Value::Complex(c) => number(c.re) || number(c.im),
            Value::Fraction(f) => !f.is_zero(),
            Value::Unit(u) => u.value().is_some_and(number),
            other => return Err(unsupported_condition(other.type_of())),
        })
    }

    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Number argument, converting booleans, or a type error naming `what`.
    pub fn expect_number(&self, what: &str) -> EvalResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Boolean(b) => Ok(f64::from(u8::from(*b))),
            other => Err(type_error(what, other.type_of())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigNumber(a), Value::BigNumber(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Fraction(a), Value::Fraction(b)) => a == b,
            (Value::Unit(a), Value::Unit(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::ResultSet(a), Value::ResultSet(b)) => {
                a == b
            }
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Node(a), Value::Node(b)) => a.equals(b),
            _ => false,
        }
    }
}

// Conversions

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::BigNumber(d)
    }
}

impl From<Complex64> for Value {
    fn from(c: Complex64) -> Self {
        Value::Complex(c)
    }
}

impl From<Fraction> for Value {
    fn from(f: Fraction) -> Self {
        Value::Fraction(f)
    }
}

impl From<Unit> for Value {
    fn from(u: Unit) -> Self {
        Value::Unit(u)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Node(node)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(Rc::new(node))
    }
}

/// Only node values convert back into a tree; anything else is a type error.
impl TryFrom<Value> for NodeRef {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Node(node) => Ok(node),
            other => Err(type_error("a Node", other.type_of())),
        }
    }
}

// Formatting

fn format_complex(c: Complex64) -> String {
    let imaginary = |im: f64| {
        if im == 1.0 {
            "i".to_owned()
        } else if im == -1.0 {
            "-i".to_owned()
        } else {
            format!("{}i", format_number(im))
        }
    };
    if c.im == 0.0 {
        format_number(c.re)
    } else if c.re == 0.0 {
        imaginary(c.im)
    } else {
        let sign = if c.im < 0.0 { '-' } else { '+' };
        format!("{} {sign} {}", format_number(c.re), imaginary(c.im.abs()))
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{:?}", s.as_str()),
            Value::BigNumber(d) => write!(f, "{}", d.normalize()),
            Value::Complex(c) => write!(f, "{}", format_complex(*c)),
            Value::Fraction(fr) => write!(f, "{fr}"),
            Value::Unit(u) => write!(f, "{u}"),
            Value::Array(items) | Value::ResultSet(items) => write_list(f, items),
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "function {}", func.name()),
            Value::Node(node) => write!(f, "{node}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
