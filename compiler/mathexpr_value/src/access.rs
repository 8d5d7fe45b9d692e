//! Subscript and property access.
//!
//! An [`IndexValue`] is the evaluated form of an index node: either an
//! object property name or a list of zero-based dimensions. [`subset`] reads
//! through it and [`assign`] builds an updated copy of the container. Neither
//! mutates a shared payload, so assigning into a value bound in a scope
//! always goes through a rebind.

use mathexpr_ir::format_number;
use rust_decimal::prelude::ToPrimitive;

use crate::errors::{
    dimension_mismatch, index_out_of_bounds, invalid_index, invalid_property_access,
    property_not_found, type_error, EvalResult,
};
use crate::value::Value;

/// One dimension of a subscript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexDim {
    /// A single position; selecting with only scalars yields an element.
    Scalar(usize),
    /// Several positions; the dimension is kept in the result.
    List(Vec<usize>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexValue {
    Property(String),
    Dimensions(Vec<IndexDim>),
}

fn zero_based(n: f64) -> EvalResult<usize> {
    if n.fract() != 0.0 || n < 1.0 || !n.is_finite() {
        return Err(invalid_index(&format_number(n)));
    }
    Ok(n as usize - 1)
}

fn position(value: &Value) -> EvalResult<usize> {
    match value {
        Value::Number(n) => zero_based(*n),
        Value::BigNumber(d) => zero_based(d.to_f64().unwrap_or(f64::NAN)),
        other => Err(type_error("a number index", other.type_of())),
    }
}

impl IndexValue {
    pub fn property(key: impl Into<String>) -> Self {
        IndexValue::Property(key.into())
    }

    /// Build an index from evaluated one-based dimension values.
    ///
    /// A lone string selects a property. Numbers become scalar dimensions and
    /// flat arrays of numbers (as produced by ranges) become list dimensions.
    pub fn from_one_based(values: &[Value]) -> EvalResult<Self> {
        if let [Value::String(key)] = values {
            return Ok(IndexValue::Property(key.as_str().to_owned()));
        }
        let dims = values
            .iter()
            .map(|value| match value {
                Value::Array(items) => items
                    .iter()
                    .map(position)
                    .collect::<EvalResult<Vec<_>>>()
                    .map(IndexDim::List),
                other => position(other).map(IndexDim::Scalar),
            })
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(IndexValue::Dimensions(dims))
    }

    pub fn is_object_property(&self) -> bool {
        matches!(self, IndexValue::Property(_))
    }

    pub fn object_property(&self) -> Option<&str> {
        match self {
            IndexValue::Property(key) => Some(key.as_str()),
            IndexValue::Dimensions(_) => None,
        }
    }

    /// Whether every dimension selects a single position.
    pub fn is_scalar(&self) -> bool {
        match self {
            IndexValue::Property(_) => true,
            IndexValue::Dimensions(dims) => {
                dims.iter().all(|d| matches!(d, IndexDim::Scalar(_)))
            }
        }
    }
}

/// Size of each dimension. Scalars have no dimensions; strings have one.
pub fn size(value: &Value) -> Vec<usize> {
    match value {
        Value::Array(items) => {
            let mut dims = vec![items.len()];
            if let Some(first @ Value::Array(_)) = items.first() {
                dims.extend(size(first));
            }
            dims
        }
        Value::String(s) => vec![s.chars().count()],
        _ => Vec::new(),
    }
}

/// Read a property.
///
/// Objects expose their keys and complex numbers expose `re` and `im`.
/// Reading from `null` or `undefined` fails; optional chaining is handled
/// by the caller before this point.
pub fn get_property(object: &Value, key: &str) -> EvalResult {
    match (object, key) {
        (Value::Object(map), _) => map.get(key).cloned().ok_or_else(|| property_not_found(key)),
        (Value::Complex(c), "re") => Ok(Value::Number(c.re)),
        (Value::Complex(c), "im") => Ok(Value::Number(c.im)),
        (other, _) => Err(invalid_property_access(key, other.type_of())),
    }
}

/// Return a copy of `object` with `key` set to `value`.
pub fn set_property(object: Value, key: &str, value: Value) -> EvalResult {
    match object {
        Value::Object(map) => {
            let mut map = map.into_inner();
            map.insert(key.to_owned(), value);
            Ok(Value::object(map))
        }
        other => Err(invalid_property_access(key, other.type_of())),
    }
}

/// Read through an index.
pub fn subset(value: &Value, index: &IndexValue) -> EvalResult {
    let dims = match index {
        IndexValue::Property(key) => return get_property(value, key),
        IndexValue::Dimensions(dims) => dims,
    };
    match value {
        Value::Array(items) => {
            let depth = size(value).len();
            if dims.len() > depth {
                return Err(dimension_mismatch(depth, dims.len()));
            }
            if index.is_scalar() {
                pick(items, dims)
            } else {
                let kept: Vec<IndexDim> = dims
                    .iter()
                    .map(|d| match d {
                        IndexDim::Scalar(i) => IndexDim::List(vec![*i]),
                        list @ IndexDim::List(_) => list.clone(),
                    })
                    .collect();
                pick(items, &kept)
            }
        }
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let positions = match dims.as_slice() {
                [IndexDim::Scalar(i)] => vec![*i],
                [IndexDim::List(list)] => list.clone(),
                _ => return Err(dimension_mismatch(1, dims.len())),
            };
            positions
                .iter()
                .map(|i| {
                    chars
                        .get(*i)
                        .copied()
                        .ok_or_else(|| index_out_of_bounds(*i, chars.len()))
                })
                .collect::<EvalResult<String>>()
                .map(Value::string)
        }
        other => Err(type_error("an Array, Matrix, string or Object", other.type_of())),
    }
}

fn element(items: &[Value], i: usize) -> EvalResult<&Value> {
    items.get(i).ok_or_else(|| index_out_of_bounds(i, items.len()))
}

fn pick(items: &[Value], dims: &[IndexDim]) -> EvalResult {
    let Some((first, rest)) = dims.split_first() else {
        return Ok(Value::array(items.to_vec()));
    };
    match first {
        IndexDim::Scalar(i) => descend(element(items, *i)?, rest),
        IndexDim::List(list) => list
            .iter()
            .map(|i| descend(element(items, *i)?, rest))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::array),
    }
}

fn descend(value: &Value, rest: &[IndexDim]) -> EvalResult {
    if rest.is_empty() {
        return Ok(value.clone());
    }
    match value {
        Value::Array(inner) => pick(inner, rest),
        _ => Err(dimension_mismatch(0, rest.len())),
    }
}

/// Return a copy of `value` with the indexed part replaced.
///
/// Arrays grow to fit, padding new positions with `0`. A list dimension
/// takes its replacement element-wise from an array of matching length, or
/// repeats a scalar replacement.
pub fn assign(value: Value, index: &IndexValue, replacement: Value) -> EvalResult {
    let dims = match index {
        IndexValue::Property(key) => return set_property(value, key, replacement),
        IndexValue::Dimensions(dims) => dims,
    };
    match value {
        Value::Array(items) => Ok(Value::array(assign_array(
            items.into_inner(),
            dims,
            &replacement,
        )?)),
        Value::String(s) => assign_string(&s, dims, &replacement),
        other => Err(type_error("an Array, Matrix, string or Object", other.type_of())),
    }
}

fn spread(replacement: &Value, count: usize) -> EvalResult<Vec<Value>> {
    match replacement {
        Value::Array(parts) if parts.len() == count => Ok(parts.to_vec()),
        Value::Array(parts) => Err(dimension_mismatch(count, parts.len())),
        scalar => Ok(vec![scalar.clone(); count]),
    }
}

fn assign_array(
    mut items: Vec<Value>,
    dims: &[IndexDim],
    replacement: &Value,
) -> EvalResult<Vec<Value>> {
    let Some((first, rest)) = dims.split_first() else {
        return Err(dimension_mismatch(1, 0));
    };
    match first {
        IndexDim::Scalar(i) => set_at(&mut items, *i, rest, replacement.clone())?,
        IndexDim::List(list) => {
            for (i, part) in list.iter().zip(spread(replacement, list.len())?) {
                set_at(&mut items, *i, rest, part)?;
            }
        }
    }
    Ok(items)
}

fn set_at(
    items: &mut Vec<Value>,
    i: usize,
    rest: &[IndexDim],
    replacement: Value,
) -> EvalResult<()> {
    let grown = items.len() <= i;
    if grown {
        items.resize(i + 1, Value::Number(0.0));
    }
    let Some(slot) = items.get_mut(i) else {
        return Err(index_out_of_bounds(i, i));
    };
    if rest.is_empty() {
        *slot = replacement;
        return Ok(());
    }
    let child = match slot {
        Value::Array(inner) => inner.to_vec(),
        _ if grown => Vec::new(),
        _ => return Err(dimension_mismatch(rest.len(), 0)),
    };
    *slot = Value::array(assign_array(child, rest, &replacement)?);
    Ok(())
}

fn assign_string(s: &str, dims: &[IndexDim], replacement: &Value) -> EvalResult {
    let Some(text) = replacement.as_str() else {
        return Err(type_error("a string", replacement.type_of()));
    };
    let positions = match dims {
        [IndexDim::Scalar(i)] => vec![*i],
        [IndexDim::List(list)] => list.clone(),
        _ => return Err(dimension_mismatch(1, dims.len())),
    };
    let replacement: Vec<char> = text.chars().collect();
    if replacement.len() != positions.len() {
        return Err(dimension_mismatch(positions.len(), replacement.len()));
    }
    let mut chars: Vec<char> = s.chars().collect();
    for (i, c) in positions.into_iter().zip(replacement) {
        if chars.len() <= i {
            chars.resize(i + 1, ' ');
        }
        chars[i] = c;
    }
    Ok(Value::string(chars.into_iter().collect::<String>()))
}
