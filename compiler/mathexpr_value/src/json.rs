//! JSON encoding of values and the shared reviver.
//!
//! Values that plain JSON cannot express are tagged objects:
//! `{"mathjs": "Complex", "re": 0, "im": 2}`, `{"mathjs": "BigNumber",
//! "value": "0.1"}`, `{"mathjs": "Fraction", "n": 1, "d": 3}`,
//! `{"mathjs": "Unit", "value": 5, "unit": "cm"}`. Node trees use the node
//! encoding from `mathexpr_ir`. [`revive`] reads all of them back.

use std::rc::Rc;
use std::str::FromStr;

use indexmap::IndexMap;
use mathexpr_ir::json::is_node_json;
use mathexpr_ir::{format_number, Node};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value as Json};

use crate::errors::{type_error, EvalError, EvalResult};
use crate::fraction::Fraction;
use crate::unit::Unit;
use crate::value::Value;

fn number_to_json(n: f64) -> Json {
    if n.is_finite() {
        json!(n)
    } else {
        json!({ "mathjs": "number", "value": format_number(n) })
    }
}

impl Value {
    /// Encode as JSON. Functions have no encoding.
    pub fn to_json(&self) -> EvalResult<Json> {
        Ok(match self {
            Value::Undefined | Value::Null => Json::Null,
            Value::Boolean(b) => json!(b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => json!(s.as_str()),
            Value::BigNumber(d) => json!({
                "mathjs": "BigNumber",
                "value": d.normalize().to_string(),
            }),
            Value::Complex(c) => json!({ "mathjs": "Complex", "re": c.re, "im": c.im }),
            Value::Fraction(f) => json!({
                "mathjs": "Fraction",
                "n": f.numerator(),
                "d": f.denominator(),
            }),
            Value::Unit(u) => json!({ "mathjs": "Unit", "value": u.value(), "unit": u.name() }),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<EvalResult<Vec<_>>>()?,
            ),
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, value) in map.iter() {
                    out.insert(key.clone(), value.to_json()?);
                }
                Json::Object(out)
            }
            Value::ResultSet(entries) => {
                let entries = entries
                    .iter()
                    .map(Value::to_json)
                    .collect::<EvalResult<Vec<_>>>()?;
                json!({ "mathjs": "ResultSet", "entries": entries })
            }
            Value::Node(node) => node.to_json(),
            Value::Function(f) => return Err(type_error("a serializable value", f.name())),
        })
    }
}

fn field<'a>(map: &'a Map<String, Json>, tag: &str, name: &str) -> EvalResult<&'a Json> {
    map.get(name)
        .ok_or_else(|| EvalError::new(format!("{tag}: missing field \"{name}\"")))
}

fn float(map: &Map<String, Json>, tag: &str, name: &str) -> EvalResult<f64> {
    let value = field(map, tag, name)?;
    value
        .as_f64()
        .ok_or_else(|| type_error(&format!("a number for {tag}.{name}"), &value.to_string()))
}

/// Integer field, given either as a number or a decimal string.
fn integer(map: &Map<String, Json>, tag: &str, name: &str) -> EvalResult<i64> {
    let value = field(map, tag, name)?;
    let parsed = match value {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| type_error(&format!("an integer for {tag}.{name}"), &value.to_string()))
}

fn special_number(text: &str) -> Option<f64> {
    match text {
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

fn revive_tagged(tag: &str, map: &Map<String, Json>, json: &Json) -> EvalResult<Option<Value>> {
    Ok(Some(match tag {
        _ if is_node_json(json) => Value::Node(Rc::new(Node::from_json(json)?)),
        "number" => {
            let text = field(map, tag, "value")?.as_str().unwrap_or_default();
            Value::Number(
                special_number(text).ok_or_else(|| type_error("a number string", text))?,
            )
        }
        "BigNumber" => {
            let text = field(map, tag, "value")?.as_str().unwrap_or_default();
            let parsed = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text));
            Value::BigNumber(parsed.map_err(|_| type_error("a decimal string", text))?)
        }
        "Complex" => Value::complex(float(map, tag, "re")?, float(map, tag, "im")?),
        "Fraction" => Value::Fraction(Fraction::new(
            integer(map, tag, "n")?,
            integer(map, tag, "d")?,
        )?),
        "Unit" => {
            let name = field(map, tag, "unit")?.as_str().unwrap_or_default();
            let unit = Unit::parse(name).ok_or_else(|| type_error("a known unit", name))?;
            match map.get("value").and_then(Json::as_f64) {
                Some(value) => Value::Unit(unit.with_value(value)),
                None => Value::Unit(unit),
            }
        }
        "DenseMatrix" => revive(field(map, tag, "data")?)?,
        "ResultSet" => match revive(field(map, tag, "entries")?)? {
            Value::Array(entries) => Value::ResultSet(entries),
            other => return Err(type_error("an array of entries", other.type_of())),
        },
        _ => return Ok(None),
    }))
}

/// Decode JSON produced by [`Value::to_json`] or `Node::to_json`.
///
/// Objects with an unknown `mathjs` tag decode as plain objects.
pub fn revive(json: &Json) -> EvalResult {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::string(s.as_str()),
        Json::Array(items) => Value::array(items.iter().map(revive).collect::<EvalResult<_>>()?),
        Json::Object(map) => {
            if let Some(tag) = map.get("mathjs").and_then(Json::as_str) {
                if let Some(value) = revive_tagged(tag, map, json)? {
                    return Ok(value);
                }
            }
            let mut out = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), revive(value)?);
            }
            Value::object(out)
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
