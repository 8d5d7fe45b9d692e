//! JSON encoding of node trees.
//!
//! Every node encodes as an object tagged with its type name,
//! `{"mathjs": "OperatorNode", "op": "+", ...}`, and nested nodes encode
//! recursively. [`Node::from_json`] is the exact inverse of
//! [`Node::to_json`].

use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{json, Map, Value as Json};

use crate::literal::Literal;
use crate::node::{
    AccessorNode, ArrayNode, AssignmentNode, BlockEntry, BlockNode, ConditionalNode, ConstantNode,
    FunctionAssignmentNode, FunctionNode, IndexNode, Node, NodeError, NodeRef, ObjectNode,
    OperatorNode, ParenthesisNode, RangeNode, SymbolNode, NODE_TYPES,
};

/// Whether a JSON object's `mathjs` tag names a node type.
pub fn is_node_json(json: &Json) -> bool {
    json.get("mathjs")
        .and_then(Json::as_str)
        .is_some_and(|tag| NODE_TYPES.contains(&tag))
}

fn json_kind(json: &Json) -> String {
    match json {
        Json::Null => "null".to_owned(),
        Json::Bool(_) => "boolean".to_owned(),
        Json::Number(_) => "number".to_owned(),
        Json::String(_) => "string".to_owned(),
        Json::Array(_) => "Array".to_owned(),
        Json::Object(map) => map
            .get("mathjs")
            .and_then(Json::as_str)
            .unwrap_or("Object")
            .to_owned(),
    }
}

fn literal_to_json(value: &Literal) -> Option<Json> {
    match value {
        Literal::Number(n) if n.is_finite() => Some(json!(n)),
        Literal::Number(n) => Some(json!({
            "mathjs": "number",
            "value": crate::literal::format_number(*n),
        })),
        Literal::String(s) => Some(json!(s)),
        Literal::Boolean(b) => Some(json!(b)),
        Literal::Null => Some(Json::Null),
        Literal::Undefined => None,
    }
}

fn literal_from_json(json: Option<&Json>) -> Result<Literal, NodeError> {
    let mismatch = |actual: &Json| NodeError::TypeMismatch {
        node: "ConstantNode",
        param: "value".to_owned(),
        expected: "a number, string, boolean or null",
        actual: json_kind(actual),
    };
    Ok(match json {
        None => Literal::Undefined,
        Some(Json::Null) => Literal::Null,
        Some(Json::Bool(b)) => Literal::Boolean(*b),
        Some(Json::String(s)) => Literal::String(s.clone()),
        Some(n @ Json::Number(_)) => Literal::Number(n.as_f64().ok_or_else(|| mismatch(n))?),
        Some(other @ Json::Object(map)) => match map.get("value").and_then(Json::as_str) {
            Some("NaN") => Literal::Number(f64::NAN),
            Some("Infinity") => Literal::Number(f64::INFINITY),
            Some("-Infinity") => Literal::Number(f64::NEG_INFINITY),
            _ => return Err(mismatch(other)),
        },
        Some(other) => return Err(mismatch(other)),
    })
}

impl Node {
    pub fn to_json(&self) -> Json {
        let nodes = |items: &[NodeRef]| Json::Array(items.iter().map(|n| n.to_json()).collect());
        match self {
            Node::Accessor(a) => json!({
                "mathjs": "AccessorNode",
                "object": a.object().to_json(),
                "index": a.index_node().to_json(),
                "optionalChaining": a.optional_chaining(),
            }),
            Node::Array(a) => json!({ "mathjs": "ArrayNode", "items": nodes(a.items()) }),
            Node::Assignment(a) => json!({
                "mathjs": "AssignmentNode",
                "object": a.object().to_json(),
                "index": a.index_node().map_or(Json::Null, |i| i.to_json()),
                "value": a.value().to_json(),
            }),
            Node::Block(b) => json!({
                "mathjs": "BlockNode",
                "blocks": b.blocks().iter().map(|entry| json!({
                    "node": entry.node.to_json(),
                    "visible": entry.visible,
                })).collect::<Vec<_>>(),
            }),
            Node::Conditional(c) => json!({
                "mathjs": "ConditionalNode",
                "condition": c.condition().to_json(),
                "trueExpr": c.true_expr().to_json(),
                "falseExpr": c.false_expr().to_json(),
            }),
            Node::Constant(c) => {
                let mut map = Map::new();
                map.insert("mathjs".to_owned(), json!("ConstantNode"));
                if let Some(value) = literal_to_json(c.value()) {
                    map.insert("value".to_owned(), value);
                }
                Json::Object(map)
            }
            Node::FunctionAssignment(f) => json!({
                "mathjs": "FunctionAssignmentNode",
                "name": f.name(),
                "params": f.params(),
                "types": f.types(),
                "expr": f.expr().to_json(),
            }),
            Node::FunctionCall(f) => json!({
                "mathjs": "FunctionNode",
                "fn": f.callee().to_json(),
                "args": nodes(f.args()),
                "optional": f.optional(),
            }),
            Node::Index(i) => json!({
                "mathjs": "IndexNode",
                "dimensions": nodes(i.dimensions()),
                "dotNotation": i.dot_notation(),
            }),
            Node::Object(o) => {
                let properties: Map<String, Json> = o
                    .properties()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                json!({ "mathjs": "ObjectNode", "properties": properties })
            }
            Node::Operator(o) => json!({
                "mathjs": "OperatorNode",
                "op": o.op(),
                "fn": o.fn_name(),
                "args": nodes(o.args()),
                "implicit": o.implicit(),
                "isPercentage": o.is_percentage(),
            }),
            Node::Parenthesis(p) => json!({
                "mathjs": "ParenthesisNode",
                "content": p.inner().to_json(),
            }),
            Node::Range(r) => json!({
                "mathjs": "RangeNode",
                "start": r.start().to_json(),
                "end": r.end().to_json(),
                "step": r.step().map_or(Json::Null, |s| s.to_json()),
            }),
            Node::Symbol(s) => json!({ "mathjs": "SymbolNode", "name": s.name() }),
        }
    }

    /// Rebuild a node from its JSON encoding, validating every field.
    pub fn from_json(json: &Json) -> Result<Node, NodeError> {
        let tag = json
            .get("mathjs")
            .and_then(Json::as_str)
            .ok_or_else(|| NodeError::UnknownType(json_kind(json)))?;
        let node_type = NODE_TYPES
            .iter()
            .copied()
            .find(|t| *t == tag)
            .ok_or_else(|| NodeError::UnknownType(tag.to_owned()))?;
        let fields = Fields { node_type, json };

        Ok(match node_type {
            "AccessorNode" => Node::Accessor(AccessorNode::new(
                fields.node("object")?,
                fields.node("index")?,
                fields.bool("optionalChaining")?,
            )?),
            "ArrayNode" => Node::Array(ArrayNode::new(fields.nodes("items")?)),
            "AssignmentNode" => Node::Assignment(AssignmentNode::new(
                fields.node("object")?,
                fields.optional_node("index")?,
                fields.node("value")?,
            )?),
            "BlockNode" => {
                let entries = fields.array("blocks")?;
                let blocks = entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| -> Result<BlockEntry, NodeError> {
                        let entry_fields = Fields {
                            node_type,
                            json: entry,
                        };
                        let node = entry_fields
                            .node("node")
                            .map_err(|e| relabel(e, &format!("blocks[{i}].node")))?;
                        Ok(BlockEntry {
                            node,
                            visible: entry_fields.bool("visible")?,
                        })
                    })
                    .collect::<Result<Vec<_>, NodeError>>()?;
                Node::Block(BlockNode::new(blocks))
            }
            "ConditionalNode" => Node::Conditional(ConditionalNode::new(
                fields.node("condition")?,
                fields.node("trueExpr")?,
                fields.node("falseExpr")?,
            )),
            "ConstantNode" => {
                Node::Constant(ConstantNode::new(literal_from_json(json.get("value"))?))
            }
            "FunctionAssignmentNode" => {
                let params = fields.strings("params")?;
                let expr = fields.node("expr")?;
                let node = FunctionAssignmentNode::new(fields.string("name")?, params, expr)?;
                match json.get("types") {
                    Some(Json::Array(_)) => {
                        Node::FunctionAssignment(node.with_types(fields.strings("types")?)?)
                    }
                    _ => Node::FunctionAssignment(node),
                }
            }
            "FunctionNode" => Node::FunctionCall(FunctionNode::new(
                fields.node("fn")?,
                fields.nodes("args")?,
                fields.bool("optional")?,
            )),
            "IndexNode" => Node::Index(IndexNode::new(
                fields.nodes("dimensions")?,
                fields.bool("dotNotation")?,
            )),
            "ObjectNode" => {
                let properties = match json.get("properties") {
                    Some(Json::Object(map)) => map
                        .iter()
                        .map(|(key, value)| -> Result<(String, NodeRef), NodeError> {
                            let path = format!("properties.{key}");
                            Ok((key.clone(), fields.child(&path, value)?))
                        })
                        .collect::<Result<IndexMap<_, _>, NodeError>>()?,
                    Some(other) => return Err(fields.mismatch("properties", "an object", other)),
                    None => IndexMap::new(),
                };
                Node::Object(ObjectNode::new(properties))
            }
            "OperatorNode" => {
                let args = fields.nodes("args")?;
                Node::Operator(
                    OperatorNode::new(fields.string("op")?, fields.string("fn")?, args)?
                        .with_implicit(fields.bool("implicit")?)
                        .with_percentage(fields.bool("isPercentage")?),
                )
            }
            "ParenthesisNode" => Node::Parenthesis(ParenthesisNode::new(fields.node("content")?)),
            "RangeNode" => Node::Range(RangeNode::new(
                fields.node("start")?,
                fields.node("end")?,
                fields.optional_node("step")?,
            )),
            _ => Node::Symbol(SymbolNode::new(fields.string("name")?)?),
        })
    }
}

fn relabel(error: NodeError, path: &str) -> NodeError {
    match error {
        NodeError::TypeMismatch {
            node,
            expected,
            actual,
            ..
        } => NodeError::TypeMismatch {
            node,
            param: path.to_owned(),
            expected,
            actual,
        },
        other => other,
    }
}

/// Field accessors for one JSON object being decoded as `node_type`.
struct Fields<'a> {
    node_type: &'static str,
    json: &'a Json,
}

impl Fields<'_> {
    fn mismatch(&self, param: &str, expected: &'static str, actual: &Json) -> NodeError {
        NodeError::TypeMismatch {
            node: self.node_type,
            param: param.to_owned(),
            expected,
            actual: json_kind(actual),
        }
    }

    fn missing(&self, field: &str) -> NodeError {
        NodeError::MissingField {
            node: self.node_type,
            field: field.to_owned(),
        }
    }

    fn child(&self, param: &str, value: &Json) -> Result<NodeRef, NodeError> {
        if is_node_json(value) {
            Ok(Rc::new(Node::from_json(value)?))
        } else {
            Err(self.mismatch(param, "a Node", value))
        }
    }

    fn node(&self, field: &str) -> Result<NodeRef, NodeError> {
        let value = self.json.get(field).ok_or_else(|| self.missing(field))?;
        self.child(field, value)
    }

    fn optional_node(&self, field: &str) -> Result<Option<NodeRef>, NodeError> {
        match self.json.get(field) {
            None | Some(Json::Null) => Ok(None),
            Some(value) => self.child(field, value).map(Some),
        }
    }

    fn array(&self, field: &str) -> Result<&[Json], NodeError> {
        match self.json.get(field) {
            Some(Json::Array(items)) => Ok(items),
            Some(other) => Err(self.mismatch(field, "an array", other)),
            None => Err(self.missing(field)),
        }
    }

    fn nodes(&self, field: &str) -> Result<Vec<NodeRef>, NodeError> {
        self.array(field)?
            .iter()
            .enumerate()
            .map(|(i, item)| self.child(&format!("{field}[{i}]"), item))
            .collect()
    }

    fn string(&self, field: &str) -> Result<String, NodeError> {
        match self.json.get(field) {
            Some(Json::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.mismatch(field, "a string", other)),
            None => Err(self.missing(field)),
        }
    }

    fn strings(&self, field: &str) -> Result<Vec<String>, NodeError> {
        self.array(field)?
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Json::String(s) => Ok(s.clone()),
                other => Err(self.mismatch(&format!("{field}[{i}]"), "a string", other)),
            })
            .collect()
    }

    /// Missing booleans default to `false`.
    fn bool(&self, field: &str) -> Result<bool, NodeError> {
        match self.json.get(field) {
            None | Some(Json::Null) => Ok(false),
            Some(Json::Bool(b)) => Ok(*b),
            Some(other) => Err(self.mismatch(field, "a boolean", other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
