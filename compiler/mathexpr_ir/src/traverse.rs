//! Shallow and deep traversal of the node tree.
//!
//! `for_each` and `map` only touch immediate children. `traverse`,
//! `transform` and `filter` walk the whole tree on top of them, so they
//! need no variant-specific code.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::literal::{quote, Literal};
use crate::node::{
    AccessorNode, ArrayNode, AssignmentNode, BlockEntry, BlockNode, ConditionalNode,
    FunctionAssignmentNode, FunctionNode, IndexNode, Node, NodeError, NodeRef, ObjectNode,
    OperatorNode, ParenthesisNode, RangeNode,
};

/// Values a `map` callback may return; non-node values are wrapped in a
/// constant node.
pub trait IntoNode {
    fn into_node(self) -> NodeRef;
}

impl IntoNode for NodeRef {
    fn into_node(self) -> NodeRef {
        self
    }
}

impl IntoNode for Node {
    fn into_node(self) -> NodeRef {
        Rc::new(self)
    }
}

impl IntoNode for Literal {
    fn into_node(self) -> NodeRef {
        Rc::new(Node::from(self))
    }
}

impl IntoNode for f64 {
    fn into_node(self) -> NodeRef {
        Literal::Number(self).into_node()
    }
}

impl IntoNode for bool {
    fn into_node(self) -> NodeRef {
        Literal::Boolean(self).into_node()
    }
}

impl IntoNode for &str {
    fn into_node(self) -> NodeRef {
        Literal::String(self.to_owned()).into_node()
    }
}

impl IntoNode for String {
    fn into_node(self) -> NodeRef {
        Literal::String(self).into_node()
    }
}

impl Node {
    /// Immediate children with their path labels, in evaluation order.
    pub fn children(&self) -> Vec<(String, &NodeRef)> {
        fn indexed<'a>(label: &str, nodes: &'a [NodeRef]) -> Vec<(String, &'a NodeRef)> {
            nodes
                .iter()
                .enumerate()
                .map(|(i, n)| (format!("{label}[{i}]"), n))
                .collect()
        }

        match self {
            Node::Accessor(a) => vec![
                ("object".to_owned(), a.object()),
                ("index".to_owned(), a.index_node()),
            ],
            Node::Array(a) => indexed("items", a.items()),
            Node::Assignment(a) => {
                let mut out = vec![("object".to_owned(), a.object())];
                if let Some(index) = a.index_node() {
                    out.push(("index".to_owned(), index));
                }
                out.push(("value".to_owned(), a.value()));
                out
            }
            Node::Block(b) => b
                .blocks()
                .iter()
                .enumerate()
                .map(|(i, entry)| (format!("blocks[{i}].node"), &entry.node))
                .collect(),
            Node::Conditional(c) => vec![
                ("condition".to_owned(), c.condition()),
                ("trueExpr".to_owned(), c.true_expr()),
                ("falseExpr".to_owned(), c.false_expr()),
            ],
            Node::Constant(_) | Node::Symbol(_) => Vec::new(),
            Node::FunctionAssignment(f) => vec![("expr".to_owned(), f.expr())],
            Node::FunctionCall(f) => {
                let mut out = vec![("fn".to_owned(), f.callee())];
                out.extend(indexed("args", f.args()));
                out
            }
            Node::Index(i) => indexed("dimensions", i.dimensions()),
            Node::Object(o) => o
                .properties()
                .iter()
                .map(|(key, n)| (format!("properties[{}]", quote(key)), n))
                .collect(),
            Node::Operator(o) => indexed("args", o.args()),
            Node::Parenthesis(p) => vec![("content".to_owned(), p.inner())],
            Node::Range(r) => {
                let mut out = vec![("start".to_owned(), r.start()), ("end".to_owned(), r.end())];
                if let Some(step) = r.step() {
                    out.push(("step".to_owned(), step));
                }
                out
            }
        }
    }

    /// Visit each immediate child with its path and this node as parent.
    pub fn for_each(&self, mut visit: impl FnMut(&NodeRef, &str, &Node)) {
        for (path, child) in self.children() {
            visit(child, &path, self);
        }
    }

    /// Build a new node of the same variant whose children are the callback
    /// results. Constructor validation applies to the rebuilt node.
    pub fn map<R: IntoNode>(
        &self,
        mut f: impl FnMut(&NodeRef, &str, &Node) -> R,
    ) -> Result<Node, NodeError> {
        let mut apply = |child: &NodeRef, path: &str| f(child, path, self).into_node();
        let map_all =
            |label: &str, nodes: &[NodeRef], apply: &mut dyn FnMut(&NodeRef, &str) -> NodeRef| {
                nodes
                    .iter()
                    .enumerate()
                    .map(|(i, n)| apply(n, &format!("{label}[{i}]")))
                    .collect::<Vec<_>>()
            };

        Ok(match self {
            Node::Accessor(a) => {
                let object = apply(a.object(), "object");
                let index = apply(a.index_node(), "index");
                Node::Accessor(AccessorNode::new(object, index, a.optional_chaining())?)
            }
            Node::Array(a) => Node::Array(ArrayNode::new(map_all("items", a.items(), &mut apply))),
            Node::Assignment(a) => {
                let object = apply(a.object(), "object");
                let index = a.index_node().map(|i| apply(i, "index"));
                let value = apply(a.value(), "value");
                Node::Assignment(AssignmentNode::new(object, index, value)?)
            }
            Node::Block(b) => Node::Block(BlockNode::new(
                b.blocks()
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| BlockEntry {
                        node: apply(&entry.node, &format!("blocks[{i}].node")),
                        visible: entry.visible,
                    })
                    .collect(),
            )),
            Node::Conditional(c) => Node::Conditional(ConditionalNode::new(
                apply(c.condition(), "condition"),
                apply(c.true_expr(), "trueExpr"),
                apply(c.false_expr(), "falseExpr"),
            )),
            Node::Constant(_) | Node::Symbol(_) => self.clone(),
            Node::FunctionAssignment(fa) => {
                let expr = apply(fa.expr(), "expr");
                Node::FunctionAssignment(
                    FunctionAssignmentNode::new(fa.name(), fa.params().to_vec(), expr)?
                        .with_types(fa.types().to_vec())?,
                )
            }
            Node::FunctionCall(fc) => {
                let callee = apply(fc.callee(), "fn");
                let args = map_all("args", fc.args(), &mut apply);
                Node::FunctionCall(FunctionNode::new(callee, args, fc.optional()))
            }
            Node::Index(i) => Node::Index(IndexNode::new(
                map_all("dimensions", i.dimensions(), &mut apply),
                i.dot_notation(),
            )),
            Node::Object(o) => Node::Object(ObjectNode::new(
                o.properties()
                    .iter()
                    .map(|(key, n)| (key.clone(), apply(n, &format!("properties[{}]", quote(key)))))
                    .collect::<IndexMap<_, _>>(),
            )),
            Node::Operator(o) => Node::Operator(
                OperatorNode::new(o.op(), o.fn_name(), map_all("args", o.args(), &mut apply))?
                    .with_implicit(o.implicit())
                    .with_percentage(o.is_percentage()),
            ),
            Node::Parenthesis(p) => {
                Node::Parenthesis(ParenthesisNode::new(apply(p.inner(), "content")))
            }
            Node::Range(r) => {
                let start = apply(r.start(), "start");
                let end = apply(r.end(), "end");
                let step = r.step().map(|s| apply(s, "step"));
                Node::Range(RangeNode::new(start, end, step))
            }
        })
    }

    /// Depth-first pre-order visit of this node and every descendant.
    pub fn traverse(&self, mut callback: impl FnMut(&Node, &str, Option<&Node>)) {
        fn walk(
            node: &Node,
            path: &str,
            parent: Option<&Node>,
            callback: &mut dyn FnMut(&Node, &str, Option<&Node>),
        ) {
            callback(node, path, parent);
            for (child_path, child) in node.children() {
                walk(child, &child_path, Some(node), callback);
            }
        }
        walk(self, "", None, &mut callback);
    }

    /// Deep rewrite. The callback returns `Some(replacement)` to replace a
    /// node (its subtree is not visited further) or `None` to keep it and
    /// descend into its children.
    pub fn transform(
        &self,
        mut callback: impl FnMut(&Node, &str, Option<&Node>) -> Option<NodeRef>,
    ) -> Result<Node, NodeError> {
        fn rewrite(
            node: &Node,
            path: &str,
            parent: Option<&Node>,
            callback: &mut dyn FnMut(&Node, &str, Option<&Node>) -> Option<NodeRef>,
        ) -> Result<NodeRef, NodeError> {
            if let Some(replacement) = callback(node, path, parent) {
                return Ok(replacement);
            }
            let mut failure = None;
            let rebuilt = node.map(|child, child_path, parent| {
                match rewrite(child, child_path, Some(parent), callback) {
                    Ok(n) => n,
                    Err(e) => {
                        failure.get_or_insert(e);
                        Rc::clone(child)
                    }
                }
            })?;
            match failure {
                Some(e) => Err(e),
                None => Ok(Rc::new(rebuilt)),
            }
        }

        let root = rewrite(self, "", None, &mut callback)?;
        Ok(Rc::unwrap_or_clone(root))
    }

    /// Every node in the tree (including this one) matching `predicate`.
    pub fn filter(&self, mut predicate: impl FnMut(&Node) -> bool) -> Vec<Node> {
        let mut found = Vec::new();
        self.traverse(|node, _, _| {
            if predicate(node) {
                found.push(node.clone());
            }
        });
        found
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
