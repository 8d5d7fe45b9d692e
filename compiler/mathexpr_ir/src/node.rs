//! Node variants and their validated constructors.
//!
//! Construction is fail-fast: every invariant that the type system cannot
//! express (assignment targets, index children, identifier names) is checked
//! by the constructor, which returns [`NodeError`] instead of building an
//! invalid tree.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::literal::Literal;

/// Shared handle to a child node. Cloning a handle never copies the subtree.
pub type NodeRef = Rc<Node>;

/// Type names of every node variant, as used by the `mathjs` JSON tag.
pub const NODE_TYPES: &[&str] = &[
    "AccessorNode",
    "ArrayNode",
    "AssignmentNode",
    "BlockNode",
    "ConditionalNode",
    "ConstantNode",
    "FunctionAssignmentNode",
    "FunctionNode",
    "IndexNode",
    "ObjectNode",
    "OperatorNode",
    "ParenthesisNode",
    "RangeNode",
    "SymbolNode",
];

/// Construction-time failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// A parameter had the wrong kind (non-node child, wrong node variant, ...).
    #[error("TypeError: {node}: parameter {param} must be {expected}, got {actual}")]
    TypeMismatch {
        node: &'static str,
        param: String,
        expected: &'static str,
        actual: String,
    },
    /// Assignment to a reserved symbol such as `end`.
    #[error("Cannot assign a new value to reserved symbol \"{0}\"")]
    ReservedSymbol(String),
    /// An identifier field holds something that is not an identifier.
    #[error("TypeError: {node}: invalid {what} \"{value}\"")]
    InvalidName {
        node: &'static str,
        what: &'static str,
        value: String,
    },
    /// A JSON object did not carry a known `mathjs` tag.
    #[error("unknown node type \"{0}\"")]
    UnknownType(String),
    /// A JSON object lacked a required field.
    #[error("{node}: missing field \"{field}\"")]
    MissingField { node: &'static str, field: String },
    /// An operator applied to a number of operands it cannot take.
    #[error("TypeError: {node}: operator \"{fn_name}\" cannot take {count} operands")]
    Arity {
        node: &'static str,
        fn_name: String,
        count: usize,
    },
}

/// Expression tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Accessor(AccessorNode),
    Array(ArrayNode),
    Assignment(AssignmentNode),
    Block(BlockNode),
    Conditional(ConditionalNode),
    Constant(ConstantNode),
    FunctionAssignment(FunctionAssignmentNode),
    FunctionCall(FunctionNode),
    Index(IndexNode),
    Object(ObjectNode),
    Operator(OperatorNode),
    Parenthesis(ParenthesisNode),
    Range(RangeNode),
    Symbol(SymbolNode),
}

impl Node {
    /// Stable discriminator, e.g. `"OperatorNode"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Accessor(_) => "AccessorNode",
            Node::Array(_) => "ArrayNode",
            Node::Assignment(_) => "AssignmentNode",
            Node::Block(_) => "BlockNode",
            Node::Conditional(_) => "ConditionalNode",
            Node::Constant(_) => "ConstantNode",
            Node::FunctionAssignment(_) => "FunctionAssignmentNode",
            Node::FunctionCall(_) => "FunctionNode",
            Node::Index(_) => "IndexNode",
            Node::Object(_) => "ObjectNode",
            Node::Operator(_) => "OperatorNode",
            Node::Parenthesis(_) => "ParenthesisNode",
            Node::Range(_) => "RangeNode",
            Node::Symbol(_) => "SymbolNode",
        }
    }

    /// Key into the precedence tables: `"OperatorNode:" + fn` for operators,
    /// the type name for everything else.
    pub fn identifier(&self) -> String {
        match self {
            Node::Operator(op) => format!("OperatorNode:{}", op.fn_name),
            other => other.type_name().to_owned(),
        }
    }

    /// Strip any number of enclosing parenthesis nodes.
    pub fn content(&self) -> &Node {
        match self {
            Node::Parenthesis(p) => p.content.content(),
            other => other,
        }
    }

    /// Structural equality; children are compared by value, not identity.
    pub fn equals(&self, other: &Node) -> bool {
        self == other
    }

    pub fn is_symbol_named(&self, name: &str) -> bool {
        matches!(self, Node::Symbol(s) if s.name == name)
    }

    /// Whether the subtree refers to `end`. Nested index nodes are not
    /// scanned: their `end` belongs to the object they index.
    pub fn references_end(&self) -> bool {
        match self {
            Node::Symbol(s) => s.name == "end",
            Node::Index(_) => false,
            other => {
                let mut found = false;
                other.for_each(|child, _, _| {
                    found = found || child.references_end();
                });
                found
            }
        }
    }
}

impl From<Literal> for Node {
    fn from(value: Literal) -> Self {
        Node::Constant(ConstantNode::new(value))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn expect_variant(
    node: &'static str,
    param: &str,
    expected: &'static str,
    child: &Node,
    ok: bool,
) -> Result<(), NodeError> {
    if ok {
        Ok(())
    } else {
        Err(NodeError::TypeMismatch {
            node,
            param: param.to_owned(),
            expected,
            actual: child.type_name().to_owned(),
        })
    }
}

/// Variable or constant reference.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolNode {
    name: String,
}

impl SymbolNode {
    pub fn new(name: impl Into<String>) -> Result<Self, NodeError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(NodeError::InvalidName {
                node: "SymbolNode",
                what: "name",
                value: name,
            });
        }
        Ok(SymbolNode { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstantNode {
    value: Literal,
}

impl ConstantNode {
    pub fn new(value: Literal) -> Self {
        ConstantNode { value }
    }

    pub fn value(&self) -> &Literal {
        &self.value
    }
}

/// Prefix, infix or postfix operator application.
///
/// `op` is the display symbol, `fn_name` the namespace function that gives
/// the operator its meaning.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorNode {
    op: String,
    fn_name: String,
    args: Vec<NodeRef>,
    implicit: bool,
    is_percentage: bool,
}

impl OperatorNode {
    pub fn new(
        op: impl Into<String>,
        fn_name: impl Into<String>,
        args: Vec<NodeRef>,
    ) -> Result<Self, NodeError> {
        let op = op.into();
        let fn_name = fn_name.into();
        if op.is_empty() {
            return Err(NodeError::InvalidName {
                node: "OperatorNode",
                what: "operator",
                value: op,
            });
        }
        if !is_identifier(&fn_name) {
            return Err(NodeError::InvalidName {
                node: "OperatorNode",
                what: "function name",
                value: fn_name,
            });
        }
        // Only `add` and `multiply` flatten into more than two operands.
        let variadic = matches!(fn_name.as_str(), "add" | "multiply");
        if args.is_empty() || (args.len() > 2 && !variadic) {
            return Err(NodeError::Arity {
                node: "OperatorNode",
                fn_name,
                count: args.len(),
            });
        }
        Ok(OperatorNode {
            op,
            fn_name,
            args,
            implicit: false,
            is_percentage: false,
        })
    }

    /// Mark as bare-juxtaposition multiplication (`2x`).
    #[must_use]
    pub fn with_implicit(mut self, implicit: bool) -> Self {
        self.implicit = implicit;
        self
    }

    /// Mark as produced by a `%` suffix.
    #[must_use]
    pub fn with_percentage(mut self, is_percentage: bool) -> Self {
        self.is_percentage = is_percentage;
        self
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn fn_name(&self) -> &str {
        &self.fn_name
    }

    pub fn args(&self) -> &[NodeRef] {
        &self.args
    }

    pub fn implicit(&self) -> bool {
        self.implicit
    }

    pub fn is_percentage(&self) -> bool {
        self.is_percentage
    }

    pub fn is_unary(&self) -> bool {
        self.args.len() == 1
    }

    pub fn is_binary(&self) -> bool {
        self.args.len() == 2
    }
}

/// `condition ? true_expr : false_expr`
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalNode {
    condition: NodeRef,
    true_expr: NodeRef,
    false_expr: NodeRef,
}

impl ConditionalNode {
    pub fn new(condition: NodeRef, true_expr: NodeRef, false_expr: NodeRef) -> Self {
        ConditionalNode {
            condition,
            true_expr,
            false_expr,
        }
    }

    pub fn condition(&self) -> &NodeRef {
        &self.condition
    }

    pub fn true_expr(&self) -> &NodeRef {
        &self.true_expr
    }

    pub fn false_expr(&self) -> &NodeRef {
        &self.false_expr
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParenthesisNode {
    content: NodeRef,
}

impl ParenthesisNode {
    pub fn new(content: NodeRef) -> Self {
        ParenthesisNode { content }
    }

    /// The directly wrapped node. Use [`Node::content`] to unwrap every layer.
    pub fn inner(&self) -> &NodeRef {
        &self.content
    }
}

/// Property or subscript read: `a.b`, `a[i]`, `a?.b`.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessorNode {
    object: NodeRef,
    index: NodeRef,
    optional_chaining: bool,
}

impl AccessorNode {
    /// `index` must be an [`IndexNode`].
    pub fn new(
        object: NodeRef,
        index: NodeRef,
        optional_chaining: bool,
    ) -> Result<Self, NodeError> {
        expect_variant(
            "AccessorNode",
            "index",
            "IndexNode",
            &index,
            matches!(*index, Node::Index(_)),
        )?;
        Ok(AccessorNode {
            object,
            index,
            optional_chaining,
        })
    }

    pub fn object(&self) -> &NodeRef {
        &self.object
    }

    pub fn index_node(&self) -> &NodeRef {
        &self.index
    }

    pub fn index(&self) -> Option<&IndexNode> {
        match &*self.index {
            Node::Index(index) => Some(index),
            _ => None,
        }
    }

    pub fn optional_chaining(&self) -> bool {
        self.optional_chaining
    }
}

/// `a = v`, `a.b = v`, `a[i] = v` and nested accessor targets.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentNode {
    object: NodeRef,
    index: Option<NodeRef>,
    value: NodeRef,
}

impl AssignmentNode {
    /// `object` must be a symbol or accessor (and not `end`); `index`, when
    /// present, must be an [`IndexNode`].
    pub fn new(object: NodeRef, index: Option<NodeRef>, value: NodeRef) -> Result<Self, NodeError> {
        expect_variant(
            "AssignmentNode",
            "object",
            "SymbolNode or AccessorNode",
            &object,
            matches!(*object, Node::Symbol(_) | Node::Accessor(_)),
        )?;
        if object.is_symbol_named("end") {
            return Err(NodeError::ReservedSymbol("end".to_owned()));
        }
        if let Some(index) = &index {
            expect_variant(
                "AssignmentNode",
                "index",
                "IndexNode",
                index,
                matches!(**index, Node::Index(_)),
            )?;
        }
        Ok(AssignmentNode {
            object,
            index,
            value,
        })
    }

    pub fn object(&self) -> &NodeRef {
        &self.object
    }

    pub fn index_node(&self) -> Option<&NodeRef> {
        self.index.as_ref()
    }

    pub fn index(&self) -> Option<&IndexNode> {
        match self.index.as_deref() {
            Some(Node::Index(index)) => Some(index),
            _ => None,
        }
    }

    pub fn value(&self) -> &NodeRef {
        &self.value
    }

    /// Name of the variable or property being assigned, for display.
    pub fn target_name(&self) -> Option<&str> {
        match self.index() {
            Some(index) => index.object_property(),
            None => match &*self.object {
                Node::Symbol(s) => Some(s.name()),
                _ => None,
            },
        }
    }
}

/// `f(args...)`, `obj.method(args...)`, `f?.(args...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionNode {
    callee: NodeRef,
    args: Vec<NodeRef>,
    optional: bool,
}

impl FunctionNode {
    pub fn new(callee: NodeRef, args: Vec<NodeRef>, optional: bool) -> Self {
        FunctionNode {
            callee,
            args,
            optional,
        }
    }

    /// Call a function by name.
    pub fn named(name: impl Into<String>, args: Vec<NodeRef>) -> Result<Self, NodeError> {
        let callee = Rc::new(Node::Symbol(SymbolNode::new(name)?));
        Ok(FunctionNode::new(callee, args, false))
    }

    pub fn callee(&self) -> &NodeRef {
        &self.callee
    }

    pub fn args(&self) -> &[NodeRef] {
        &self.args
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    /// Name used by renderers and error messages: the symbol name, the
    /// accessed property, or empty for arbitrary callee expressions.
    pub fn name(&self) -> &str {
        match &*self.callee {
            Node::Symbol(s) => s.name(),
            Node::Accessor(a) => a
                .index()
                .and_then(IndexNode::object_property)
                .unwrap_or_default(),
            _ => "",
        }
    }
}

/// `name(params...) = expr`
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionAssignmentNode {
    name: String,
    params: Vec<String>,
    types: Vec<String>,
    expr: NodeRef,
}

impl FunctionAssignmentNode {
    pub fn new(
        name: impl Into<String>,
        params: Vec<String>,
        expr: NodeRef,
    ) -> Result<Self, NodeError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(NodeError::InvalidName {
                node: "FunctionAssignmentNode",
                what: "function name",
                value: name,
            });
        }
        if name == "end" {
            return Err(NodeError::ReservedSymbol(name));
        }
        if let Some(bad) = params.iter().find(|p| !is_identifier(p)) {
            return Err(NodeError::InvalidName {
                node: "FunctionAssignmentNode",
                what: "parameter",
                value: bad.clone(),
            });
        }
        let types = vec!["any".to_owned(); params.len()];
        Ok(FunctionAssignmentNode {
            name,
            params,
            types,
            expr,
        })
    }

    /// Attach parameter type annotations (one per parameter).
    pub fn with_types(mut self, types: Vec<String>) -> Result<Self, NodeError> {
        if types.len() != self.params.len() {
            return Err(NodeError::TypeMismatch {
                node: "FunctionAssignmentNode",
                param: "types".to_owned(),
                expected: "one type per parameter",
                actual: format!("{} types", types.len()),
            });
        }
        self.types = types;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn expr(&self) -> &NodeRef {
        &self.expr
    }
}

/// `start:end` or `start:step:end`.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeNode {
    start: NodeRef,
    end: NodeRef,
    step: Option<NodeRef>,
}

impl RangeNode {
    pub fn new(start: NodeRef, end: NodeRef, step: Option<NodeRef>) -> Self {
        RangeNode { start, end, step }
    }

    pub fn start(&self) -> &NodeRef {
        &self.start
    }

    pub fn end(&self) -> &NodeRef {
        &self.end
    }

    pub fn step(&self) -> Option<&NodeRef> {
        self.step.as_ref()
    }

    /// Whether any bound refers to the `end` symbol.
    pub fn needs_end(&self) -> bool {
        self.start.references_end()
            || self.end.references_end()
            || self.step.as_ref().is_some_and(|s| s.references_end())
    }
}

/// Subscript dimensions, or a single property name in dot notation.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexNode {
    dimensions: Vec<NodeRef>,
    dot_notation: bool,
}

impl IndexNode {
    pub fn new(dimensions: Vec<NodeRef>, dot_notation: bool) -> Self {
        IndexNode {
            dimensions,
            dot_notation,
        }
    }

    /// `.name` index.
    pub fn property(name: impl Into<String>) -> Self {
        let key = Rc::new(Node::Constant(ConstantNode::new(Literal::String(name.into()))));
        IndexNode::new(vec![key], true)
    }

    pub fn dimensions(&self) -> &[NodeRef] {
        &self.dimensions
    }

    pub fn dot_notation(&self) -> bool {
        self.dot_notation
    }

    /// A single string-constant dimension addresses an object property.
    pub fn is_object_property(&self) -> bool {
        self.object_property().is_some()
    }

    pub fn object_property(&self) -> Option<&str> {
        match self.dimensions.as_slice() {
            [only] => match &**only {
                Node::Constant(c) => match c.value() {
                    Literal::String(key) => Some(key),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayNode {
    items: Vec<NodeRef>,
}

impl ArrayNode {
    pub fn new(items: Vec<NodeRef>) -> Self {
        ArrayNode { items }
    }

    pub fn items(&self) -> &[NodeRef] {
        &self.items
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectNode {
    properties: IndexMap<String, NodeRef>,
}

impl ObjectNode {
    pub fn new(properties: IndexMap<String, NodeRef>) -> Self {
        ObjectNode { properties }
    }

    pub fn properties(&self) -> &IndexMap<String, NodeRef> {
        &self.properties
    }
}

/// One statement of a block; `visible` is false when it ended with `;`.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockEntry {
    pub node: NodeRef,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockNode {
    blocks: Vec<BlockEntry>,
}

impl BlockNode {
    pub fn new(blocks: Vec<BlockEntry>) -> Self {
        BlockNode { blocks }
    }

    pub fn blocks(&self) -> &[BlockEntry] {
        &self.blocks
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
