//! Mathexpr IR - the expression node tree.
//!
//! Every parsed expression is a tree of [`Node`] values. Children are held as
//! [`NodeRef`] (`Rc<Node>`), so cloning a node is shallow and rewrite passes
//! can share untouched subtrees.
//!
//! # Architecture
//!
//! - [`node`]: the closed set of node variants and their validated constructors
//! - [`literal`]: constant values that can appear directly in a tree
//! - [`traverse`]: `for_each`, `map`, `traverse`, `transform`, `filter`
//! - [`operators`]: precedence and associativity tables shared by the renderers
//! - [`render`]: string, HTML and TeX output
//! - [`json`]: `{"mathjs": <type>, ...}` encoding and decoding

pub mod json;
pub mod literal;
pub mod node;
pub mod operators;
pub mod render;
pub mod traverse;

pub use literal::{format_number, Literal};
pub use node::{
    AccessorNode, ArrayNode, AssignmentNode, BlockEntry, BlockNode, ConditionalNode, ConstantNode,
    FunctionAssignmentNode, FunctionNode, IndexNode, Node, NodeError, NodeRef, ObjectNode,
    OperatorNode, ParenthesisNode, RangeNode, SymbolNode, NODE_TYPES,
};
pub use render::{ImplicitMode, ParenthesisMode, RenderOptions, TexOverride};
pub use traverse::IntoNode;
