//! Rendering node trees back to text.
//!
//! Three back ends share one parenthesization policy
//! ([`operators::operand_parens`](crate::operators::operand_parens)):
//! - [`Node::to_string_with`]: plain expression syntax, re-parseable
//! - [`Node::to_html`]: `<span class="math-...">` markup
//! - [`Node::to_tex`]: LaTeX

mod html;
mod string;
mod tex;

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::node::{FunctionNode, Node};

/// How parentheses written by the user are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParenthesisMode {
    /// Print parenthesis nodes as written.
    #[default]
    Keep,
    /// Drop redundant parentheses, add only what precedence requires.
    Auto,
    /// Parenthesize every non-atomic operand.
    All,
}

/// Whether implicit multiplication is printed with a visible operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplicitMode {
    #[default]
    Hide,
    Show,
}

/// Custom TeX for calls to a named function.
#[derive(Clone)]
pub enum TexOverride {
    /// Template with `${name}`, `${args}` and `${args[i]}` placeholders.
    Template(String),
    Callback(Rc<dyn Fn(&FunctionNode, &RenderOptions) -> String>),
}

impl fmt::Debug for TexOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TexOverride::Template(t) => f.debug_tuple("Template").field(t).finish(),
            TexOverride::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub parenthesis: ParenthesisMode,
    pub implicit: ImplicitMode,
    tex_overrides: FxHashMap<String, TexOverride>,
}

impl RenderOptions {
    pub fn new(parenthesis: ParenthesisMode, implicit: ImplicitMode) -> Self {
        RenderOptions {
            parenthesis,
            implicit,
            tex_overrides: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_tex_template(
        mut self,
        function: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.tex_overrides
            .insert(function.into(), TexOverride::Template(template.into()));
        self
    }

    #[must_use]
    pub fn with_tex_callback(
        mut self,
        function: impl Into<String>,
        callback: impl Fn(&FunctionNode, &RenderOptions) -> String + 'static,
    ) -> Self {
        self.tex_overrides
            .insert(function.into(), TexOverride::Callback(Rc::new(callback)));
        self
    }

    pub(crate) fn tex_override(&self, function: &str) -> Option<&TexOverride> {
        self.tex_overrides.get(function)
    }
}

impl Node {
    /// Expression syntax under the given options.
    pub fn to_string_with(&self, options: &RenderOptions) -> String {
        string::render(self, options)
    }

    pub fn to_html(&self, options: &RenderOptions) -> String {
        html::render(self, options)
    }

    pub fn to_tex(&self, options: &RenderOptions) -> String {
        tex::render(self, options)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&string::render(self, &RenderOptions::default()))
    }
}
