//! Postfix forms: `n!`, calls, `[...]` subscripts, `.name` and `?.` chains.

use std::rc::Rc;

use mathexpr_ir::{AccessorNode, FunctionNode, IndexNode, Node, NodeRef};

use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::Parser;

impl Parser<'_> {
    /// `5!`, `n!!`; an accessor chain may follow each `!`.
    pub(crate) fn parse_factorial(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_primary()?;
        while self.eat(&TokenKind::Bang) {
            let factorial = self.operator("!", "factorial", vec![node])?;
            node = self.parse_accessors(Node::Operator(factorial))?;
        }
        Ok(node)
    }

    /// Apply calls, subscripts and property reads to `node` until none follow.
    ///
    /// Only symbols, accessors and calls can be called without `?.`; `2 (3)` is an
    /// implicit multiplication, handled a level up.
    pub(crate) fn parse_accessors(&mut self, mut node: Node) -> Result<Node, ParseError> {
        loop {
            node = match self.current_kind() {
                TokenKind::LParen
                    if matches!(
                        node,
                        Node::Symbol(_) | Node::Accessor(_) | Node::FunctionCall(_)
                    ) =>
                {
                    self.advance();
                    let args = self.parse_call_args()?;
                    Node::FunctionCall(FunctionNode::new(Rc::new(node), args, false))
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_index_dims()?;
                    self.accessor(node, index, false)?
                }
                TokenKind::Dot => {
                    self.advance();
                    let index = self.parse_property_name()?;
                    self.accessor(node, index, false)?
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    match self.current_kind() {
                        TokenKind::LParen => {
                            self.advance();
                            let args = self.parse_call_args()?;
                            Node::FunctionCall(FunctionNode::new(Rc::new(node), args, true))
                        }
                        TokenKind::LBracket => {
                            self.advance();
                            let index = self.parse_index_dims()?;
                            self.accessor(node, index, true)?
                        }
                        _ => {
                            let index = self.parse_property_name()?;
                            self.accessor(node, index, true)?
                        }
                    }
                }
                _ => return Ok(node),
            };
        }
    }

    fn accessor(&self, object: Node, index: IndexNode, optional: bool) -> Result<Node, ParseError> {
        let position = self.position();
        AccessorNode::new(Rc::new(object), Rc::new(Node::Index(index)), optional)
            .map(Node::Accessor)
            .map_err(|err| self.node_error(&err, position))
    }

    fn parse_property_name(&mut self) -> Result<IndexNode, ParseError> {
        let TokenKind::Ident(name) = self.current_kind() else {
            return Err(self.error("Property name expected after dot"));
        };
        let index = IndexNode::property(name.clone());
        self.advance();
        Ok(index)
    }

    /// Arguments after `(`, through the closing `)`.
    fn parse_call_args(&mut self) -> Result<Vec<NodeRef>, ParseError> {
        self.in_group(false, |p| {
            let args = p.parse_list(&TokenKind::RParen)?;
            p.expect(&TokenKind::RParen, "Parenthesis ) expected")?;
            Ok(args)
        })
    }

    /// Dimensions after `[`, through the closing `]`. `end` is meaningful here.
    fn parse_index_dims(&mut self) -> Result<IndexNode, ParseError> {
        self.in_group(true, |p| {
            let dims = p.parse_list(&TokenKind::RBracket)?;
            p.expect(&TokenKind::RBracket, "Parenthesis ] expected")?;
            Ok(IndexNode::new(dims, false))
        })
    }

    /// Comma separated expressions, possibly empty, up to `close`.
    fn parse_list(&mut self, close: &TokenKind) -> Result<Vec<NodeRef>, ParseError> {
        let mut items = Vec::new();
        if self.check(close) {
            return Ok(items);
        }
        loop {
            items.push(Rc::new(self.parse_assignment()?));
            if !self.eat(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }
}
