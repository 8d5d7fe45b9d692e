//! Primary expressions.

use std::rc::Rc;

use indexmap::IndexMap;
use mathexpr_ir::{
    format_number, ArrayNode, Literal, Node, NodeRef, ObjectNode, ParenthesisNode, SymbolNode,
};

use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::Parser;

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let literal = match self.current_kind() {
            TokenKind::Number(n) => {
                let node = Node::from(Literal::Number(*n));
                self.advance();
                return Ok(node);
            }
            TokenKind::Str(s) => Literal::String(s.clone()),
            TokenKind::True => Literal::Boolean(true),
            TokenKind::False => Literal::Boolean(false),
            TokenKind::Null => Literal::Null,
            TokenKind::Undefined => Literal::Undefined,
            TokenKind::Ident(name) => {
                let position = self.position();
                let symbol = SymbolNode::new(name.clone())
                    .map_err(|err| self.node_error(&err, position))?;
                self.advance();
                return self.parse_accessors(Node::Symbol(symbol));
            }
            TokenKind::LParen => return self.parse_parenthesis(),
            TokenKind::LBracket => return self.parse_matrix(),
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::Eof => return Err(self.error("Unexpected end of expression")),
            _ => return Err(self.error("Value expected")),
        };
        self.advance();
        self.parse_accessors(Node::from(literal))
    }

    fn parse_parenthesis(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let inner = self.in_group(false, |p| {
            let inner = p.parse_assignment()?;
            p.expect(&TokenKind::RParen, "Parenthesis ) expected")?;
            Ok(inner)
        })?;
        self.parse_accessors(Node::Parenthesis(ParenthesisNode::new(Rc::new(inner))))
    }

    /// `[a, b]` is a vector, `[a, b; c, d]` a matrix of row vectors.
    fn parse_matrix(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let matrix = self.in_group(false, |p| {
            if p.eat(&TokenKind::RBracket) {
                return Ok(ArrayNode::new(Vec::new()));
            }
            let mut rows: Vec<Vec<NodeRef>> = vec![Vec::new()];
            loop {
                let item = Rc::new(p.parse_assignment()?);
                if let Some(row) = rows.last_mut() {
                    row.push(item);
                }
                if p.eat(&TokenKind::Comma) {
                    continue;
                }
                if p.eat(&TokenKind::Semicolon) {
                    rows.push(Vec::new());
                    continue;
                }
                break;
            }
            p.expect(&TokenKind::RBracket, "End of matrix ] expected")?;
            p.matrix_from_rows(rows)
        })?;
        self.parse_accessors(Node::Array(matrix))
    }

    fn matrix_from_rows(&self, mut rows: Vec<Vec<NodeRef>>) -> Result<ArrayNode, ParseError> {
        if rows.len() == 1 {
            return Ok(ArrayNode::new(rows.pop().unwrap_or_default()));
        }
        let columns = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != columns) {
            return Err(self.error(&format!(
                "Column dimensions mismatch ({} != {columns})",
                row.len()
            )));
        }
        let rows = rows
            .into_iter()
            .map(|row| Rc::new(Node::Array(ArrayNode::new(row))))
            .collect();
        Ok(ArrayNode::new(rows))
    }

    /// `{key: value, ...}`. Keys are identifiers, strings or numbers.
    fn parse_object(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let object = self.in_group(false, |p| {
            let mut properties = IndexMap::new();
            if p.eat(&TokenKind::RBrace) {
                return Ok(ObjectNode::new(properties));
            }
            loop {
                let key = match p.current_kind() {
                    TokenKind::Str(s) | TokenKind::Ident(s) => s.clone(),
                    TokenKind::Number(n) => format_number(*n),
                    _ => return Err(p.error("Symbol or string expected as object key")),
                };
                p.advance();
                p.expect(&TokenKind::Colon, "Colon : expected after object key")?;
                let value = Rc::new(p.parse_assignment()?);
                properties.insert(key, value);
                if p.eat(&TokenKind::Comma) {
                    continue;
                }
                p.expect(&TokenKind::RBrace, "Comma , or bracket } expected after object value")?;
                return Ok(ObjectNode::new(properties));
            }
        })?;
        self.parse_accessors(Node::Object(object))
    }
}
