//! Recursive-descent parser.
//!
//! # Module Structure
//!
//! - `parser.rs`: token cursor, blocks, assignment and conditional
//! - `operators.rs`: binary and unary operator levels
//! - `postfix.rs`: factorial, property and index access, calls
//! - `primary.rs`: literals, symbols, parentheses, matrices, objects

mod operators;
mod postfix;
mod primary;

use std::rc::Rc;

use mathexpr_ir::{
    AssignmentNode, BlockEntry, BlockNode, ConditionalNode, FunctionAssignmentNode, FunctionNode,
    Literal, Node, NodeError, NodeRef, OperatorNode,
};
use mathexpr_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::context::ParseContext;
use crate::error::{char_position, ParseError};
use crate::lexer::{lex, Token, TokenKind};

/// Parser over one source text.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    context: ParseContext,
}

impl<'src> Parser<'src> {
    /// Tokenize `source`. Lexical errors surface here.
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        Ok(Parser {
            source,
            tokens: lex(source)?,
            pos: 0,
            context: ParseContext::empty(),
        })
    }

    /// Parse the whole input.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        let node = self.parse_block()?;
        if self.check(&TokenKind::Eof) {
            Ok(node)
        } else {
            Err(self.unexpected())
        }
    }

    // ===== Token access =====

    /// Index of the first significant token at or after `pos`.
    fn significant(&self, mut pos: usize) -> usize {
        if self.context.skips_newlines() {
            while matches!(self.tokens.get(pos), Some(t) if t.kind == TokenKind::Newline) {
                pos += 1;
            }
        }
        pos.min(self.tokens.len().saturating_sub(1))
    }

    fn token_at(&self, pos: usize) -> &Token {
        &self.tokens[self.significant(pos)]
    }

    fn current(&self) -> &Token {
        self.token_at(self.pos)
    }

    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// The token after the current one.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.token_at(self.significant(self.pos) + 1).kind
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn advance(&mut self) {
        let at = self.significant(self.pos);
        if self.tokens[at].kind != TokenKind::Eof {
            self.pos = at + 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        let found = self.check(kind);
        if found {
            self.advance();
        }
        found
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Newlines directly after an operator never end a statement.
    pub(crate) fn skip_newlines(&mut self) {
        while self.tokens.get(self.pos).is_some_and(|t| t.kind == TokenKind::Newline) {
            self.pos += 1;
        }
    }

    pub(crate) fn position(&self) -> usize {
        char_position(self.source, self.current().start)
    }

    /// Snapshot of the cursor for speculative parsing.
    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    pub(crate) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    // ===== Errors =====

    pub(crate) fn error(&self, message: &str) -> ParseError {
        ParseError::new(message, self.position())
    }

    fn unexpected(&self) -> ParseError {
        let token = self.current();
        let text = self.source.get(token.start..token.end).unwrap_or_default();
        let message = match token.kind {
            TokenKind::Number(_) | TokenKind::Str(_) | TokenKind::Ident(_) => {
                format!("Unexpected \"{text}\"")
            }
            TokenKind::Newline => "Unexpected line break".to_owned(),
            _ => format!("Unexpected operator {text}"),
        };
        ParseError::new(message, self.position())
    }

    pub(crate) fn node_error(&self, err: &NodeError, position: usize) -> ParseError {
        ParseError::new(err.to_string(), position)
    }

    // ===== Context =====

    /// Run `f` inside a bracket pair; the context is restored afterwards.
    pub(crate) fn in_group<T>(&mut self, index: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context;
        self.context = saved.enter_group(index);
        let result = f(self);
        self.context = saved;
        result
    }

    fn in_true_branch<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context;
        self.context = saved | ParseContext::IN_CONDITIONAL;
        let result = f(self);
        self.context = saved;
        result
    }

    pub(crate) fn context(&self) -> ParseContext {
        self.context
    }

    // ===== Node helpers =====

    pub(crate) fn operator(
        &self,
        op: &str,
        fn_name: &str,
        args: Vec<Node>,
    ) -> Result<OperatorNode, ParseError> {
        let position = self.position();
        OperatorNode::new(op, fn_name, args.into_iter().map(Rc::new).collect())
            .map_err(|err| self.node_error(&err, position))
    }

    // ===== Statements =====

    fn at_statement_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let mut blocks = Vec::new();
        let mut first = None;
        if !self.at_statement_end() {
            first = Some(self.parse_assignment()?);
        }
        while matches!(self.current_kind(), TokenKind::Newline | TokenKind::Semicolon) {
            if let Some(node) = first.take() {
                let visible = !self.check(&TokenKind::Semicolon);
                blocks.push(BlockEntry {
                    node: Rc::new(node),
                    visible,
                });
            }
            self.advance();
            if !self.at_statement_end() {
                let node = self.parse_assignment()?;
                let visible = !self.check(&TokenKind::Semicolon);
                blocks.push(BlockEntry {
                    node: Rc::new(node),
                    visible,
                });
            }
        }
        if blocks.is_empty() {
            return Ok(first.unwrap_or_else(|| Node::from(Literal::Undefined)));
        }
        trace!(statements = blocks.len(), "parsed block");
        Ok(Node::Block(BlockNode::new(blocks)))
    }

    /// `target = value`. The target decides the node: a symbol or accessor
    /// gives an assignment, a call with symbol arguments defines a function.
    pub(crate) fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> Result<Node, ParseError> {
        let target = self.parse_conditional()?;
        if !self.check(&TokenKind::Eq) {
            return Ok(target);
        }
        let at = self.position();
        self.advance();
        self.skip_newlines();
        let value: NodeRef = Rc::new(self.parse_assignment()?);

        let assignment = match target {
            Node::Symbol(_) => AssignmentNode::new(Rc::new(target), None, value),
            Node::Accessor(accessor) if !accessor.optional_chaining() => AssignmentNode::new(
                accessor.object().clone(),
                Some(accessor.index_node().clone()),
                value,
            ),
            Node::FunctionCall(call) if is_function_signature(&call) => {
                let params = call
                    .args()
                    .iter()
                    .filter_map(|arg| match &**arg {
                        Node::Symbol(s) => Some(s.name().to_owned()),
                        _ => None,
                    })
                    .collect();
                trace!(name = call.name(), "function assignment");
                return FunctionAssignmentNode::new(call.name(), params, value)
                    .map(Node::FunctionAssignment)
                    .map_err(|err| self.node_error(&err, at));
            }
            _ => {
                return Err(ParseError::new(
                    "Invalid left hand side of assignment operator =",
                    at,
                ))
            }
        };
        assignment
            .map(Node::Assignment)
            .map_err(|err| self.node_error(&err, at))
    }

    /// `condition ? a : b`. Right associative through the false branch.
    fn parse_conditional(&mut self) -> Result<Node, ParseError> {
        let condition = self.parse_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        self.skip_newlines();
        let true_expr = self.in_true_branch(Self::parse_assignment)?;
        self.expect(
            &TokenKind::Colon,
            "False part of conditional expression expected",
        )?;
        self.skip_newlines();
        let false_expr = self.parse_assignment()?;
        Ok(Node::Conditional(ConditionalNode::new(
            Rc::new(condition),
            Rc::new(true_expr),
            Rc::new(false_expr),
        )))
    }
}

fn is_function_signature(call: &FunctionNode) -> bool {
    !call.optional()
        && matches!(**call.callee(), Node::Symbol(_))
        && call.args().iter().all(|arg| matches!(**arg, Node::Symbol(_)))
}
