//! Operator precedence chain, from `or` down to `^`.

use std::rc::Rc;

use mathexpr_ir::{Literal, Node, RangeNode, SymbolNode};
use mathexpr_stack::ensure_sufficient_stack;

use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::Parser;

/// An operator's display symbol and the namespace function it calls.
type OpSpec = (&'static str, &'static str);

fn match_or(kind: &TokenKind) -> Option<OpSpec> {
    matches!(kind, TokenKind::Or).then_some(("or", "or"))
}

fn match_xor(kind: &TokenKind) -> Option<OpSpec> {
    matches!(kind, TokenKind::Xor).then_some(("xor", "xor"))
}

fn match_and(kind: &TokenKind) -> Option<OpSpec> {
    matches!(kind, TokenKind::And).then_some(("and", "and"))
}

fn match_relational(kind: &TokenKind) -> Option<OpSpec> {
    match kind {
        TokenKind::EqEq => Some(("==", "equal")),
        TokenKind::NotEq => Some(("!=", "unequal")),
        TokenKind::Lt => Some(("<", "smaller")),
        TokenKind::Gt => Some((">", "larger")),
        TokenKind::LtEq => Some(("<=", "smallerEq")),
        TokenKind::GtEq => Some((">=", "largerEq")),
        _ => None,
    }
}

fn match_conversion(kind: &TokenKind) -> Option<OpSpec> {
    match kind {
        TokenKind::To => Some(("to", "to")),
        TokenKind::In => Some(("in", "to")),
        _ => None,
    }
}

fn match_additive(kind: &TokenKind) -> Option<OpSpec> {
    match kind {
        TokenKind::Plus => Some(("+", "add")),
        TokenKind::Minus => Some(("-", "subtract")),
        _ => None,
    }
}

fn match_multiplicative(kind: &TokenKind) -> Option<OpSpec> {
    match kind {
        TokenKind::Star => Some(("*", "multiply")),
        TokenKind::Slash => Some(("/", "divide")),
        TokenKind::DotStar => Some((".*", "dotMultiply")),
        TokenKind::DotSlash => Some(("./", "dotDivide")),
        _ => None,
    }
}

fn match_unary(kind: &TokenKind) -> Option<OpSpec> {
    match kind {
        TokenKind::Minus => Some(("-", "unaryMinus")),
        TokenKind::Plus => Some(("+", "unaryPlus")),
        TokenKind::Not => Some(("not", "not")),
        _ => None,
    }
}

fn match_pow(kind: &TokenKind) -> Option<OpSpec> {
    match kind {
        TokenKind::Caret => Some(("^", "pow")),
        TokenKind::DotCaret => Some((".^", "dotPow")),
        _ => None,
    }
}

fn is_percentage(node: &Node) -> bool {
    matches!(node, Node::Operator(op) if op.is_percentage())
}

/// Left operand of the `1/2 x` rule: a constant, or a sign applied to one.
fn is_rule2_operand(node: &Node) -> bool {
    match node {
        Node::Constant(_) => true,
        Node::Operator(op) => {
            matches!(op.fn_name(), "unaryMinus" | "unaryPlus")
                && matches!(op.args(), [arg] if matches!(**arg, Node::Constant(_)))
        }
        _ => false,
    }
}

/// Whether a number may directly follow `last` as an implicit factor:
/// `x 2` and `3! 2` do, `2 3` and `-2 3` do not.
fn number_may_follow(last: &Node) -> bool {
    match last {
        Node::Constant(_) => false,
        Node::Operator(op) => op.op() == "!",
        _ => true,
    }
}

impl Parser<'_> {
    /// One left-associative binary level.
    fn parse_left_assoc(
        &mut self,
        matcher: fn(&TokenKind) -> Option<OpSpec>,
        next: fn(&mut Self) -> Result<Node, ParseError>,
    ) -> Result<Node, ParseError> {
        let mut node = next(self)?;
        while let Some((op, fn_name)) = matcher(self.current_kind()) {
            self.advance();
            self.skip_newlines();
            let rhs = next(self)?;
            node = Node::Operator(self.operator(op, fn_name, vec![node, rhs])?);
        }
        Ok(node)
    }

    pub(crate) fn parse_or(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(match_or, Self::parse_xor)
    }

    fn parse_xor(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(match_xor, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(match_and, Self::parse_relational)
    }

    /// `a < b < c` is `(a < b) < c`.
    fn parse_relational(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(match_relational, Self::parse_conversion)
    }

    fn parse_conversion(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(match_conversion, Self::parse_range)
    }

    /// `start:end` or `start:step:end`.
    ///
    /// Inside an index a leading `:` means `1` and a missing end means
    /// `end`, so `[:]` and `[2:]` select whole or trailing dimensions.
    fn parse_range(&mut self) -> Result<Node, ParseError> {
        let in_index = self.context().in_index();
        let first = if in_index && self.check(&TokenKind::Colon) {
            Node::from(Literal::Number(1.0))
        } else {
            self.parse_additive()?
        };
        if !self.context().colon_is_range() || !self.check(&TokenKind::Colon) {
            return Ok(first);
        }

        let mut parts = vec![first];
        while self.eat(&TokenKind::Colon) {
            let open_end = matches!(
                self.current_kind(),
                TokenKind::RBracket | TokenKind::Comma | TokenKind::Eof
            );
            if in_index && open_end {
                let end = SymbolNode::new("end").map_err(|err| {
                    let at = self.position();
                    self.node_error(&err, at)
                })?;
                parts.push(Node::Symbol(end));
            } else {
                parts.push(self.parse_additive()?);
            }
        }

        let mut parts = parts.into_iter().map(Rc::new);
        let range = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(start), Some(end), None, None) => RangeNode::new(start, end, None),
            (Some(start), Some(step), Some(end), None) => RangeNode::new(start, end, Some(step)),
            _ => return Err(self.error("Range takes at most three parts")),
        };
        Ok(Node::Range(range))
    }

    /// `a + b` and `a - b`. A percentage on the right is taken of the left
    /// operand: `a + b%` is `a + a * b%`.
    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_multiplicative()?;
        while let Some((op, fn_name)) = match_additive(self.current_kind()) {
            self.advance();
            self.skip_newlines();
            let mut rhs = self.parse_multiplicative()?;
            if is_percentage(&rhs) {
                rhs = Node::Operator(self.operator("*", "multiply", vec![node.clone(), rhs])?);
            }
            node = Node::Operator(self.operator(op, fn_name, vec![node, rhs])?);
        }
        Ok(node)
    }

    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        self.parse_left_assoc(match_multiplicative, Self::parse_implicit)
    }

    /// Juxtaposition: `2 x`, `2 (x + 1)`, `x 2`. Binds tighter than `*` and
    /// `/`, so `a / 2 x` is `a / (2 x)`.
    fn parse_implicit(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_rule2()?;
        let mut number_allowed = number_may_follow(&node);
        loop {
            let starts_factor = match self.current_kind() {
                TokenKind::Ident(_) | TokenKind::LParen => true,
                TokenKind::Number(_) => number_allowed,
                _ => false,
            };
            if !starts_factor {
                return Ok(node);
            }
            let factor = self.parse_rule2()?;
            number_allowed = number_may_follow(&factor);
            node = Node::Operator(
                self.operator("*", "multiply", vec![node, factor])?
                    .with_implicit(true),
            );
        }
    }

    /// `1/2 x` reads as `(1/2) x`: a constant divided by a number that is
    /// itself followed by an implicit factor keeps the division tight.
    fn parse_rule2(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_percentage()?;
        let mut last_is_constant = is_rule2_operand(&node);
        while last_is_constant && self.check(&TokenKind::Slash) {
            let mark = self.mark();
            self.advance();
            self.skip_newlines();
            let tight = matches!(self.current_kind(), TokenKind::Number(_))
                && matches!(self.peek_kind(), TokenKind::Ident(_) | TokenKind::LParen);
            if !tight {
                self.reset(mark);
                break;
            }
            let divisor = self.parse_percentage()?;
            last_is_constant = is_rule2_operand(&divisor);
            node = Node::Operator(self.operator("/", "divide", vec![node, divisor])?);
        }
        Ok(node)
    }

    /// `50%` (a hundredth), `a % b` and `a mod b` (remainder).
    fn parse_percentage(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_unary()?;
        loop {
            match self.current_kind() {
                TokenKind::Mod => {
                    self.advance();
                    self.skip_newlines();
                    let rhs = self.parse_unary()?;
                    node = Node::Operator(self.operator("mod", "mod", vec![node, rhs])?);
                }
                TokenKind::Percent => {
                    self.advance();
                    if self.current_kind().starts_operand() {
                        let rhs = self.parse_unary()?;
                        node = Node::Operator(self.operator("%", "mod", vec![node, rhs])?);
                    } else {
                        let hundred = Node::from(Literal::Number(100.0));
                        node = Node::Operator(
                            self.operator("/", "divide", vec![node, hundred])?
                                .with_percentage(true),
                        );
                    }
                }
                _ => return Ok(node),
            }
        }
    }

    /// Prefix `-`, `+` and `not`.
    pub(crate) fn parse_unary(&mut self) -> Result<Node, ParseError> {
        ensure_sufficient_stack(|| {
            let Some((op, fn_name)) = match_unary(self.current_kind()) else {
                return self.parse_pow();
            };
            self.advance();
            self.skip_newlines();
            let operand = self.parse_unary()?;
            Ok(Node::Operator(self.operator(op, fn_name, vec![operand])?))
        })
    }

    /// `a ^ b`, right associative; the exponent may carry a sign.
    fn parse_pow(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_factorial()?;
        let Some((op, fn_name)) = match_pow(self.current_kind()) else {
            return Ok(base);
        };
        self.advance();
        self.skip_newlines();
        let exponent = self.parse_unary()?;
        Ok(Node::Operator(self.operator(op, fn_name, vec![base, exponent])?))
    }
}
