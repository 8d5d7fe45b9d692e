//! Mathexpr Parse - text to node tree.
//!
//! # Architecture
//!
//! - [`lexer`]: `logos` tokenizer; comments and horizontal whitespace are
//!   dropped, newlines are kept because they separate statements
//! - [`parser`]: recursive descent with one method per precedence level
//! - `context`: flags for context-sensitive rules (newlines inside brackets,
//!   `:` inside the true branch of a conditional, `end` inside an index)
//!
//! # Grammar, weakest binding first
//!
//! ```text
//! block        statements separated by `;` (hidden result) or newline
//! assignment   a = v | a.b = v | a[i] = v | f(x, y) = body
//! conditional  c ? a : b                  (right associative)
//! or, xor, and
//! relational   == != < > <= >=            (left associative)
//! conversion   to, in
//! range        a:b | a:step:b
//! additive     + -                        (`a + b%` is `a + a*b%`)
//! multiplicative * / .* ./
//! implicit     2 x, 2(x + 1)              (binds tighter than * and /)
//! percentage   50%, a mod b, a % b
//! unary        - + not
//! power        ^ .^                       (right associative)
//! factorial    n!
//! accessors    a.b  a?.b  a[i]  a?.[i]  f(x)  f?.(x)
//! primary      numbers, strings, true false null undefined, symbols,
//!              (..), [1, 2; 3, 4], {a: 1}
//! ```

mod context;
mod error;
pub mod lexer;
pub mod parser;

pub use error::ParseError;
pub use parser::Parser;

use mathexpr_ir::Node;

/// Parse an expression or a block of statements.
///
/// An empty input yields an `undefined` constant. More than one statement
/// yields a block node.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    Parser::new(source)?.parse()
}
