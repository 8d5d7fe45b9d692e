//! Tokenizer built on `logos`.
//!
//! Horizontal whitespace and `#` comments are skipped. Newlines survive as
//! [`TokenKind::Newline`] since they separate statements; the parser decides
//! where they are insignificant. The token list always ends with
//! [`TokenKind::Eof`].

use logos::Logos;

use crate::error::{char_position, ParseError};

/// Raw token from logos, before conversion.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+|#[^\n]*")]
enum RawToken {
    #[token("\n")]
    Newline,

    // === Named operators and constants ===
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("xor")]
    Xor,
    #[token("not")]
    Not,
    #[token("mod")]
    Mod,
    #[token("to")]
    To,
    #[token("in")]
    In,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("?.")]
    QuestionDot,
    #[token(".")]
    Dot,

    // === Operators ===
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(".*")]
    DotStar,
    #[token("./")]
    DotSlash,
    #[token("^")]
    Caret,
    #[token(".^")]
    DotCaret,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,

    // === Literals ===
    #[regex(r"([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| number(lex.slice()))]
    Number(f64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'([^'\\]|\\.)*'", |lex| unquote(lex.slice()))]
    Str(String),

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_owned())]
    Ident(String),
}

/// Token kinds seen by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),

    And,
    Or,
    Xor,
    Not,
    Mod,
    To,
    In,
    True,
    False,
    Null,
    Undefined,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Question,
    QuestionDot,
    Dot,

    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    DotStar,
    DotSlash,
    Caret,
    DotCaret,
    Percent,
    Bang,

    Newline,
    Eof,
}

impl TokenKind {
    /// Whether the token can begin an operand. Used to tell `a % b` (mod)
    /// from `50%` followed by an operator.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::Str(_)
                | TokenKind::Ident(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Undefined
                | TokenKind::LParen
        )
    }
}

/// A token and its byte span in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Tokenize `source`. Fails on the first character that starts no token.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let Ok(raw) = result else {
            let slice = lexer.slice();
            let message = if slice.starts_with(['"', '\'']) {
                "End of string missing".to_owned()
            } else {
                format!("Syntax error in part \"{slice}\"")
            };
            return Err(ParseError::new(message, char_position(source, span.start)));
        };
        tokens.push(Token {
            kind: convert(raw),
            start: span.start,
            end: span.end,
        });
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        start: source.len(),
        end: source.len(),
    });
    Ok(tokens)
}

fn convert(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Number(n) => TokenKind::Number(n),
        RawToken::Str(s) => TokenKind::Str(s),
        RawToken::Ident(name) => TokenKind::Ident(name),

        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Xor => TokenKind::Xor,
        RawToken::Not => TokenKind::Not,
        RawToken::Mod => TokenKind::Mod,
        RawToken::To => TokenKind::To,
        RawToken::In => TokenKind::In,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Undefined => TokenKind::Undefined,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Question => TokenKind::Question,
        RawToken::QuestionDot => TokenKind::QuestionDot,
        RawToken::Dot => TokenKind::Dot,

        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::DotStar => TokenKind::DotStar,
        RawToken::DotSlash => TokenKind::DotSlash,
        RawToken::Caret => TokenKind::Caret,
        RawToken::DotCaret => TokenKind::DotCaret,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,

        RawToken::Newline => TokenKind::Newline,
    }
}

fn number(literal: &str) -> Option<f64> {
    literal.parse().ok()
}

/// Strip the quotes from a string literal and process escapes.
fn unquote(literal: &str) -> Option<String> {
    let body = literal.get(1..literal.len().saturating_sub(1))?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            // \" \' \\ \/
            other => other,
        };
        out.push(escaped);
    }
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
