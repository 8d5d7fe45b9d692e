use thiserror::Error;

/// A syntax error with the 1-based character position it was found at.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} (char {position})")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// 1-based character position of a byte offset.
pub(crate) fn char_position(source: &str, offset: usize) -> usize {
    source
        .get(..offset)
        .map_or(offset, |prefix| prefix.chars().count())
        + 1
}
