//! Error types for expression evaluation.
//!
//! `EvalErrorKind` carries the structured category; the factory functions
//! below are the public way to build errors and fill in both `kind` and the
//! rendered `message`.

use std::fmt;

use mathexpr_ir::NodeError;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category.
///
/// Callers match on the kind, never on the message text. Several kinds
/// originate from the same call site but must stay distinct, e.g.
/// [`EvalErrorKind::UndefinedFunction`] ("no such binding") versus
/// [`EvalErrorKind::ForbiddenAccess`] ("binding exists but may not be called").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Resolution
    UndefinedSymbol {
        name: String,
    },
    UndefinedFunction {
        name: String,
    },
    ForbiddenAccess {
        name: String,
    },
    NotCallable {
        source: String,
        value: String,
    },

    // Dispatch
    NoMatchingSignature {
        name: String,
        types: Vec<String>,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    TypeMismatch {
        expected: String,
        got: String,
    },
    UnsupportedCondition {
        type_name: String,
    },

    // Access
    PropertyNotFound {
        key: String,
    },
    InvalidPropertyAccess {
        key: String,
        type_name: String,
    },
    IndexOutOfBounds {
        index: usize,
        size: usize,
    },
    InvalidIndex {
        index: String,
    },
    DimensionMismatch {
        expected: usize,
        got: usize,
    },

    // Arithmetic
    DivisionByZero,

    // Front end
    InvalidNode {
        message: String,
    },
    Syntax {
        message: String,
        position: usize,
    },

    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedSymbol { name } => write!(f, "Undefined symbol {name}"),
            Self::UndefinedFunction { name } => write!(f, "Undefined function \"{name}\""),
            Self::ForbiddenAccess { name } => write!(f, "No access to function \"{name}\""),
            Self::NotCallable { source, value } => write!(
                f,
                "Expression '{source}' is not a function; its value is:\n  {value}"
            ),

            Self::NoMatchingSignature { name, types } => write!(
                f,
                "Unexpected type of argument in function {name} (actual: {})",
                types.join(", ")
            ),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let amount = if got > expected { "Too many" } else { "Too few" };
                write!(
                    f,
                    "{amount} arguments in function {name} (expected: {expected}, actual: {got})"
                )
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "TypeError: expected {expected}, got {got}")
            }
            Self::UnsupportedCondition { type_name } => {
                write!(f, "Unsupported type of condition \"{type_name}\"")
            }

            Self::PropertyNotFound { key } => write!(f, "No such property \"{key}\""),
            Self::InvalidPropertyAccess { key, type_name } => {
                write!(f, "Cannot access property \"{key}\" of {type_name}")
            }
            Self::IndexOutOfBounds { index, size } => {
                write!(f, "Index out of range ({} > {size})", index + 1)
            }
            Self::InvalidIndex { index } => {
                write!(f, "Index must be a positive integer, got {index}")
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "Dimension mismatch ({expected} != {got})")
            }

            Self::DivisionByZero => write!(f, "Division by zero"),

            Self::InvalidNode { message } => write!(f, "{message}"),
            Self::Syntax { message, position } => write!(f, "{message} (char {position})"),

            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured category.
    pub kind: EvalErrorKind,
    /// Human-readable message, equal to `kind.to_string()` for factory-built
    /// errors.
    pub message: String,
    /// Secondary context, outermost last.
    pub notes: Vec<String>,
}

impl EvalError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer a factory function when one fits.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            notes: Vec::new(),
        }
    }

    /// Add a context note to this error.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<NodeError> for EvalError {
    fn from(err: NodeError) -> Self {
        EvalError::from_kind(EvalErrorKind::InvalidNode {
            message: err.to_string(),
        })
    }
}

// Resolution

#[cold]
pub fn undefined_symbol(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedSymbol {
        name: name.to_owned(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_owned(),
    })
}

/// The binding exists but the namespace policy forbids calling it.
#[cold]
pub fn forbidden_access(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ForbiddenAccess {
        name: name.to_owned(),
    })
}

/// `source` is the callee as the user wrote it, `value` what it evaluated to.
#[cold]
pub fn not_callable(source: &str, value: &Value) -> EvalError {
    let mut rendered = value.to_string();
    if rendered.chars().count() > 80 {
        rendered = rendered.chars().take(77).collect::<String>() + "...";
    }
    EvalError::from_kind(EvalErrorKind::NotCallable {
        source: source.to_owned(),
        value: rendered,
    })
}

// Dispatch

#[cold]
pub fn no_matching_signature(name: &str, args: &[Value]) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoMatchingSignature {
        name: name.to_owned(),
        types: args.iter().map(|a| a.type_of().to_owned()).collect(),
    })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected,
        got,
    })
}

#[cold]
pub fn type_error(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_owned(),
        got: got.to_owned(),
    })
}

#[cold]
pub fn unsupported_condition(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedCondition {
        type_name: type_name.to_owned(),
    })
}

// Access

#[cold]
pub fn property_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PropertyNotFound {
        key: key.to_owned(),
    })
}

#[cold]
pub fn invalid_property_access(key: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidPropertyAccess {
        key: key.to_owned(),
        type_name: type_name.to_owned(),
    })
}

/// `index` is zero-based; the message shows it one-based.
#[cold]
pub fn index_out_of_bounds(index: usize, size: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, size })
}

#[cold]
pub fn invalid_index(index: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidIndex {
        index: index.to_owned(),
    })
}

#[cold]
pub fn dimension_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DimensionMismatch { expected, got })
}

// Arithmetic

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

// Front end

#[cold]
pub fn syntax_error(message: &str, position: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Syntax {
        message: message.to_owned(),
        position,
    })
}
