//! Error types for scanning, generating and binding dialect documents.
//!
//! Every failure in this crate is reported through the single [`Error`] enum.
//!
//! ## Error Categories
//!
//! - **Configuration Errors**: Conflicting punctuation in a [`DialectConfig`](crate::DialectConfig)
//! - **Syntax Errors**: Malformed input, with line and column of the offending rune
//! - **Writer Errors**: Writing to a sealed generator, or a failing sink
//! - **Binding Errors**: Validator failures and value conversions while unmarshaling
//!
//! Syntax errors carry a structured [`SyntaxKind`] plus an explicit position.
//! They are only rendered to text through `Display`.
//!
//! ## Examples
//!
//! ```rust
//! use csv_dialect::{DialectConfig, Error, Scanner, SyntaxKind};
//!
//! let mut scanner = Scanner::from_str("\"unterminated", DialectConfig::default());
//! match scanner.scan_row() {
//!     Err(Error::Syntax { line, kind, .. }) => {
//!         assert_eq!(line, 1);
//!         assert_eq!(kind, SyntaxKind::UnterminatedQuote);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// A location in the scanned document.
///
/// Lines are counted from 1, columns are rune offsets counted from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

/// The cause of a [`Error::Syntax`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxKind {
    /// End of input reached inside a quoted field.
    UnterminatedQuote,
    /// A field prefix was configured but the field does not start with it.
    PrefixNotFound { expected: char },
    /// A field suffix was configured but the field does not end with it.
    SuffixNotFound { expected: char },
    /// An empty unquoted field while empty fields are disallowed.
    EmptyField,
    /// Something other than the separator follows a field.
    ExpectedSeparator { expected: char, found: char },
    /// A quote character where a separator or line end was expected.
    UnexpectedQuote { found: char },
    /// The document ends with a line break that the dialect does not allow.
    TrailingLineBreak,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxKind::UnterminatedQuote => f.write_str("trailing quote not found"),
            SyntaxKind::PrefixNotFound { expected } => {
                write!(f, "prefix not found, expect {:?}", expected)
            }
            SyntaxKind::SuffixNotFound { expected } => {
                write!(f, "suffix not found, expect {:?}", expected)
            }
            SyntaxKind::EmptyField => f.write_str("unexpected empty field, expect text"),
            SyntaxKind::ExpectedSeparator { expected, found } => {
                write!(f, "unexpected character {:?}, expect {:?}", found, expected)
            }
            SyntaxKind::UnexpectedQuote { found } => {
                write!(f, "unexpected quote {:?}, expect separator or line end", found)
            }
            SyntaxKind::TrailingLineBreak => f.write_str("unexpected line break after last record"),
        }
    }
}

/// Represents all possible errors of this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Conflicting options while building a dialect
    #[error("Invalid dialect: {msg}")]
    Config { msg: String },

    /// Malformed input at a known position
    #[error("Syntax error at line {line}, column {col}: {kind}")]
    Syntax {
        line: usize,
        col: usize,
        kind: SyntaxKind,
    },

    /// Write after the generator has been finished
    #[error("Generator has been finished")]
    Sealed,

    /// Scanner reused after it reported an error
    #[error("Scanner cannot be used after a failed scan")]
    Exhausted,

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The document has no header row but one is required
    #[error("Missing header row")]
    MissingHeader,

    /// A column refers to a validator that was never registered
    #[error("Cannot find validator {0}")]
    UnknownValidator(String),

    /// A registered validator rejected a value
    #[error("Invalid value {value:?} for column {column} at line {line}")]
    Validation {
        line: usize,
        column: String,
        value: String,
    },

    /// A value could not be converted to its destination type
    #[error("Cannot convert {value:?} in column {column} at line {line} to {target}")]
    Conversion {
        line: usize,
        column: String,
        value: String,
        target: String,
    },

    /// A numeric value does not fit its destination type
    #[error("Value {value} in column {column} at line {line} is out of range for {target}")]
    OutOfRange {
        line: usize,
        column: String,
        value: String,
        target: String,
    },

    /// Unsupported type for marshaling or unmarshaling
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(msg: &str) -> Self {
        Error::Config {
            msg: msg.to_string(),
        }
    }

    /// Creates a syntax error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csv_dialect::{Error, Position, SyntaxKind};
    ///
    /// let err = Error::syntax(Position { line: 3, col: 7 }, SyntaxKind::EmptyField);
    /// assert!(err.to_string().contains("line 3"));
    /// assert!(err.to_string().contains("column 7"));
    /// ```
    pub fn syntax(pos: Position, kind: SyntaxKind) -> Self {
        Error::Syntax {
            line: pos.line,
            col: pos.col,
            kind,
        }
    }

    /// Creates an I/O error, prefixed with the component that hit it.
    pub fn io(context: &str, err: &std::io::Error) -> Self {
        Error::Io(format!("{}: {}", context, err))
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csv_dialect::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the position of a syntax error.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Syntax { line, col, .. } => Some(Position {
                line: *line,
                col: *col,
            }),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_display_carries_position() {
        let err = Error::syntax(
            Position { line: 2, col: 4 },
            SyntaxKind::ExpectedSeparator {
                expected: ',',
                found: 'x',
            },
        );
        let text = err.to_string();
        assert!(text.contains("line 2, column 4"));
        assert!(text.contains("'x'"));
        assert_eq!(err.position(), Some(Position { line: 2, col: 4 }));
    }

    #[test]
    fn test_non_syntax_has_no_position() {
        assert_eq!(Error::Sealed.position(), None);
        assert_eq!(Error::config("bad").position(), None);
    }

    #[test]
    fn test_io_context() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::io("Generator failed", &io);
        assert_eq!(err.to_string(), "IO error: Generator failed: pipe closed");
    }
}
