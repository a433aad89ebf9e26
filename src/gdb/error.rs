//! GDB/MI parse errors

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure while parsing GDB/MI text.
///
/// Offsets are byte offsets into the line handed to the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected {found:?} at offset {offset}: expected {expected}")]
    UnexpectedChar {
        offset: usize,
        found: char,
        expected: &'static str,
    },

    #[error("input ends at offset {offset} inside {context}")]
    Truncated { offset: usize, context: &'static str },

    #[error("nesting exceeds {limit} levels at offset {offset}")]
    TooDeep { offset: usize, limit: usize },

    #[error("missing class keyword after record prefix at offset {offset}")]
    MissingClass { offset: usize },

    #[error("token {digits:?} does not fit in 64 bits")]
    BadToken { digits: String },

    #[error("unknown record prefix {found:?} at offset {offset}")]
    UnknownRecord { offset: usize, found: char },
}

impl ParseError {
    pub fn unexpected(offset: usize, found: char, expected: &'static str) -> Self {
        Self::UnexpectedChar {
            offset,
            found,
            expected,
        }
    }

    pub fn truncated(offset: usize, context: &'static str) -> Self {
        Self::Truncated { offset, context }
    }

    /// Byte offset the error was detected at.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedChar { offset, .. }
            | Self::Truncated { offset, .. }
            | Self::TooDeep { offset, .. }
            | Self::MissingClass { offset }
            | Self::UnknownRecord { offset, .. } => *offset,
            Self::BadToken { .. } => 0,
        }
    }

    /// True when the input simply stopped early, as opposed to being malformed.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
