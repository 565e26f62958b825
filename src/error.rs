//! Error types
//!
//! Every fallible operation in the crate returns one [`Error`]. Errors are
//! surfaced at the point of occurrence; nothing is retried or recovered.

use std::fmt;
use std::num::ParseIntError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Tokenizing, decoding and seeking failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No closing `>` for a tag starting at `position`
    UnterminatedTag { position: usize },
    /// No closing `]]>` for a CDATA section starting at `position`
    UnterminatedCdata { position: usize },
    /// No `;` after the `&` at `position` (relative to the decoded span)
    UnterminatedEntity { position: usize },
    /// Named reference not present in the entity table
    UnknownEntity(String),
    /// Decimal or hexadecimal reference text failed to parse
    InvalidNumericEntity {
        digits: String,
        source: ParseIntError,
    },
    /// Numeric reference parsed but is not a Unicode scalar value
    InvalidCodePoint(u32),
    /// Malformed attribute section
    Attr(AttrError),
    /// Seek target before the start of the buffer
    NegativeSeek { target: i64 },
    /// Seek target beyond the end of the buffer
    SeekPastEnd { target: i64, len: usize },
    /// Buffer ended before a skipped subtree was closed
    UnexpectedEof { depth: usize },
}

/// Attribute section failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrError {
    /// Key before `=` is empty or whitespace only
    EmptyKey,
    /// No quote found after `=`
    MissingOpeningQuote,
    /// Value quote never closed
    MissingClosingQuote,
    /// Non-whitespace left over after the last attribute
    TrailingContent(String),
}

impl Error {
    /// True for the seek-position kinds
    pub fn is_invalid_seek(&self) -> bool {
        matches!(self, Error::NegativeSeek { .. } | Error::SeekPastEnd { .. })
    }

    /// Byte offset the error refers to, when it carries one
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::UnterminatedTag { position }
            | Error::UnterminatedCdata { position }
            | Error::UnterminatedEntity { position } => Some(*position),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnterminatedTag { position } => write!(
                f,
                "unterminated tag: end-marker '>' not found for tag at offset {position}"
            ),
            Error::UnterminatedCdata { position } => write!(
                f,
                "unterminated CDATA: end-marker ']]>' not found for section at offset {position}"
            ),
            Error::UnterminatedEntity { position } => write!(
                f,
                "entity reference missing terminating ';' at offset {position}"
            ),
            Error::UnknownEntity(name) => write!(f, "unknown named entity: {name}"),
            Error::InvalidNumericEntity { digits, source } => {
                write!(f, "failed to decode numeric entity {digits:?}: {source}")
            }
            Error::InvalidCodePoint(cp) => {
                write!(f, "numeric entity is not a valid code point: U+{cp:04X}")
            }
            Error::Attr(e) => write!(f, "malformed attributes: {e}"),
            Error::NegativeSeek { target } => {
                write!(f, "invalid seek position: negative position {target}")
            }
            Error::SeekPastEnd { target, len } => write!(
                f,
                "invalid seek position: {target} is past end of buffer (len {len})"
            ),
            Error::UnexpectedEof { depth } => {
                write!(f, "unexpected end of input while skipping (depth {depth})")
            }
        }
    }
}

impl fmt::Display for AttrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrError::EmptyKey => f.write_str("attribute key is empty"),
            AttrError::MissingOpeningQuote => f.write_str("attribute value missing opening quote"),
            AttrError::MissingClosingQuote => f.write_str("attribute value missing closing quote"),
            AttrError::TrailingContent(rest) => {
                write!(f, "expected whitespace after attributes but got {rest:?}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidNumericEntity { source, .. } => Some(source),
            Error::Attr(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for AttrError {}

impl From<AttrError> for Error {
    fn from(err: AttrError) -> Self {
        Error::Attr(err)
    }
}
