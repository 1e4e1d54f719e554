//! Error types for the tokenizer.
//!
//! Every lexical error is fatal: the meaning of later bytes depends on
//! where earlier token boundaries fell, so a scan cannot resume after one.

use std::fmt;

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Construct that was left open when the scan range ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Literal string `( ... )`
    String,
    /// Hexadecimal string `< ... >`
    HexString,
    /// Comment `% ... EOL`
    Comment,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::String => "literal string",
            LiteralKind::HexString => "hex string",
            LiteralKind::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Error types that can occur while reading or scanning a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Buffer does not start with `%PDF-M.m` or `%FDF-M.m`
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// A string, hex string or comment has no closing delimiter before the end of the range
    #[error("Unterminated {kind} starting at byte {offset}")]
    UnterminatedLiteral {
        /// Byte offset of the opening delimiter
        offset: usize,
        /// What was left open
        kind: LiteralKind,
    },

    /// A delimiter byte with no lexical rule (stray `>`, `)`, `{`, `}`)
    #[error("Unexpected delimiter '{}' at byte {offset}", byte_char(.byte))]
    UnexpectedDelimiter {
        /// Byte offset of the delimiter
        offset: usize,
        /// The delimiter byte
        byte: u8,
    },

    /// Non-hex byte inside `< ... >`
    #[error("Invalid hex digit {byte:#04x} at byte {offset}")]
    InvalidHexDigit {
        /// Byte offset of the offending byte
        offset: usize,
        /// The offending byte
        byte: u8,
    },

    /// `stream` keyword not followed by LF or CRLF
    #[error("Malformed stream prologue at byte {offset}: expected LF or CRLF after 'stream'")]
    MalformedStreamPrologue {
        /// Byte offset just past the `stream` keyword
        offset: usize,
    },

    /// No `\nendstream` before the end of the range
    #[error("Missing endstream marker for stream body starting at byte {offset}")]
    MissingEndstreamMarker {
        /// Byte offset of the first body byte
        offset: usize,
    },

    /// A lexical rule consumed zero bytes. Always a defect in the scanner.
    #[error("Scanner cursor stalled at byte {offset}")]
    CursorStall {
        /// Cursor position that failed to advance
        offset: usize,
    },

    /// Scan range is not within the buffer
    #[error("Invalid scan range {start}..{end} for buffer of {len} bytes")]
    InvalidRange {
        /// Requested start offset
        start: usize,
        /// Requested end offset
        end: usize,
        /// Buffer length
        len: usize,
    },

    /// Scan produced more tokens than `LexerOptions::max_tokens` allows
    #[error("Token limit of {limit} exceeded at byte {offset}")]
    TokenLimitExceeded {
        /// Configured limit
        limit: usize,
        /// Cursor position when the limit was hit
        offset: usize,
    },

    /// `startxref` keyword or its offset could not be located
    #[error("Invalid startxref trailer")]
    InvalidXref,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn byte_char(byte: &u8) -> char {
    char::from(*byte)
}

impl Error {
    /// Byte offset the error refers to, for errors raised while scanning.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::UnterminatedLiteral { offset, .. }
            | Error::UnexpectedDelimiter { offset, .. }
            | Error::InvalidHexDigit { offset, .. }
            | Error::MalformedStreamPrologue { offset }
            | Error::MissingEndstreamMarker { offset }
            | Error::CursorStall { offset }
            | Error::TokenLimitExceeded { offset, .. } => Some(*offset),
            Error::MalformedHeader(_) | Error::InvalidRange { .. } | Error::InvalidXref | Error::Io(_) => None,
        }
    }
}
