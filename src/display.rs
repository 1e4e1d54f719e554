//! Display projection for viewers.
//!
//! A highlighting layer needs only two things per token: the text to show
//! and a semantic class to color it by. [`Token::segments`] splits a token
//! into such pieces; literal strings split further into their parentheses,
//! plain runs and escapes. The segments of a token tile its raw bytes, so a
//! viewer that prints every segment reproduces the file exactly.

use std::fmt;

use serde::Serialize;

use crate::token::{SubTokenKind, Token, TokenKind};

/// Semantic class tag of a displayed piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    /// Whitespace runs, including a stream keyword's line terminator
    Whitespace,
    /// Keywords (`obj`, `R`, `true`, ...)
    Keyword,
    /// Numbers
    Number,
    /// Names
    Name,
    /// String delimiters and hex strings
    String,
    /// Plain content of a literal string
    Substring,
    /// Escape sequences inside a literal string
    Stringescape,
    /// `<<`, `>>`, `[`, `]`
    Operator,
    /// Comments
    Comment,
    /// Stream bodies
    Stream,
}

impl TokenClass {
    /// Tag text.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Whitespace => "whitespace",
            TokenClass::Keyword => "keyword",
            TokenClass::Number => "number",
            TokenClass::Name => "name",
            TokenClass::String => "string",
            TokenClass::Substring => "substring",
            TokenClass::Stringescape => "stringescape",
            TokenClass::Operator => "operator",
            TokenClass::Comment => "comment",
            TokenClass::Stream => "stream",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A displayed piece of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Class to render the piece with
    pub class: TokenClass,
    /// Absolute byte offset of the piece
    pub start: usize,
    /// Source bytes of the piece
    pub text: &'a [u8],
}

impl Segment<'_> {
    /// Text for display, with invalid UTF-8 replaced.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(self.text).into_owned()
    }
}

impl<'a> Token<'a> {
    /// Class of the token as a whole.
    pub fn class(&self) -> TokenClass {
        match self.kind {
            TokenKind::Whitespace(_) => TokenClass::Whitespace,
            TokenKind::Keyword(_) => TokenClass::Keyword,
            TokenKind::Number { .. } => TokenClass::Number,
            TokenKind::Name(_) => TokenClass::Name,
            TokenKind::String(_) | TokenKind::HexString { .. } => TokenClass::String,
            TokenKind::Comment(_) => TokenClass::Comment,
            TokenKind::Delimiter(_) => TokenClass::Operator,
            TokenKind::Stream(_) => TokenClass::Stream,
        }
    }

    /// Display pieces of this token, in source order, tiling [`Token::raw`].
    ///
    /// Literal strings yield the parentheses as `string`, plain runs and
    /// nested parentheses as `substring`, and every backslash sequence
    /// (including line continuations and unrecognized escapes) as
    /// `stringescape`. Every other token is a single segment.
    pub fn segments(&self) -> Vec<Segment<'a>> {
        let subs = match &self.kind {
            TokenKind::String(subs) => subs,
            _ => {
                return vec![Segment {
                    class: self.class(),
                    start: self.start,
                    text: self.raw,
                }];
            },
        };

        let raw = self.raw;
        let base = self.start;
        let piece = |segments: &mut Vec<Segment<'a>>, class, start: usize, end: usize| {
            if end > start {
                segments.push(Segment {
                    class,
                    start,
                    text: &raw[start - base..end - base],
                });
            }
        };

        let mut segments = Vec::with_capacity(subs.len() * 2 + 2);
        let mut at = self.start;

        piece(&mut segments, TokenClass::String, at, at + 1);
        at += 1;
        for sub in subs {
            // bytes skipped by the sub-lexer: continuations and unrecognized escapes
            piece(&mut segments, TokenClass::Stringescape, at, sub.start);
            let class = match sub.kind {
                SubTokenKind::Literal(_) | SubTokenKind::Nested(_) => TokenClass::Substring,
                SubTokenKind::Escape { .. } | SubTokenKind::Octal { .. } => TokenClass::Stringescape,
            };
            piece(&mut segments, class, sub.start, sub.end);
            at = sub.end;
        }
        piece(&mut segments, TokenClass::Stringescape, at, self.end - 1);
        piece(&mut segments, TokenClass::String, self.end - 1, self.end);
        segments
    }
}

/// Serializable summary of a token, for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    /// Variant name
    pub kind: &'static str,
    /// Semantic class
    pub class: TokenClass,
    /// Absolute byte offset of the first byte
    pub start: usize,
    /// Absolute byte offset one past the last byte
    pub end: usize,
    /// Source text, invalid UTF-8 replaced
    pub text: String,
    /// Decoded content for names and strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<String>,
    /// Hex string padded with a `0` nibble
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub zero_append: bool,
}

impl From<&Token<'_>> for TokenRecord {
    fn from(token: &Token<'_>) -> Self {
        let decoded = match token.kind {
            TokenKind::Name(_) | TokenKind::String(_) | TokenKind::HexString { .. } => {
                Some(String::from_utf8_lossy(&token.content()).into_owned())
            },
            _ => None,
        };
        let zero_append = matches!(
            token.kind,
            TokenKind::HexString {
                zero_append: true,
                ..
            }
        );
        TokenRecord {
            kind: token.kind.name(),
            class: token.class(),
            start: token.start,
            end: token.end,
            text: String::from_utf8_lossy(token.raw).into_owned(),
            decoded,
            zero_append,
        }
    }
}
