//! Token model.
//!
//! A [`Token`] is a typed view of one byte span of the source buffer. The
//! tokens of one scan tile the scanned range exactly, so every byte of the
//! input belongs to exactly one token. Tokens borrow from the source buffer
//! and are never mutated after the scanner produces them.
//!
//! Each token can re-serialize itself as PDF syntax with [`Token::write_pdf`].
//! For most variants this reproduces the original bytes; the exceptions are
//! listed on [`Token::write_pdf`].

use std::fmt;

use crate::chars::is_regular;
use crate::number::Number;

/// Structural delimiter tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// Dictionary start `<<`
    DictOpen,
    /// Dictionary end `>>`
    DictClose,
    /// Array start `[`
    ArrayOpen,
    /// Array end `]`
    ArrayClose,
}

impl Delimiter {
    /// Source text of the delimiter.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Delimiter::DictOpen => b"<<",
            Delimiter::DictClose => b">>",
            Delimiter::ArrayOpen => b"[",
            Delimiter::ArrayClose => b"]",
        }
    }
}

/// Piece of a literal string between its parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubToken<'a> {
    /// Absolute byte offset of the first byte
    pub start: usize,
    /// Absolute byte offset one past the last byte
    pub end: usize,
    /// What the piece is
    pub kind: SubTokenKind<'a>,
}

/// Kinds of literal string pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubTokenKind<'a> {
    /// Run of plain bytes, taken verbatim
    Literal(&'a [u8]),
    /// Balanced `(` or `)` inside the string, kept as content
    Nested(u8),
    /// `\n`, `\r`, `\t`, `\b`, `\f`, `\(`, `\)` or `\\`
    Escape {
        /// The byte after the backslash
        code: u8,
        /// Decoded byte
        value: u8,
    },
    /// `\d`, `\dd` or `\ddd` escape, digits weighted as base 8
    Octal {
        /// Decoded byte (value modulo 256)
        value: u8,
        /// Number of digits consumed, 1 to 3
        digits: u8,
    },
}

impl<'a> SubToken<'a> {
    /// Decoded content this piece contributes to the string.
    pub fn content(&self) -> &[u8] {
        match &self.kind {
            SubTokenKind::Literal(bytes) => bytes,
            SubTokenKind::Nested(paren) => std::slice::from_ref(paren),
            SubTokenKind::Escape { value, .. } | SubTokenKind::Octal { value, .. } => {
                std::slice::from_ref(value)
            },
        }
    }

    /// Append the PDF source form of this piece to `out`.
    pub fn write_pdf(&self, out: &mut Vec<u8>) {
        match &self.kind {
            SubTokenKind::Literal(bytes) => out.extend_from_slice(bytes),
            SubTokenKind::Nested(paren) => out.push(*paren),
            SubTokenKind::Escape { code, .. } => {
                out.push(b'\\');
                out.push(*code);
            },
            SubTokenKind::Octal { value, digits } => write_octal(*value, *digits, out),
        }
    }
}

/// Token variants and their variant-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    /// Maximal run of whitespace
    Whitespace(&'a [u8]),
    /// Bare run that is not a number (`obj`, `endobj`, `R`, `true`, ...)
    Keyword(&'a [u8]),
    /// Bare run that is a number
    Number {
        /// Source text
        text: &'a [u8],
        /// Parsed value
        value: Number,
    },
    /// `/Name`, with `#xx` escapes decoded
    Name(Vec<u8>),
    /// Literal string `( ... )` as its ordered pieces
    String(Vec<SubToken<'a>>),
    /// Hexadecimal string `< ... >`
    HexString {
        /// Decoded bytes
        bytes: Vec<u8>,
        /// True iff the source had an odd digit count and a `0` nibble was appended
        zero_append: bool,
    },
    /// `%` through the line terminator, inclusive
    Comment(&'a [u8]),
    /// `<<`, `>>`, `[` or `]`
    Delimiter(Delimiter),
    /// Opaque stream body between the `stream` line terminator and `\nendstream`
    Stream(&'a [u8]),
}

impl TokenKind<'_> {
    /// Variant name, used in debug listings.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace(_) => "Whitespace",
            TokenKind::Keyword(_) => "Keyword",
            TokenKind::Number { .. } => "Number",
            TokenKind::Name(_) => "Name",
            TokenKind::String(_) => "String",
            TokenKind::HexString { .. } => "HexString",
            TokenKind::Comment(_) => "Comment",
            TokenKind::Delimiter(_) => "Delimiter",
            TokenKind::Stream(_) => "Stream",
        }
    }
}

/// A lexical token covering `source[start..end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    /// Absolute byte offset of the first byte
    pub start: usize,
    /// Absolute byte offset one past the last byte
    pub end: usize,
    /// `source[start..end]`
    pub raw: &'a [u8],
    /// Variant and decoded data
    pub kind: TokenKind<'a>,
}

impl<'a> Token<'a> {
    pub(crate) fn new(source: &'a [u8], start: usize, end: usize, kind: TokenKind<'a>) -> Self {
        Token {
            start,
            end,
            raw: &source[start..end],
            kind,
        }
    }

    /// Number of source bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-width token. The scanner never produces one.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Keyword text, if this is a keyword.
    pub fn as_keyword(&self) -> Option<&'a [u8]> {
        match self.kind {
            TokenKind::Keyword(text) => Some(text),
            _ => None,
        }
    }

    /// Pieces of a literal string.
    pub fn sub_tokens(&self) -> &[SubToken<'a>] {
        match &self.kind {
            TokenKind::String(subs) => subs,
            _ => &[],
        }
    }

    /// Decoded content: the string value for literal and hex strings, the
    /// unescaped name for names, and the source text for everything else.
    pub fn content(&self) -> Vec<u8> {
        match &self.kind {
            TokenKind::String(subs) => subs.iter().flat_map(|s| s.content().iter().copied()).collect(),
            TokenKind::HexString { bytes, .. } => bytes.clone(),
            TokenKind::Name(name) => name.clone(),
            TokenKind::Delimiter(d) => d.as_bytes().to_vec(),
            TokenKind::Whitespace(text)
            | TokenKind::Keyword(text)
            | TokenKind::Number { text, .. }
            | TokenKind::Comment(text)
            | TokenKind::Stream(text) => text.to_vec(),
        }
    }

    /// Append the canonical PDF form of this token to `out`.
    ///
    /// The output equals [`Token::raw`] except for these normalizations:
    /// - hex strings are written with uppercase digits, dropping the
    ///   synthesized nibble when `zero_append` is set;
    /// - names escape exactly the bytes that need it, as uppercase `#XX`;
    /// - in literal strings, line continuations and unrecognized escapes
    ///   are dropped, and octal escapes are written as the octal spelling
    ///   of their wrapped value (`\777` as `\377`, `\8` as `\10`);
    /// - a short octal escape is widened to three digits when the piece
    ///   after it starts with a digit.
    pub fn write_pdf(&self, out: &mut Vec<u8>) {
        match &self.kind {
            TokenKind::Whitespace(text)
            | TokenKind::Keyword(text)
            | TokenKind::Number { text, .. }
            | TokenKind::Comment(text)
            | TokenKind::Stream(text) => out.extend_from_slice(text),
            TokenKind::Delimiter(d) => out.extend_from_slice(d.as_bytes()),
            TokenKind::Name(name) => write_name(name, out),
            TokenKind::String(subs) => {
                out.push(b'(');
                for (k, sub) in subs.iter().enumerate() {
                    match sub.kind {
                        // a short octal escape would absorb a following digit
                        SubTokenKind::Octal { value, digits }
                            if digits < 3 && starts_with_digit(subs.get(k + 1)) =>
                        {
                            write_octal(value, 3, out)
                        },
                        _ => sub.write_pdf(out),
                    }
                }
                out.push(b')');
            },
            TokenKind::HexString { bytes, zero_append } => {
                write_hex_string(bytes, *zero_append, out)
            },
        }
    }

    /// Canonical PDF form of this token as a new buffer.
    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        self.write_pdf(&mut out);
        out
    }
}

impl fmt::Display for Token<'_> {
    /// `Kind(start,end,"content")`, with non-printable bytes escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{},\"{}\")",
            self.kind.name(),
            self.start,
            self.end,
            self.content().escape_ascii()
        )
    }
}

fn write_octal(value: u8, digits: u8, out: &mut Vec<u8>) {
    let width = usize::from(digits);
    out.extend_from_slice(format!("\\{:0width$o}", value, width = width).as_bytes());
}

fn starts_with_digit(sub: Option<&SubToken<'_>>) -> bool {
    matches!(
        sub,
        Some(SubToken {
            kind: SubTokenKind::Literal([b'0'..=b'9', ..]),
            ..
        })
    )
}

fn write_name(name: &[u8], out: &mut Vec<u8>) {
    out.push(b'/');
    for &b in name {
        if is_regular(b) && b != b'#' && (0x21..=0x7E).contains(&b) {
            out.push(b);
        } else {
            out.extend_from_slice(format!("#{:02X}", b).as_bytes());
        }
    }
}

fn write_hex_string(bytes: &[u8], zero_append: bool, out: &mut Vec<u8>) {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    out.push(b'<');
    for &b in bytes {
        out.push(DIGITS[usize::from(b >> 4)]);
        out.push(DIGITS[usize::from(b & 0x0F)]);
    }
    if zero_append && !bytes.is_empty() {
        out.pop();
    }
    out.push(b'>');
}
