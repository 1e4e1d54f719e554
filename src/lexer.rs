//! PDF lexer (tokenizer).
//!
//! Decomposes a byte range of a PDF or FDF file into a flat sequence of
//! [`Token`]s following the COS object syntax (ISO 32000-1:2008, Section 7.2
//! and 7.3). Unlike an object parser, the lexer keeps everything: whitespace,
//! comments and stream bodies are tokens too, so the token spans tile the
//! scanned range exactly and the sequence can be written back out.
//!
//! # Dispatch
//!
//! | Leading byte | Token |
//! |---|---|
//! | whitespace | [`TokenKind::Whitespace`], maximal run |
//! | `(` | [`TokenKind::String`], see [`crate::literal_string`] |
//! | `<<` / `>>` / `[` / `]` | [`TokenKind::Delimiter`] |
//! | `<` | [`TokenKind::HexString`] |
//! | `/` | [`TokenKind::Name`] |
//! | `%` | [`TokenKind::Comment`] |
//! | regular byte | [`TokenKind::Number`] or [`TokenKind::Keyword`] |
//!
//! A `stream` keyword is followed by a one-token line terminator and a
//! [`TokenKind::Stream`] body running up to `\nendstream`. The body is
//! never tokenized.
//!
//! `{` and `}` (PostScript calculator functions) are not supported and,
//! like a stray `)` or `>`, abort the scan.

use crate::chars::{hex_value, is_delimiter, is_regular, is_whitespace};
use crate::error::{Error, LiteralKind, Result};
use crate::lexer_config::LexerOptions;
use crate::literal_string::scan_literal_string;
use crate::number::parse_number;
use crate::token::{Delimiter, Token, TokenKind};

/// Marker that ends a stream body. The leading LF belongs to the next
/// whitespace token, not to the body.
const ENDSTREAM_MARKER: &[u8] = b"\nendstream";

/// Scan `source[start..end]` into tokens.
///
/// # Errors
///
/// Returns the first lexical error; see [`crate::error::Error`].
///
/// # Examples
///
/// ```
/// use pdf_tokenizer::lexer::scan;
/// use pdf_tokenizer::token::TokenKind;
///
/// let source = b"/Type /Page";
/// let tokens = scan(source, 0, source.len()).unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[2].kind, TokenKind::Name(b"Page".to_vec()));
/// ```
pub fn scan(source: &[u8], start: usize, end: usize) -> Result<Vec<Token<'_>>> {
    scan_with_options(source, start, end, &LexerOptions::default())
}

/// Scan `source[start..end]` into tokens under `options`.
pub fn scan_with_options<'a>(
    source: &'a [u8],
    start: usize,
    end: usize,
    options: &LexerOptions,
) -> Result<Vec<Token<'a>>> {
    scan_partial(source, start, end, options).into_result()
}

/// Outcome of a scan that keeps whatever was produced before an error.
#[derive(Debug)]
pub struct PartialScan<'a> {
    /// Tokens produced before the scan stopped
    pub tokens: Vec<Token<'a>>,
    /// The error that stopped the scan, if any
    pub error: Option<Error>,
}

impl<'a> PartialScan<'a> {
    /// The tokens if the scan completed, otherwise the error.
    pub fn into_result(self) -> Result<Vec<Token<'a>>> {
        match self.error {
            None => Ok(self.tokens),
            Some(err) => Err(err),
        }
    }

    /// True if the scan covered the whole range.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Scan `source[start..end]`, returning the tokens produced so far even if
/// the scan fails. The partial tokens are for diagnostics only; they tile
/// `start..` up to the failing construct.
pub fn scan_partial<'a>(
    source: &'a [u8],
    start: usize,
    end: usize,
    options: &LexerOptions,
) -> PartialScan<'a> {
    if start > end || end > source.len() {
        return PartialScan {
            tokens: Vec::new(),
            error: Some(Error::InvalidRange {
                start,
                end,
                len: source.len(),
            }),
        };
    }

    log::debug!("Scanning bytes {}..{}", start, end);

    let mut scanner = Scanner {
        source,
        end,
        options,
        tokens: Vec::new(),
    };
    let error = scanner.run(start).err();

    match &error {
        None => log::debug!("Scanned {} tokens from bytes {}..{}", scanner.tokens.len(), start, end),
        Some(err) => log::debug!("Scan stopped after {} tokens: {}", scanner.tokens.len(), err),
    }

    PartialScan {
        tokens: scanner.tokens,
        error,
    }
}

/// Concatenate the canonical PDF form of each token.
///
/// For a complete scan this reproduces the scanned bytes, up to the
/// normalizations listed on [`Token::write_pdf`].
pub fn serialize_tokens(tokens: &[Token<'_>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(tokens.iter().map(Token::len).sum());
    for token in tokens {
        token.write_pdf(&mut out);
    }
    out
}

struct Scanner<'a, 'o> {
    source: &'a [u8],
    end: usize,
    options: &'o LexerOptions,
    tokens: Vec<Token<'a>>,
}

impl<'a> Scanner<'a, '_> {
    fn run(&mut self, start: usize) -> Result<()> {
        let mut i = start;
        while i < self.end {
            let next = self.step(i)?;
            if next <= i {
                return Err(Error::CursorStall { offset: i });
            }
            if self.options.exceeds_token_limit(self.tokens.len()) {
                return Err(Error::TokenLimitExceeded {
                    limit: self.options.max_tokens,
                    offset: i,
                });
            }
            i = next;
        }
        Ok(())
    }

    /// Lex one construct starting at `i`, returning the offset after it.
    fn step(&mut self, i: usize) -> Result<usize> {
        let c = self.source[i];
        if is_whitespace(c) {
            return Ok(self.whitespace(i));
        }
        match c {
            b'(' => self.literal_string(i),
            b'<' if self.peek(i + 1) == Some(b'<') => Ok(self.delimiter(i, Delimiter::DictOpen)),
            b'<' => self.hex_string(i),
            b'>' if self.peek(i + 1) == Some(b'>') => Ok(self.delimiter(i, Delimiter::DictClose)),
            b'[' => Ok(self.delimiter(i, Delimiter::ArrayOpen)),
            b']' => Ok(self.delimiter(i, Delimiter::ArrayClose)),
            b'/' => Ok(self.name(i)),
            b'%' => self.comment(i),
            c if is_delimiter(c) => Err(Error::UnexpectedDelimiter { offset: i, byte: c }),
            _ => self.bare_run(i),
        }
    }

    fn peek(&self, at: usize) -> Option<u8> {
        if at < self.end {
            Some(self.source[at])
        } else {
            None
        }
    }

    fn push(&mut self, start: usize, end: usize, kind: TokenKind<'a>) {
        let token = Token::new(self.source, start, end, kind);
        log::trace!("{}", token);
        self.tokens.push(token);
    }

    fn whitespace(&mut self, i: usize) -> usize {
        let source = self.source;
        let j = self.run_end(i, is_whitespace);
        self.push(i, j, TokenKind::Whitespace(&source[i..j]));
        j
    }

    fn delimiter(&mut self, i: usize, delimiter: Delimiter) -> usize {
        let j = i + delimiter.as_bytes().len();
        self.push(i, j, TokenKind::Delimiter(delimiter));
        j
    }

    fn literal_string(&mut self, i: usize) -> Result<usize> {
        let (subs, j) = scan_literal_string(self.source, i, self.end)?;
        self.push(i, j, TokenKind::String(subs));
        Ok(j)
    }

    /// `<` hex digits `>`. An odd digit count is padded with a `0` nibble.
    fn hex_string(&mut self, i: usize) -> Result<usize> {
        let close = self
            .find_byte(i + 1, b'>')
            .ok_or(Error::UnterminatedLiteral {
                offset: i,
                kind: LiteralKind::HexString,
            })?;

        let digits = &self.source[i + 1..close];
        let mut bytes = Vec::with_capacity(digits.len().div_ceil(2));
        for (k, pair) in digits.chunks(2).enumerate() {
            let nibble = |n: usize| {
                let c = pair[n];
                hex_value(c).ok_or(Error::InvalidHexDigit {
                    offset: i + 1 + 2 * k + n,
                    byte: c,
                })
            };
            let high = nibble(0)?;
            let low = if pair.len() == 2 { nibble(1)? } else { 0 };
            bytes.push((high << 4) | low);
        }

        let zero_append = digits.len() % 2 == 1;
        self.push(i, close + 1, TokenKind::HexString { bytes, zero_append });
        Ok(close + 1)
    }

    /// `/` followed by regular bytes; `#xx` decodes to one byte. A `#` not
    /// followed by two hex digits is kept as is.
    fn name(&mut self, i: usize) -> usize {
        let mut decoded = Vec::new();
        let mut j = i + 1;
        while j < self.end && is_regular(self.source[j]) {
            let c = self.source[j];
            if c == b'#' && j + 2 < self.end {
                if let (Some(high), Some(low)) =
                    (hex_value(self.source[j + 1]), hex_value(self.source[j + 2]))
                {
                    decoded.push((high << 4) | low);
                    j += 3;
                    continue;
                }
            }
            decoded.push(c);
            j += 1;
        }
        self.push(i, j, TokenKind::Name(decoded));
        j
    }

    /// `%` through the next LF inclusive, or through the next CR when no LF
    /// remains in the range.
    fn comment(&mut self, i: usize) -> Result<usize> {
        let source = self.source;
        let eol = self
            .find_byte(i + 1, b'\n')
            .or_else(|| self.find_byte(i + 1, b'\r'))
            .ok_or(Error::UnterminatedLiteral {
                offset: i,
                kind: LiteralKind::Comment,
            })?;
        self.push(i, eol + 1, TokenKind::Comment(&source[i..=eol]));
        Ok(eol + 1)
    }

    fn bare_run(&mut self, i: usize) -> Result<usize> {
        let source = self.source;
        let j = self.run_end(i, is_regular);
        let text = &source[i..j];
        match parse_number(text) {
            Some(value) => self.push(i, j, TokenKind::Number { text, value }),
            None => self.push(i, j, TokenKind::Keyword(text)),
        }
        if text == b"stream" {
            return self.stream_body(j);
        }
        Ok(j)
    }

    /// Body after a `stream` keyword ending at `after_keyword`.
    ///
    /// The keyword must be followed by LF or CRLF, which becomes its own
    /// whitespace token. The body up to `\nendstream` becomes one stream
    /// token (none if empty); scanning resumes at the marker's LF.
    fn stream_body(&mut self, after_keyword: usize) -> Result<usize> {
        let source = self.source;
        let eol_len = match (self.peek(after_keyword), self.peek(after_keyword + 1)) {
            (Some(b'\n'), _) => 1,
            (Some(b'\r'), Some(b'\n')) => 2,
            _ => {
                return Err(Error::MalformedStreamPrologue {
                    offset: after_keyword,
                })
            },
        };
        let body_start = after_keyword + eol_len;
        self.push(
            after_keyword,
            body_start,
            TokenKind::Whitespace(&source[after_keyword..body_start]),
        );

        // `stream\nendstream`: the marker's LF is the prologue terminator.
        // `endstreamX` is body text, not the keyword.
        let keyword_end = body_start + b"endstream".len();
        if source[body_start..self.end].starts_with(b"endstream")
            && !matches!(self.peek(keyword_end), Some(c) if is_regular(c))
        {
            return Ok(body_start);
        }

        let marker = find_substring(&source[body_start..self.end], ENDSTREAM_MARKER)
            .map(|p| body_start + p)
            .ok_or(Error::MissingEndstreamMarker { offset: body_start })?;
        if marker > body_start {
            self.push(body_start, marker, TokenKind::Stream(&source[body_start..marker]));
        }
        Ok(marker)
    }

    fn run_end(&self, i: usize, class: fn(u8) -> bool) -> usize {
        self.source[i..self.end]
            .iter()
            .position(|&c| !class(c))
            .map_or(self.end, |p| i + p)
    }

    fn find_byte(&self, from: usize, byte: u8) -> Option<usize> {
        if from >= self.end {
            return None;
        }
        self.source[from..self.end]
            .iter()
            .position(|&c| c == byte)
            .map(|p| from + p)
    }
}

/// Find the first occurrence of a substring in a byte slice.
pub(crate) fn find_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
