//! Scan driver.
//!
//! [`CosDocument`] owns the bytes of one PDF or FDF file, validates its
//! header, locates the trailer's `startxref` value when there is one, and
//! runs the lexer over whatever byte range the caller asks for.
//!
//! ```text
//! %PDF-1.4            <- header, validated on load
//! ...
//! xref                <- xref_section() starts here (the startxref value)
//! ...
//! trailer
//! << /Size 6 /Root 1 0 R >>
//! startxref           <- ... and ends here
//! 1234
//! %%EOF
//! ```

use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::error::{Error, Result};
use crate::lexer::{PartialScan, find_substring, scan_partial};
use crate::lexer_config::LexerOptions;
use crate::token::Token;

const STARTXREF: &[u8] = b"startxref";
const EOF_MARKER: &[u8] = b"%%EOF";

/// Signature the file starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `%PDF-`: Portable Document Format
    Pdf,
    /// `%FDF-`: Forms Data Format, usually without a `startxref` trailer
    Fdf,
}

impl FileKind {
    fn signature(&self) -> &'static [u8] {
        match self {
            FileKind::Pdf => b"%PDF-",
            FileKind::Fdf => b"%FDF-",
        }
    }
}

/// Location of the `startxref` trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartXref {
    /// Byte offset of the `startxref` keyword itself
    pub keyword_offset: usize,
    /// Offset value written after the keyword
    pub xref_offset: u64,
}

/// Parse the `%PDF-M.m` or `%FDF-M.m` header.
///
/// Returns the file kind and the `(major, minor)` version.
///
/// # Examples
///
/// ```rust
/// # use pdf_tokenizer::document::{parse_header, FileKind};
/// let (kind, major, minor) = parse_header(b"%PDF-1.7\n").unwrap();
/// assert_eq!((kind, major, minor), (FileKind::Pdf, 1, 7));
/// ```
pub fn parse_header(data: &[u8]) -> Result<(FileKind, u8, u8)> {
    if data.len() < 8 {
        return Err(Error::MalformedHeader(
            "File too short to contain a header".to_string(),
        ));
    }

    let kind = [FileKind::Pdf, FileKind::Fdf]
        .into_iter()
        .find(|kind| data.starts_with(kind.signature()))
        .ok_or_else(|| {
            Error::MalformedHeader(format!(
                "Expected '%PDF-' or '%FDF-', found '{}'",
                String::from_utf8_lossy(&data[0..5])
            ))
        })?;

    // Format: M.m, one digit each
    if data[6] != b'.' {
        return Err(Error::MalformedHeader(format!(
            "Invalid version format: expected '.', found '{}'",
            data[6] as char
        )));
    }

    let major = data[5];
    let minor = data[7];
    if !major.is_ascii_digit() || !minor.is_ascii_digit() {
        return Err(Error::MalformedHeader(format!(
            "Invalid version: {}.{} (not digits)",
            major as char, minor as char
        )));
    }

    Ok((kind, major - b'0', minor - b'0'))
}

/// Find the last `startxref` keyword and the offset written after it.
///
/// The offset is the text between the keyword and the following `%%EOF`
/// (or the end of the data), with surrounding whitespace ignored.
///
/// # Errors
///
/// Returns `Error::InvalidXref` if the keyword is missing or is not followed
/// by a decimal offset.
pub fn find_startxref(data: &[u8]) -> Result<StartXref> {
    let keyword_offset = rfind_substring(data, STARTXREF).ok_or(Error::InvalidXref)?;

    let after_keyword = &data[keyword_offset + STARTXREF.len()..];
    let value = match find_substring(after_keyword, EOF_MARKER) {
        Some(eof) => &after_keyword[..eof],
        None => after_keyword,
    };
    let value = value.trim_ascii();

    if value.is_empty() || !value.iter().all(u8::is_ascii_digit) {
        return Err(Error::InvalidXref);
    }
    let xref_offset = std::str::from_utf8(value)
        .map_err(|_| Error::InvalidXref)?
        .parse::<u64>()
        .map_err(|_| Error::InvalidXref)?;

    Ok(StartXref {
        keyword_offset,
        xref_offset,
    })
}

/// A PDF or FDF file held in memory for lexical inspection.
#[derive(Debug, Clone)]
pub struct CosDocument {
    data: Vec<u8>,
    kind: FileKind,
    version: (u8, u8),
    startxref: Option<StartXref>,
    options: LexerOptions,
}

impl CosDocument {
    /// Read and validate a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, LexerOptions::default())
    }

    /// Read and validate a file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: LexerOptions) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening {}", path.display());
        let data = fs::read(path)?;
        Self::from_bytes_with_options(data, options)
    }

    /// Validate an in-memory file.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(data, LexerOptions::default())
    }

    /// Validate an in-memory file with custom options.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedHeader` for an unrecognized signature, or an
    /// FDF signature when `options.allow_fdf` is false. A missing or
    /// unreadable `startxref` is never an error.
    pub fn from_bytes_with_options(data: Vec<u8>, options: LexerOptions) -> Result<Self> {
        let (kind, major, minor) = parse_header(&data)?;
        if kind == FileKind::Fdf && !options.allow_fdf {
            return Err(Error::MalformedHeader("FDF files are not accepted".to_string()));
        }
        log::debug!("Header: {:?} {}.{}, {} bytes", kind, major, minor, data.len());

        let startxref = if options.locate_startxref {
            match find_startxref(&data) {
                Ok(found) => {
                    log::debug!(
                        "startxref {} at byte {}",
                        found.xref_offset,
                        found.keyword_offset
                    );
                    Some(found)
                },
                // FDF files normally have no trailer
                Err(e) if kind == FileKind::Fdf => {
                    log::debug!("No startxref in FDF file: {}", e);
                    None
                },
                Err(e) => {
                    log::warn!("Could not locate startxref: {}", e);
                    None
                },
            }
        } else {
            None
        };

        Ok(Self {
            data,
            kind,
            version: (major, minor),
            startxref,
            options,
        })
    }

    /// The file contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length of the file in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: a valid header is at least eight bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// PDF or FDF.
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// `(major, minor)` from the header.
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// The `startxref` trailer, if it was found.
    pub fn startxref(&self) -> Option<StartXref> {
        self.startxref
    }

    /// Options this document was loaded with.
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Scan `start..end` of the file.
    pub fn scan(&self, start: usize, end: usize) -> Result<Vec<Token<'_>>> {
        self.scan_partial(start, end).into_result()
    }

    /// Scan `start..end`, keeping the tokens produced before any error.
    pub fn scan_partial(&self, start: usize, end: usize) -> PartialScan<'_> {
        scan_partial(&self.data, start, end, &self.options)
    }

    /// Scan the whole file.
    pub fn scan_all(&self) -> Result<Vec<Token<'_>>> {
        self.scan(0, self.data.len())
    }

    /// Byte range from the `startxref` offset up to the `startxref` keyword:
    /// the cross-reference table and trailer dictionary of the last update.
    ///
    /// `None` if there is no `startxref`, or its offset does not point before
    /// the keyword.
    pub fn xref_section(&self) -> Option<Range<usize>> {
        let found = self.startxref?;
        let start = usize::try_from(found.xref_offset).ok()?;
        if start < found.keyword_offset {
            Some(start..found.keyword_offset)
        } else {
            None
        }
    }

    /// Scan [`xref_section`](Self::xref_section).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidXref` if there is no such section.
    pub fn scan_xref_section(&self) -> Result<Vec<Token<'_>>> {
        let range = self.xref_section().ok_or(Error::InvalidXref)?;
        self.scan(range.start, range.end)
    }
}

/// Find the last occurrence of a substring in a byte slice.
fn rfind_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }

    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    const SMALL_PDF: &[u8] = b"%PDF-1.4\n\
1 0 obj\n\
<< /Type /Catalog >>\n\
endobj\n\
xref\n\
0 2\n\
0000000000 65535 f \n\
0000000009 00000 n \n\
trailer\n\
<< /Size 2 /Root 1 0 R >>\n\
startxref\n\
45\n\
%%EOF\n";

    // ========================================================================
    // Header Parsing Tests
    // ========================================================================

    #[test]
    fn test_parse_valid_header_1_7() {
        let (kind, major, minor) = parse_header(b"%PDF-1.7\n").unwrap();
        assert_eq!((kind, major, minor), (FileKind::Pdf, 1, 7));
    }

    #[test]
    fn test_parse_valid_header_2_0() {
        let (_, major, minor) = parse_header(b"%PDF-2.0").unwrap();
        assert_eq!((major, minor), (2, 0));
    }

    #[test]
    fn test_parse_fdf_header() {
        let (kind, major, minor) = parse_header(b"%FDF-1.2\n").unwrap();
        assert_eq!((kind, major, minor), (FileKind::Fdf, 1, 2));
    }

    #[test]
    fn test_parse_invalid_header_wrong_magic() {
        let result = parse_header(b"NotAPDF\n");
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_parse_invalid_header_no_dot() {
        assert!(matches!(parse_header(b"%PDF-17\n"), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_parse_invalid_header_too_short() {
        assert!(matches!(parse_header(b"%PDF"), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_parse_invalid_header_non_digit_version() {
        assert!(matches!(parse_header(b"%PDF-X.Y"), Err(Error::MalformedHeader(_))));
    }

    // ========================================================================
    // startxref Tests
    // ========================================================================

    #[test]
    fn test_find_startxref() {
        let found = find_startxref(SMALL_PDF).unwrap();
        assert_eq!(found.xref_offset, 45);
        assert_eq!(&SMALL_PDF[found.keyword_offset..found.keyword_offset + 9], b"startxref");
    }

    #[test]
    fn test_find_startxref_uses_last_occurrence() {
        let data = b"%PDF-1.4\nstartxref\n10\n%%EOF\nstartxref\n20\n%%EOF\n";
        assert_eq!(find_startxref(data).unwrap().xref_offset, 20);
    }

    #[test]
    fn test_find_startxref_with_whitespace_and_cr() {
        let data = b"%PDF-1.4\nstartxref\r\n\r\n12345\r%%EOF\r";
        assert_eq!(find_startxref(data).unwrap().xref_offset, 12345);
    }

    #[test]
    fn test_find_startxref_without_eof_marker() {
        let data = b"%PDF-1.4\nstartxref\n77\n";
        assert_eq!(find_startxref(data).unwrap().xref_offset, 77);
    }

    #[test]
    fn test_find_startxref_missing() {
        let data = b"%PDF-1.4\ntrailer\n<< /Size 1 >>\n";
        assert!(matches!(find_startxref(data), Err(Error::InvalidXref)));
    }

    #[test]
    fn test_find_startxref_garbage_offset() {
        let data = b"%PDF-1.4\nstartxref\nabc\n%%EOF";
        assert!(matches!(find_startxref(data), Err(Error::InvalidXref)));
    }

    // ========================================================================
    // CosDocument Tests
    // ========================================================================

    #[test]
    fn test_document_from_bytes() {
        let doc = CosDocument::from_bytes(SMALL_PDF.to_vec()).unwrap();
        assert_eq!(doc.kind(), FileKind::Pdf);
        assert_eq!(doc.version(), (1, 4));
        assert_eq!(doc.startxref().map(|s| s.xref_offset), Some(45));
        assert_eq!(doc.len(), SMALL_PDF.len());
    }

    #[test]
    fn test_document_rejects_bad_header() {
        let result = CosDocument::from_bytes(b"GIF89a......".to_vec());
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_missing_startxref_is_tolerated() {
        let doc = CosDocument::from_bytes(b"%PDF-1.4\n1 0 obj\nnull\nendobj\n".to_vec()).unwrap();
        assert!(doc.startxref().is_none());
        assert!(doc.xref_section().is_none());
        assert!(matches!(doc.scan_xref_section(), Err(Error::InvalidXref)));
    }

    #[test]
    fn test_fdf_without_trailer() {
        let data = b"%FDF-1.2\n1 0 obj\n<< /FDF << /F (x.pdf) >> >>\nendobj\n".to_vec();
        let doc = CosDocument::from_bytes(data).unwrap();
        assert_eq!(doc.kind(), FileKind::Fdf);
        assert!(doc.startxref().is_none());
        assert!(doc.scan_all().is_ok());
    }

    #[test]
    fn test_strict_options_reject_fdf() {
        let data = b"%FDF-1.2\n".to_vec();
        let result = CosDocument::from_bytes_with_options(data, LexerOptions::strict());
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_startxref_lookup_can_be_disabled() {
        let options = LexerOptions::default().without_startxref();
        let doc = CosDocument::from_bytes_with_options(SMALL_PDF.to_vec(), options).unwrap();
        assert!(doc.startxref().is_none());
    }

    #[test]
    fn test_scan_all_tiles_file() {
        let doc = CosDocument::from_bytes(SMALL_PDF.to_vec()).unwrap();
        let tokens = doc.scan_all().unwrap();
        assert_eq!(tokens.first().map(|t| t.start), Some(0));
        assert_eq!(tokens.last().map(|t| t.end), Some(SMALL_PDF.len()));
        assert!(tokens.windows(2).all(|w| w[0].end == w[1].start));
        assert!(matches!(tokens[0].kind, TokenKind::Comment(b"%PDF-1.4\n")));
    }

    #[test]
    fn test_xref_section() {
        let doc = CosDocument::from_bytes(SMALL_PDF.to_vec()).unwrap();
        let range = doc.xref_section().unwrap();
        assert_eq!(&SMALL_PDF[range.start..range.start + 4], b"xref");

        let tokens = doc.scan_xref_section().unwrap();
        assert_eq!(tokens[0].as_keyword(), Some(&b"xref"[..]));
        assert!(tokens.iter().any(|t| t.as_keyword() == Some(&b"trailer"[..])));
        assert_eq!(tokens.last().map(|t| t.end), Some(range.end));
    }

    #[test]
    fn test_xref_offset_past_keyword() {
        let data = b"%PDF-1.4\nstartxref\n9999\n%%EOF\n".to_vec();
        let doc = CosDocument::from_bytes(data).unwrap();
        assert!(doc.startxref().is_some());
        assert!(doc.xref_section().is_none());
    }

    #[test]
    fn test_rfind_substring() {
        assert_eq!(rfind_substring(b"startxref 1 startxref 2", STARTXREF), Some(12));
        assert_eq!(rfind_substring(b"xref", STARTXREF), None);
        assert_eq!(rfind_substring(b"abc", b""), Some(3));
        assert_eq!(find_substring(b"1\n%%EOF\n%%EOF", EOF_MARKER), Some(2));
    }

    #[test]
    fn test_open_missing_file() {
        let result = CosDocument::open("/nonexistent/definitely/missing.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
