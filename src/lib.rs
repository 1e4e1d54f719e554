// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
#![allow(clippy::len_without_is_empty)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Tokenizer
//!
//! Lossless lexical scanner for PDF and FDF files, for low-level document
//! inspection and debugging.
//!
//! The lexer splits any byte range of a file into COS tokens (ISO 32000-1:2008,
//! Section 7.2-7.3). Unlike an object parser it drops nothing: whitespace,
//! comments and raw stream bodies are tokens too, so the tokens tile the
//! range exactly and can be written back out or re-colored by a viewer.
//!
//! ## Features
//!
//! - **Total partition**: every byte belongs to exactly one token
//! - **Decoded content**: literal strings (nested parentheses, escapes,
//!   octal), hex strings (odd-length padding recorded), `#xx` name escapes
//! - **Opaque streams**: bodies between `stream` and `endstream` are kept raw
//! - **Round-trip**: [`lexer::serialize_tokens`] re-emits PDF syntax
//! - **Display projection**: per-token and per-escape class tags for highlighting
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_tokenizer::CosDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = CosDocument::open("file.pdf")?;
//! println!("PDF {}.{}", doc.version().0, doc.version().1);
//!
//! for token in doc.scan_all()? {
//!     println!("{}", token);
//! }
//!
//! // Just the cross-reference table and trailer
//! if doc.xref_section().is_some() {
//!     let trailer = doc.scan_xref_section()?;
//!     println!("{} tokens in the xref section", trailer.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Scanning a bare buffer needs no header:
//!
//! ```
//! use pdf_tokenizer::lexer::scan;
//!
//! let source = b"<< /Title (Hello\\041) >>";
//! let tokens = scan(source, 0, source.len()).unwrap();
//! assert_eq!(tokens[4].content(), b"Hello!");
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Lexical layer
pub mod chars;
pub mod lexer;
/// Lexer configuration options
pub mod lexer_config;
pub mod literal_string;
pub mod number;
pub mod token;

// Scan driver
pub mod document;

// Viewer-facing projection
pub mod display;

// Re-exports
pub use display::{Segment, TokenClass, TokenRecord};
pub use document::{CosDocument, FileKind, StartXref};
pub use error::{Error, Result};
pub use lexer::{PartialScan, scan, scan_partial, serialize_tokens};
pub use lexer_config::LexerOptions;
pub use number::Number;
pub use token::{Delimiter, SubToken, SubTokenKind, Token, TokenKind};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
