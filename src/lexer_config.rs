/// Options controlling the scan driver and the scanner.
///
/// # Example
///
/// ```
/// use pdf_tokenizer::lexer_config::LexerOptions;
///
/// // Accept PDF and FDF, no token limit (default)
/// let options = LexerOptions::default();
///
/// // PDF only
/// let strict = LexerOptions::strict();
///
/// // Abort any scan that grows past one million tokens
/// let bounded = LexerOptions::default().with_max_tokens(1_000_000);
/// assert_eq!(bounded.max_tokens, 1_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Maximum number of top-level tokens one scan may produce (0 = unlimited)
    ///
    /// A scan over an untrusted file is otherwise bounded only by the size
    /// of the range. Exceeding the limit aborts with
    /// [`Error::TokenLimitExceeded`](crate::error::Error::TokenLimitExceeded).
    pub max_tokens: usize,

    /// Look up the `startxref` offset when a document is loaded
    pub locate_startxref: bool,

    /// Accept `%FDF-` headers as well as `%PDF-`
    pub allow_fdf: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            max_tokens: 0,
            locate_startxref: true,
            allow_fdf: true,
        }
    }
}

impl LexerOptions {
    /// PDF only: reject `%FDF-` headers.
    pub fn strict() -> Self {
        Self {
            allow_fdf: false,
            ..Self::default()
        }
    }

    /// Set the token limit (0 = unlimited).
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Skip the `startxref` lookup.
    pub fn without_startxref(mut self) -> Self {
        self.locate_startxref = false;
        self
    }

    /// True if `count` tokens exceed the configured limit.
    pub(crate) fn exceeds_token_limit(&self, count: usize) -> bool {
        self.max_tokens != 0 && count > self.max_tokens
    }
}
