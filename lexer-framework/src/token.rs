use scan_framework::Emitted;

/// Type code of a token emitted by the lexing stage.
///
/// Codes below [`TokenType::START`] are reserved; define user codes from the
/// watermark up:
///
/// ```
/// use lexer_framework::TokenType;
///
/// const T_WORD: TokenType = TokenType::user(0);
/// const T_NUMBER: TokenType = TokenType::user(1);
/// # let _ = (T_WORD, T_NUMBER);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenType(u32);

impl TokenType {
    /// A lexing error; the token text carries the diagnostic message.
    pub const ERROR: TokenType = TokenType(0);

    /// Unknown or unexpected input.
    pub const UNKNOWN: TokenType = TokenType(1);

    /// End of stream. The engine ends streams with a terminal sentinel
    /// rather than a token, so this code never appears on the wire; it is
    /// reserved so stages sharing the code space agree on its meaning, and
    /// emitting it through the lexer is rerouted to `emit_eof`.
    pub const EOF: TokenType = TokenType(2);

    /// Watermark for user-assignable codes.
    pub const START: TokenType = TokenType(3);

    /// The user code at `offset` above the [`TokenType::START`] watermark.
    pub const fn user(offset: u32) -> TokenType {
        TokenType(TokenType::START.0 + offset)
    }

    /// The raw type code.
    pub const fn code(self) -> u32 {
        self.0
    }
}

/// A token: type code, matched text (possibly empty), and the line/column of
/// its first matched char (both 0 while untracked, 1-based once tracked).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    text: String,
    line: usize,
    column: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(token_type: TokenType, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            token_type,
            text: text.into(),
            line,
            column,
        }
    }

    /// The type code.
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// The matched text. Empty for type-only emits.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line of the first matched char; 0 if positions were never tracked.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the first matched char; 0 if positions were never tracked.
    pub fn column(&self) -> usize {
        self.column
    }

    /// True for lexer-reported error tokens.
    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::ERROR
    }
}

impl Emitted for Token {
    fn error_message(&self) -> Option<&str> {
        if self.is_error() {
            Some(&self.text)
        } else {
            None
        }
    }
}
