use std::io;

use scan_framework::{
    Engine, IterSource, Machine, Marker, NextFn, Nexter, ScanError, ScanResult, SinkEntry, Source,
};

use crate::source::{ReaderSource, StrSource};
use crate::token::{Token, TokenType};

/// A type-erased supplier of input chars for the lexing stage.
pub type CharStream = Box<dyn Source<Elem = char>>;

/// Transition function for the lexing stage: scans chars, emits tokens, and
/// returns the next function to run (`None` requests shutdown).
///
/// When a `LexFn` is called the driver guarantees `can_peek(1) == true`, so
/// there is always at least one char to review.
pub type LexFn = NextFn<Lexer>;

/// A backtracking save-point over the lexer's window and continuation.
pub type LexMarker = Marker<LexFn>;

/// Starts a lexer over a string. The returned [`Nexter`] yields the emitted
/// tokens; the stream always ends with exactly one end-of-stream, even if
/// `start` never emits one.
pub fn lex_str(input: impl Into<String>, start: LexFn) -> Nexter<Lexer> {
    lex_source(Box::new(StrSource::new(input)), start)
}

/// Starts a lexer over an iterator of chars.
pub fn lex_chars<I>(chars: I, start: LexFn) -> Nexter<Lexer>
where
    I: Iterator<Item = char> + 'static,
{
    lex_source(Box::new(IterSource::new(chars)), start)
}

/// Starts a lexer over a byte reader. Invalid UTF-8 in the input is skipped
/// and will not be seen by transition functions.
pub fn lex_reader<R>(reader: R, start: LexFn) -> Nexter<Lexer>
where
    R: io::Read + 'static,
{
    lex_source(Box::new(ReaderSource::new(reader)), start)
}

/// Starts a lexer over any char source. This is the primary entry point;
/// the other `lex_*` functions wrap their input and delegate here.
pub fn lex_source(source: CharStream, start: LexFn) -> Nexter<Lexer> {
    Nexter::new(Lexer::new(source, start))
}

/// Stage-1 facade over the generic engine: chars in, [`Token`]s out.
///
/// Passed to your [`LexFn`] functions, which peek and match chars and emit
/// tokens. Line/column bookkeeping lives here, not in the engine, and is
/// updated only when a matched region is flushed — rewinding a marker can
/// never corrupt positions.
pub struct Lexer {
    engine: Engine<CharStream, Token, LexFn>,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Creates a lexer over `source`, starting with `start`. Prefer the
    /// `lex_*` entry points, which also wrap the lexer in a [`Nexter`].
    pub fn new(source: CharStream, start: LexFn) -> Self {
        Self {
            engine: Engine::new(source, start),
            line: 0,
            column: 0,
        }
    }

    /// Confirms at least `n` chars are peekable. `n` is 1-based.
    pub fn can_peek(&mut self, n: usize) -> ScanResult<bool> {
        self.engine.can_peek(n)
    }

    /// Looks ahead at the n-th unconsumed char without matching it. `n` is
    /// 1-based; see [`Lexer::can_peek`] to confirm availability first.
    pub fn peek(&mut self, n: usize) -> ScanResult<char> {
        self.engine.peek(n).copied()
    }

    /// Matches and returns the next char.
    pub fn next(&mut self) -> ScanResult<char> {
        self.engine.consume()
    }

    /// The currently matched text, as [`Lexer::emit_token`] would capture it.
    pub fn matched_text(&self) -> ScanResult<String> {
        if self.engine.terminal_emitted() {
            return Err(ScanError::PostTerminal);
        }
        Ok(self.engine.matched().collect())
    }

    /// Emits a token of the given type carrying the matched text, then
    /// flushes the matched region. Invalidates all outstanding markers.
    /// Emitting [`TokenType::EOF`] is rerouted to [`Lexer::emit_eof`].
    pub fn emit_token(&mut self, token_type: TokenType) -> ScanResult<()> {
        self.emit(token_type, true)
    }

    /// Emits a token of the given type with empty text, discarding the
    /// matched chars. Invalidates all outstanding markers.
    pub fn emit_type(&mut self, token_type: TokenType) -> ScanResult<()> {
        self.emit(token_type, false)
    }

    /// Emits an error token whose text is `line:column: message`, discarding
    /// the matched chars. The stream continues afterwards; the consumer sees
    /// a recoverable error result, not an end of stream.
    pub fn emit_error(&mut self, message: &str) -> ScanResult<()> {
        self.take_matched()?;
        let text = format!("{}:{}: {}", self.line, self.column, message);
        let (line, column) = (self.line, self.column);
        self.engine
            .emit(Token::new(TokenType::ERROR, text, line, column))
    }

    /// Emits the end-of-stream terminal, discarding the entire window. You
    /// will rarely call this directly: the driver emits it automatically
    /// when the continuation chain or the input ends.
    pub fn emit_eof(&mut self) -> ScanResult<()> {
        self.engine.emit_terminal()
    }

    /// Discards the matched chars without emitting anything. Invalidates
    /// all outstanding markers.
    pub fn clear(&mut self) -> ScanResult<()> {
        self.take_matched()?;
        self.engine.discard()
    }

    /// Takes a marker for the current state. Good up until the next emit or
    /// clear; check [`Lexer::marker_valid`] if in doubt.
    pub fn mark(&self) -> LexMarker {
        self.engine.mark()
    }

    /// True while `marker` can still be applied.
    pub fn marker_valid(&self, marker: &LexMarker) -> bool {
        self.engine.marker_valid(marker)
    }

    /// Rewinds the match boundary to the marker position, returning the
    /// [`LexFn`] that was active when the marker was taken. Use
    /// `return l.apply(&marker)?` in a transition function to forward
    /// control there.
    pub fn apply(&mut self, marker: &LexMarker) -> ScanResult<Option<LexFn>> {
        self.engine.apply(marker)
    }

    /// Collects the matched text and walks it to advance line/column,
    /// returning `(text, line, column)` of the first matched char. The
    /// counters normalize from the untracked 0 to 1-based on first use.
    fn take_matched(&mut self) -> ScanResult<(String, usize, usize)> {
        if self.engine.terminal_emitted() {
            return Err(ScanError::PostTerminal);
        }
        let matched: String = self.engine.matched().collect();
        let mut line = self.line;
        let mut column = self.column;
        let mut first = true;
        for ch in matched.chars() {
            if self.line == 0 {
                self.line = 1;
            }
            if self.column == 0 {
                self.column = 1;
            }
            if first {
                line = self.line;
                column = self.column;
                first = false;
            }
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        Ok((matched, line, column))
    }

    fn emit(&mut self, token_type: TokenType, keep_text: bool) -> ScanResult<()> {
        if token_type == TokenType::EOF {
            return self.emit_eof();
        }
        let (matched, line, column) = self.take_matched()?;
        let text = if keep_text { matched } else { String::new() };
        self.engine.emit(Token::new(token_type, text, line, column))
    }
}

impl Machine for Lexer {
    type Item = Token;

    fn poll_ready(&mut self) -> bool {
        self.engine.ready()
    }

    fn step(&mut self) {
        // Clone, don't take: a marker taken while the function runs must
        // capture the running function as its continuation.
        if let Some(f) = self.engine.next_fn() {
            let next = f.run(self);
            self.engine.set_next_fn(next);
        }
    }

    fn finish(&mut self) {
        self.engine.force_terminal();
    }

    fn take_entry(&mut self) -> Option<SinkEntry<Token>> {
        self.engine.take_entry()
    }
}
