use lexer_framework::{Token, TokenType};
use scan_framework::{
    Emitted, Engine, Machine, Marker, NextFn, Nexter, ScanResult, SinkEntry, Source,
};

/// A type-erased supplier of input tokens for the parsing stage. A lexing
/// stage `Nexter` boxes directly into this.
pub type TokenStream = Box<dyn Source<Elem = Token>>;

/// Transition function for the parsing stage: scans tokens, emits values of
/// type `A`, and returns the next function to run (`None` requests shutdown).
///
/// When a `ParseFn` is called the driver guarantees `can_peek(1) == true`,
/// so there is always at least one token to review.
pub type ParseFn<A> = NextFn<Parser<A>>;

/// A backtracking save-point over the parser's window and continuation.
pub type ParseMarker<A> = Marker<ParseFn<A>>;

/// Starts a parser over a token stream. The returned [`Nexter`] yields the
/// emitted values; the stream always ends with exactly one end-of-stream,
/// even if `start` never emits one.
pub fn parse<A: Emitted>(tokens: TokenStream, start: ParseFn<A>) -> Nexter<Parser<A>> {
    Nexter::new(Parser::new(tokens, start))
}

/// Stage-2 facade over the generic engine: [`Token`]s in, values of the
/// user-chosen type `A` out.
///
/// Passed to your [`ParseFn`] functions, which peek and match tokens and emit
/// results. `A` is anything implementing [`Emitted`]; end of stream is the
/// engine's terminal sentinel, never a magic value of `A`.
pub struct Parser<A: Emitted> {
    engine: Engine<TokenStream, A, ParseFn<A>>,
}

impl<A: Emitted> Parser<A> {
    /// Creates a parser over `tokens`, starting with `start`. Prefer
    /// [`parse`], which also wraps the parser in a [`Nexter`].
    pub fn new(tokens: TokenStream, start: ParseFn<A>) -> Self {
        Self {
            engine: Engine::new(tokens, start),
        }
    }

    /// Confirms at least `n` tokens are peekable. `n` is 1-based.
    pub fn can_peek(&mut self, n: usize) -> ScanResult<bool> {
        self.engine.can_peek(n)
    }

    /// Looks ahead at the n-th unconsumed token without matching it. `n` is
    /// 1-based; see [`Parser::can_peek`] to confirm availability first.
    pub fn peek(&mut self, n: usize) -> ScanResult<Token> {
        self.engine.peek(n).cloned()
    }

    /// Looks ahead at the n-th unconsumed token's type. Convenience over
    /// [`Parser::peek`].
    pub fn peek_type(&mut self, n: usize) -> ScanResult<TokenType> {
        Ok(self.engine.peek(n)?.token_type())
    }

    /// Matches and returns the next token.
    pub fn next(&mut self) -> ScanResult<Token> {
        self.engine.consume()
    }

    /// Emits a value, discarding all matched tokens. Invalidates all
    /// outstanding markers.
    pub fn emit(&mut self, value: A) -> ScanResult<()> {
        self.engine.emit(value)
    }

    /// Emits the end-of-stream terminal, discarding the entire window. You
    /// will rarely call this directly: the driver emits it automatically
    /// when the continuation chain or the input ends.
    pub fn emit_eof(&mut self) -> ScanResult<()> {
        self.engine.emit_terminal()
    }

    /// Discards the matched tokens without emitting anything. Invalidates
    /// all outstanding markers.
    pub fn clear(&mut self) -> ScanResult<()> {
        self.engine.discard()
    }

    /// Takes a marker for the current state. Good up until the next emit or
    /// clear; check [`Parser::marker_valid`] if in doubt.
    pub fn mark(&self) -> ParseMarker<A> {
        self.engine.mark()
    }

    /// True while `marker` can still be applied.
    pub fn marker_valid(&self, marker: &ParseMarker<A>) -> bool {
        self.engine.marker_valid(marker)
    }

    /// Rewinds the match boundary to the marker position, returning the
    /// [`ParseFn`] that was active when the marker was taken. Use
    /// `return p.apply(&marker)?` in a transition function to forward
    /// control there.
    pub fn apply(&mut self, marker: &ParseMarker<A>) -> ScanResult<Option<ParseFn<A>>> {
        self.engine.apply(marker)
    }
}

impl<A: Emitted> Machine for Parser<A> {
    type Item = A;

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

    fn take_entry(&mut self) -> Option<SinkEntry<A>> {
        self.engine.take_entry()
    }
}
