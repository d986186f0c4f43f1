//! Pipeline Core
//!
//! Two-stage composition: text in, parsed values out.
//!
//! A lexing-stage [`Nexter`] is itself a `Source` of tokens, so the parsing
//! stage reads it directly; tokens flow on demand, one consumer pull at a
//! time, and neither stage buffers more than its own window. Error tokens
//! cross the stage boundary verbatim, so parsing-stage functions can react
//! to them instead of the stream ending.
//!
//! ```
//! use pipeline_core::{pipeline, Emitted, LexFn, Lexer, NextFn, ParseFn, Parser, TokenType};
//!
//! const T_WORD: TokenType = TokenType::user(0);
//!
//! #[derive(Debug, PartialEq)]
//! struct Count(usize);
//! impl Emitted for Count {}
//!
//! fn lex_word(l: &mut Lexer) -> Option<LexFn> {
//!     while l.can_peek(1).ok()? && !l.peek(1).ok()?.is_whitespace() {
//!         l.next().ok()?;
//!     }
//!     l.emit_token(T_WORD).ok()?;
//!     while l.can_peek(1).ok()? && l.peek(1).ok()?.is_whitespace() {
//!         l.next().ok()?;
//!     }
//!     l.clear().ok()?;
//!     Some(NextFn::new(lex_word))
//! }
//!
//! fn count_words(p: &mut Parser<Count>) -> Option<ParseFn<Count>> {
//!     let mut n = 0;
//!     while p.can_peek(1).ok()? {
//!         p.next().ok()?;
//!         n += 1;
//!     }
//!     p.emit(Count(n)).ok()?;
//!     None
//! }
//!
//! let counts: Vec<_> = pipeline("one two three", NextFn::new(lex_word), NextFn::new(count_words))
//!     .collect();
//! assert_eq!(counts, vec![Ok(Count(3))]);
//! ```

use std::io;

// The common vocabulary, re-exported so downstream crates need only this
// one dependency.
pub use lexer_framework::{
    lex_chars, lex_reader, lex_source, lex_str, CharStream, LexFn, LexMarker, Lexer, ReaderSource,
    StrSource, Token, TokenType,
};
pub use parser_framework::{parse, ParseFn, ParseMarker, Parser, TokenStream};
pub use scan_framework::{Diagnostic, Emitted, NextFn, Nexter, ScanError, ScanResult, Source};

/// Runs both stages over a string: `input` is lexed by `lex_start` and the
/// resulting tokens are parsed by `parse_start`.
pub fn pipeline<A: Emitted>(
    input: impl Into<String>,
    lex_start: LexFn,
    parse_start: ParseFn<A>,
) -> Nexter<Parser<A>> {
    let tokens = lex_str(input, lex_start);
    parse(Box::new(tokens), parse_start)
}

/// Runs both stages over a byte reader. Invalid UTF-8 in the input is
/// skipped before it reaches the lexing stage.
pub fn pipeline_reader<R, A>(
    reader: R,
    lex_start: LexFn,
    parse_start: ParseFn<A>,
) -> Nexter<Parser<A>>
where
    R: io::Read + 'static,
    A: Emitted,
{
    let tokens = lex_reader(reader, lex_start);
    parse(Box::new(tokens), parse_start)
}

/// Runs both stages over any char source.
pub fn pipeline_source<A: Emitted>(
    source: CharStream,
    lex_start: LexFn,
    parse_start: ParseFn<A>,
) -> Nexter<Parser<A>> {
    let tokens = lex_source(source, lex_start);
    parse(Box::new(tokens), parse_start)
}
