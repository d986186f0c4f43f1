//! Parser Framework
//!
//! Stage-2 instancing of the generic scan engine: tokens in, user-chosen
//! values out.
//!
//! You write [`ParseFn`] transition functions that peek/match [`Token`]s
//! against a [`Parser`] and emit values of your own type `A`; the driver runs
//! them lazily as a consumer pulls results from the returned [`Nexter`]. The
//! token stream is usually a lexing-stage `Nexter`, which is itself a
//! `Source` of tokens, so the two stages compose directly.
//!
//! ```
//! use lexer_framework::{lex_str, LexFn, Lexer, NextFn, TokenType};
//! use parser_framework::{parse, Emitted, ParseFn, Parser};
//!
//! const T_CHAR: TokenType = TokenType::user(0);
//!
//! #[derive(Debug, PartialEq)]
//! struct Word(String);
//! impl Emitted for Word {}
//!
//! fn lex_char(l: &mut Lexer) -> Option<LexFn> {
//!     l.next().ok()?;
//!     l.emit_token(T_CHAR).ok()?;
//!     Some(NextFn::new(lex_char))
//! }
//!
//! fn join(p: &mut Parser<Word>) -> Option<ParseFn<Word>> {
//!     let mut word = String::new();
//!     while p.can_peek(1).ok()? {
//!         word.push_str(p.next().ok()?.text());
//!     }
//!     p.emit(Word(word)).ok()?;
//!     None
//! }
//!
//! let tokens = lex_str("hi", NextFn::new(lex_char));
//! let words: Vec<_> = parse(Box::new(tokens), NextFn::new(join)).collect();
//! assert_eq!(words, vec![Ok(Word("hi".to_string()))]);
//! ```

pub mod parser;

pub use parser::{parse, ParseFn, ParseMarker, Parser, TokenStream};

pub use lexer_framework::{Token, TokenType};
pub use scan_framework::{Diagnostic, Emitted, NextFn, Nexter, ScanError, ScanResult};
