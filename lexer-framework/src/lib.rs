//! Lexer Framework
//!
//! Stage-1 instancing of the generic scan engine: chars in, tokens out.
//!
//! You write [`LexFn`] transition functions that peek/match chars against a
//! [`Lexer`] and emit [`Token`]s; the engine's driver runs them lazily as a
//! consumer pulls tokens from the returned [`Nexter`]. Lookahead is
//! unbounded, and mark/apply gives explicit backtracking.
//!
//! ```
//! use lexer_framework::{lex_str, LexFn, Lexer, NextFn, TokenType};
//!
//! const T_NUMBER: TokenType = TokenType::user(0);
//!
//! fn lex_number(l: &mut Lexer) -> Option<LexFn> {
//!     while l.can_peek(1).ok()? && l.peek(1).ok()?.is_ascii_digit() {
//!         l.next().ok()?;
//!     }
//!     l.emit_token(T_NUMBER).ok()?;
//!     None
//! }
//!
//! let tokens: Vec<_> = lex_str("12", NextFn::new(lex_number)).collect();
//! assert_eq!(tokens.len(), 1);
//! ```

pub mod lexer;
pub mod source;
pub mod token;

pub use lexer::{lex_chars, lex_reader, lex_source, lex_str, CharStream, LexFn, LexMarker, Lexer};
pub use source::{ReaderSource, StrSource};
pub use token::{Token, TokenType};

pub use scan_framework::{Diagnostic, NextFn, Nexter, ScanError, ScanResult};
