//! Scan Framework
//!
//! A generic engine for hand-written, single-pass scanners: it turns a
//! pull-based stream of input elements into a pull-based stream of output
//! items, with infinite lookahead and explicit mark/reset backtracking.
//!
//! The same engine is instantiated twice by the companion crates: once over
//! chars producing tokens (`lexer-framework`) and once over tokens producing
//! AST values (`parser-framework`). The two stages compose into a pipeline
//! because the output iterator of one engine is itself an element [`Source`]
//! for the next.
//!
//! Core pieces:
//!
//! - [`Source`] — supplies elements one at a time, with an end-of-source
//!   signal.
//! - [`Engine`] — the peek/match window, the epoch counter that invalidates
//!   markers, and the sink of emitted items.
//! - [`Marker`] — a backtracking save-point over the window and continuation.
//! - [`NextFn`] — the continuation type returned by transition functions.
//! - [`Nexter`] — the pull-driven trampoline that runs transition functions
//!   only when a consumer asks for the next item.

pub mod engine;
pub mod error;
pub mod marker;
pub mod nexter;
pub mod source;
pub mod state;

pub use engine::{Engine, SinkEntry};
pub use error::{Diagnostic, ScanError, ScanResult, SourceError};
pub use marker::Marker;
pub use nexter::{Emitted, Machine, Nexter};
pub use source::{IterSource, Source};
pub use state::NextFn;
