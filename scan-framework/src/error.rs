use thiserror::Error;

/// Result type alias for fallible engine operations.
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Fatal engine errors.
///
/// Every variant indicates a transition-function bug (an operation performed
/// without first checking its own precondition), not a data problem. Callers
/// get a typed error rather than a panic and can decide whether to abort or
/// unwind the current scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// `peek`/`can_peek` called with an index below 1 (indices are 1-based).
    #[error("peek index is 1-based, got {0}")]
    Range(usize),

    /// A peek or consume reached beyond what the source can supply.
    /// Check `can_peek` first.
    #[error("element {0} not available")]
    Unavailable(usize),

    /// A window, flush, or marker operation was attempted after the terminal
    /// was emitted. The terminal is sticky: once emitted, the engine is done.
    #[error("operation not allowed after the terminal was emitted")]
    PostTerminal,

    /// A marker was applied after a flush invalidated it.
    #[error("marker is stale: the engine flushed since it was taken")]
    InvalidMarker,
}

/// A non-terminal failure reported by an element [`Source`](crate::Source).
///
/// The engine never surfaces these: per the degradation policy they are
/// logged and treated as exhaustion of the source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// I/O failure in a reader-backed source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other source-specific failure.
    #[error("{0}")]
    Other(String),
}

/// A recoverable diagnostic carried by an embedded error item.
///
/// Transition functions emit error items through the ordinary sink; the
/// output iterator surfaces them as `Err(Diagnostic)` without ending the
/// stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Diagnostic {
    message: String,
}

impl Diagnostic {
    /// Creates a diagnostic from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for Diagnostic {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
