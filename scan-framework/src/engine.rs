use std::collections::VecDeque;

use crate::error::{ScanError, ScanResult};
use crate::source::Source;

/// One entry in the engine's output sink: a produced item, or the single
/// terminal sentinel that permanently ends the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEntry<T> {
    /// An item produced by a transition function.
    Item(T),
    /// End of stream. At most one is ever enqueued, always last.
    Terminal,
}

/// The shared scanner engine: a window of fetched-but-unflushed elements
/// split into a matched prefix and a peeked suffix, a FIFO sink of emitted
/// items, and the state needed to validate backtracking markers.
///
/// `S` supplies input elements, `T` is the emitted item type, and `C` is the
/// stage's continuation type. The engine stores the continuation as opaque
/// cloneable data; running it is the job of the stage facade and the driver
/// (see [`Machine`](crate::Machine)).
///
/// All indices are 1-based, matching the lookahead style of hand-written
/// scanners (`peek(1)` is the next unconsumed element).
#[derive(Debug)]
pub struct Engine<S: Source, T, C: Clone> {
    source: S,
    /// Fetched elements: `window[..match_len]` is the matched region,
    /// the rest is the peek region.
    window: VecDeque<S::Elem>,
    match_len: usize,
    /// Bumped once per flush; markers record it to detect staleness.
    epoch: u64,
    sink: VecDeque<SinkEntry<T>>,
    next_fn: Option<C>,
    /// The source has signaled end. The window may still hold elements.
    exhausted: bool,
    /// Sticky: once true, all mutating operations fail.
    terminal_emitted: bool,
}

impl<S: Source, T, C: Clone> Engine<S, T, C> {
    /// Creates an engine over `source`, starting with the `start`
    /// continuation.
    pub fn new(source: S, start: C) -> Self {
        Self {
            source,
            window: VecDeque::new(),
            match_len: 0,
            epoch: 0,
            sink: VecDeque::new(),
            next_fn: Some(start),
            exhausted: false,
            terminal_emitted: false,
        }
    }

    /// Confirms that at least `n` elements are available in the peek region,
    /// pulling from the source as needed.
    ///
    /// Returns `Ok(false)` once the source is exhausted short of `n`, or if
    /// the terminal has already been emitted. Errors only on `n < 1`.
    pub fn can_peek(&mut self, n: usize) -> ScanResult<bool> {
        if n < 1 {
            return Err(ScanError::Range(n));
        }
        // Nothing can be peeked once the terminal is out
        if self.terminal_emitted {
            return Ok(false);
        }
        Ok(self.grow_peek(n))
    }

    /// Returns the n-th peek-region element without consuming it.
    ///
    /// Stable across calls until the next flush. See [`Engine::can_peek`] to
    /// confirm availability first.
    pub fn peek(&mut self, n: usize) -> ScanResult<&S::Elem> {
        if n < 1 {
            return Err(ScanError::Range(n));
        }
        if self.terminal_emitted {
            return Err(ScanError::PostTerminal);
        }
        if !self.grow_peek(n) {
            return Err(ScanError::Unavailable(n));
        }
        // grow_peek guarantees the index exists
        Ok(&self.window[self.match_len + n - 1])
    }

    /// Moves one element from the peek region into the matched region and
    /// returns a copy of it.
    pub fn consume(&mut self) -> ScanResult<S::Elem>
    where
        S::Elem: Clone,
    {
        if self.terminal_emitted {
            return Err(ScanError::PostTerminal);
        }
        if !self.grow_peek(1) {
            return Err(ScanError::Unavailable(1));
        }
        let elem = self.window[self.match_len].clone();
        self.match_len += 1;
        Ok(elem)
    }

    /// Read-only view over the matched region, front to back.
    pub fn matched(&self) -> impl Iterator<Item = &S::Elem> {
        self.window.iter().take(self.match_len)
    }

    /// Number of elements currently matched.
    pub fn matched_len(&self) -> usize {
        self.match_len
    }

    /// Number of elements currently buffered in the peek region.
    pub fn peek_len(&self) -> usize {
        self.window.len() - self.match_len
    }

    /// Drops the matched region without emitting anything. Invalidates all
    /// outstanding markers.
    pub fn discard(&mut self) -> ScanResult<()> {
        if self.terminal_emitted {
            return Err(ScanError::PostTerminal);
        }
        self.window.drain(..self.match_len);
        self.match_len = 0;
        self.epoch += 1;
        Ok(())
    }

    /// Flushes the matched region and enqueues `item` onto the sink.
    ///
    /// Flushing destroys the matched elements: capture anything you need
    /// from [`Engine::matched`] before calling this.
    pub fn emit(&mut self, item: T) -> ScanResult<()> {
        self.discard()?;
        self.sink.push_back(SinkEntry::Item(item));
        Ok(())
    }

    /// Discards the entire window (matched and peeked elements alike),
    /// enqueues the terminal sentinel, and permanently ends the engine.
    pub fn emit_terminal(&mut self) -> ScanResult<()> {
        if self.terminal_emitted {
            return Err(ScanError::PostTerminal);
        }
        self.force_terminal();
        Ok(())
    }

    /// Emits the terminal if it has not been emitted yet. Used by the driver
    /// to guarantee every stream ends with exactly one terminal.
    pub fn force_terminal(&mut self) {
        if self.terminal_emitted {
            return;
        }
        self.window.clear();
        self.match_len = 0;
        self.epoch += 1;
        self.exhausted = true;
        self.terminal_emitted = true;
        self.sink.push_back(SinkEntry::Terminal);
    }

    /// True once the terminal sentinel has been enqueued.
    pub fn terminal_emitted(&self) -> bool {
        self.terminal_emitted
    }

    /// Pops the oldest sink entry, if any.
    pub fn take_entry(&mut self) -> Option<SinkEntry<T>> {
        self.sink.pop_front()
    }

    /// The stored continuation, cloned. The driver keeps the stored value in
    /// place while a transition function runs, so markers taken inside the
    /// function capture the function itself.
    pub fn next_fn(&self) -> Option<C> {
        self.next_fn.clone()
    }

    /// Replaces the stored continuation with the one a transition function
    /// returned (`None` requests shutdown).
    pub fn set_next_fn(&mut self, next: Option<C>) {
        self.next_fn = next;
    }

    /// True when a transition function is ready to run: a continuation is
    /// set and at least one element is peekable.
    pub fn ready(&mut self) -> bool {
        self.next_fn.is_some() && self.can_peek(1).unwrap_or(false)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn set_match_len(&mut self, len: usize) {
        self.match_len = len;
    }

    /// Grows the peek region to at least `n` elements, pulling one element
    /// at a time. A source error is logged and treated as exhaustion.
    fn grow_peek(&mut self, n: usize) -> bool {
        let mut peek_len = self.window.len() - self.match_len;
        while peek_len < n {
            if self.exhausted {
                return false;
            }
            match self.source.pull() {
                Ok(Some(elem)) => {
                    self.window.push_back(elem);
                    peek_len += 1;
                }
                Ok(None) => {
                    self.exhausted = true;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "source error, treating as end of input");
                    self.exhausted = true;
                }
            }
        }
        true
    }
}
