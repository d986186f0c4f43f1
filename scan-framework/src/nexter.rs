use crate::engine::SinkEntry;
use crate::error::{Diagnostic, SourceError};
use crate::source::Source;

/// Implemented by emitted item types so the output iterator can recognize
/// embedded error items.
///
/// An error item is ordinary data on the sink: it does not terminate the
/// stream, and between pipeline stages it travels verbatim. Only the
/// consumer-facing iterator translates it into an `Err` result.
pub trait Emitted {
    /// Returns the diagnostic message if this item represents an embedded
    /// error, `None` for regular items.
    fn error_message(&self) -> Option<&str> {
        None
    }
}

/// One engine instance as seen by the driver: a stage facade (lexer, parser)
/// that can run its active transition function and hand over sink entries.
///
/// The driver never inspects stage-specific state; these four probes are the
/// entire contract between a stage and the trampoline.
pub trait Machine {
    /// The item type this machine emits.
    type Item: Emitted;

    /// True when a transition function is ready to run: a continuation is
    /// set and at least one element is peekable. Transition functions may
    /// rely on `can_peek(1) == true` on entry because the driver checks this
    /// before every step.
    fn poll_ready(&mut self) -> bool;

    /// Runs the active transition function once and stores the continuation
    /// it returns.
    fn step(&mut self);

    /// Emits the terminal if it has not been emitted yet.
    fn finish(&mut self);

    /// Pops the oldest sink entry, if any.
    fn take_entry(&mut self) -> Option<SinkEntry<Self::Item>>;
}

/// The pull-driven trampoline and consumer-facing output iterator.
///
/// Each call to [`Iterator::next`] keeps stepping the machine until the sink
/// has an entry, then pops it:
///
/// - an item becomes `Some(Ok(item))`, or `Some(Err(diagnostic))` if the
///   item is an embedded error (the stream continues either way);
/// - the terminal becomes `None`, forever (end is idempotent).
///
/// If the machine's continuation chain ends, or input runs out, without an
/// explicit terminal, the driver forces one — every stream ends with exactly
/// one terminal.
///
/// A `Nexter` is also a [`Source`] of its machine's items, which is how a
/// second engine stage feeds off the first. On that path items flow
/// verbatim, embedded errors included, so downstream transition functions
/// can react to them.
#[derive(Debug)]
pub struct Nexter<M: Machine> {
    machine: M,
    done: bool,
}

impl<M: Machine> Nexter<M> {
    /// Wraps a machine for pulling.
    pub fn new(machine: M) -> Self {
        Self {
            machine,
            done: false,
        }
    }

    /// Drives the machine until the next item or end of stream.
    fn pump(&mut self) -> Option<M::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.machine.take_entry() {
                Some(SinkEntry::Item(item)) => return Some(item),
                Some(SinkEntry::Terminal) => {
                    self.done = true;
                    return None;
                }
                None => {
                    // Sink is empty: run the scanner, or shut it down if the
                    // continuation chain ended or input is exhausted.
                    if self.machine.poll_ready() {
                        self.machine.step();
                    } else {
                        self.machine.finish();
                    }
                }
            }
        }
    }
}

impl<M: Machine> Iterator for Nexter<M> {
    type Item = Result<M::Item, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.pump()?;
        let diagnostic = item.error_message().map(Diagnostic::new);
        Some(match diagnostic {
            Some(d) => Err(d),
            None => Ok(item),
        })
    }
}

impl<M: Machine> Source for Nexter<M> {
    type Elem = M::Item;

    fn pull(&mut self) -> Result<Option<M::Item>, SourceError> {
        Ok(self.pump())
    }
}
