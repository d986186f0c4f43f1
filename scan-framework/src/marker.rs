use crate::engine::Engine;
use crate::error::{ScanError, ScanResult};
use crate::source::Source;

/// A backtracking save-point: the engine's epoch, match boundary, and active
/// continuation at the moment the marker was taken.
///
/// A marker is good up until the next flush (emit, discard, or terminal);
/// any flush bumps the epoch and invalidates every outstanding marker. Check
/// [`Engine::marker_valid`] before applying a marker you may have outlived.
#[derive(Debug, Clone)]
pub struct Marker<C> {
    epoch: u64,
    match_len: usize,
    next_fn: Option<C>,
}

impl<C> Marker<C> {
    /// The epoch recorded at creation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The match boundary recorded at creation.
    pub fn match_len(&self) -> usize {
        self.match_len
    }
}

impl<S: Source, T, C: Clone> Engine<S, T, C> {
    /// Takes a marker for the current state. O(1).
    pub fn mark(&self) -> Marker<C> {
        Marker {
            epoch: self.epoch(),
            match_len: self.matched_len(),
            next_fn: self.next_fn(),
        }
    }

    /// True while the marker can still be applied: no flush has happened
    /// since it was taken and the terminal is not out.
    pub fn marker_valid(&self, marker: &Marker<C>) -> bool {
        !self.terminal_emitted() && marker.epoch == self.epoch()
    }

    /// Rewinds the match boundary to the marker's position and returns the
    /// continuation captured with it; the caller decides whether to resume
    /// control there (typically by returning it from a transition function).
    ///
    /// Rewinding only un-matches elements. Fetched peek data is never
    /// dropped, so a marker can be applied repeatedly while it stays valid.
    pub fn apply(&mut self, marker: &Marker<C>) -> ScanResult<Option<C>> {
        if self.terminal_emitted() {
            return Err(ScanError::PostTerminal);
        }
        if !self.marker_valid(marker) {
            return Err(ScanError::InvalidMarker);
        }
        self.set_match_len(marker.match_len);
        Ok(marker.next_fn.clone())
    }
}
