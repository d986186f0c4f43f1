use crate::error::SourceError;

/// A pull-based supplier of input elements.
///
/// `Ok(Some(elem))` hands the next element over, `Ok(None)` signals
/// exhaustion. An `Err` is a non-terminal degradation: the engine logs it
/// and treats the source as exhausted, so implementations should only fail
/// for conditions they cannot meaningfully skip over.
///
/// Sources are consumed strictly in order; the engine buffers everything it
/// pulls, so a source never needs to support rewinding.
pub trait Source {
    /// The element type supplied by this source.
    type Elem;

    /// Pulls the next element.
    fn pull(&mut self) -> Result<Option<Self::Elem>, SourceError>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    type Elem = S::Elem;

    fn pull(&mut self) -> Result<Option<Self::Elem>, SourceError> {
        (**self).pull()
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    type Elem = S::Elem;

    fn pull(&mut self) -> Result<Option<Self::Elem>, SourceError> {
        (**self).pull()
    }
}

/// Adapts any iterator into a [`Source`].
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator> IterSource<I> {
    /// Wraps the iterator.
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: Iterator> Source for IterSource<I> {
    type Elem = I::Item;

    fn pull(&mut self) -> Result<Option<Self::Elem>, SourceError> {
        Ok(self.iter.next())
    }
}
