use std::fmt;
use std::rc::Rc;

/// The continuation returned by a transition function: the next transition
/// function to run against the machine `M`, or `None` to request shutdown.
///
/// Transition functions scan elements and emit items, then suspend by
/// returning. The driver invokes the stored continuation again only when the
/// consumer pulls and at least one element is peekable, so a function can
/// rely on `can_peek(1) == true` on entry.
///
/// `NextFn` is a cheaply cloneable handle (reference-counted), which lets
/// markers capture the active continuation for later resumption. Plain `fn`
/// items and capturing closures both work:
///
/// ```
/// use scan_framework::NextFn;
///
/// struct Machine;
///
/// fn step(_m: &mut Machine) -> Option<NextFn<Machine>> {
///     None
/// }
///
/// let start: NextFn<Machine> = NextFn::new(step);
/// # let _ = start;
/// ```
pub struct NextFn<M>(Rc<dyn Fn(&mut M) -> Option<NextFn<M>>>);

impl<M> NextFn<M> {
    /// Wraps a transition function.
    pub fn new(f: impl Fn(&mut M) -> Option<NextFn<M>> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Runs the transition function once, returning the next continuation.
    pub fn run(&self, machine: &mut M) -> Option<NextFn<M>> {
        (self.0)(machine)
    }
}

impl<M> Clone for NextFn<M> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<M> fmt::Debug for NextFn<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NextFn(..)")
    }
}

impl<M, F> From<F> for NextFn<M>
where
    F: Fn(&mut M) -> Option<NextFn<M>> + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}
