//! Per-consumption execution state of a lazy pipeline.

use std::cell::Cell;
use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;

/// The iterator a pipeline stage hands to the next one.
pub(crate) type Cursor<T> = Box<dyn Iterator<Item = T>>;

#[inline]
pub(crate) fn boxed<I>(iterator: I) -> Cursor<I::Item>
where
    I: Iterator + 'static,
{
    Box::new(iterator)
}

// =============================================================================
// PullState
// =============================================================================

/// Lifecycle of one consumption.
///
/// ```text
/// Unstarted -> Pulling -> Exhausted
///                      -> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullState {
    /// No element has been requested yet.
    Unstarted,
    /// At least one element has been requested and more may follow.
    Pulling,
    /// The source, or a stage that filters it, ran dry.
    Exhausted,
    /// A `take` limit ended the consumption without asking the source again.
    Cancelled,
}

impl PullState {
    /// Returns `true` for the two terminal states.
    #[inline]
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Exhausted | Self::Cancelled)
    }
}

// =============================================================================
// PullContext
// =============================================================================

/// State shared by every stage of one consumption.
///
/// A fresh context is created for each terminal operation, so two
/// consumptions of the same sequence never observe each other.
#[derive(Clone, Default)]
pub(crate) struct PullContext {
    cancelled: Rc<Cell<bool>>,
    source_pulls: Rc<Cell<usize>>,
}

impl PullContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub(crate) fn source_pulls(&self) -> usize {
        self.source_pulls.get()
    }

    /// Wraps a source iterator so every element it produces is counted.
    pub(crate) fn track<I>(&self, source: I) -> Cursor<I::Item>
    where
        I: Iterator + 'static,
    {
        boxed(Tracked {
            source,
            pulls: Rc::clone(&self.source_pulls),
        })
    }
}

struct Tracked<I> {
    source: I,
    pulls: Rc<Cell<usize>>,
}

impl<I: Iterator> Iterator for Tracked<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.source.next()?;
        self.pulls.set(self.pulls.get() + 1);
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// The `take` stage.
///
/// Once `remaining` reaches zero it flags the consumption as cancelled and
/// never calls `upstream` again.
pub(crate) struct Limit<I> {
    upstream: I,
    remaining: usize,
    context: PullContext,
}

impl<I> Limit<I> {
    pub(crate) const fn new(upstream: I, count: usize, context: PullContext) -> Self {
        Self {
            upstream,
            remaining: count,
            context,
        }
    }
}

impl<I: Iterator> Iterator for Limit<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            self.context.cancel();
            return None;
        }
        self.remaining -= 1;
        self.upstream.next()
    }
}

// =============================================================================
// Pull
// =============================================================================

/// An explicit cursor over one consumption of a
/// [`LazySequence`](super::LazySequence).
///
/// `Pull` is an [`Iterator`]; it additionally reports its [`PullState`] and
/// how many elements it has produced. After reaching a terminal state it
/// keeps returning `None`.
///
/// # Examples
///
/// ```rust
/// use graham::lazy::{LazySequence, PullState};
///
/// let mut pull = LazySequence::infinite(1).take(2).pull().unwrap();
/// assert_eq!(pull.state(), PullState::Unstarted);
///
/// assert_eq!(pull.next(), Some(1));
/// assert_eq!(pull.state(), PullState::Pulling);
/// assert_eq!(pull.next(), Some(2));
/// assert_eq!(pull.next(), None);
/// assert_eq!(pull.state(), PullState::Cancelled);
/// assert_eq!(pull.pulled(), 2);
/// ```
pub struct Pull<T> {
    cursor: Cursor<T>,
    context: PullContext,
    state: PullState,
    pulled: usize,
    stages: usize,
}

impl<T> Pull<T> {
    pub(crate) fn new(cursor: Cursor<T>, context: PullContext, stages: usize) -> Self {
        tracing::debug!(stages, "lazy consumption started");
        Self {
            cursor,
            context,
            state: PullState::Unstarted,
            pulled: 0,
            stages,
        }
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> PullState {
        self.state
    }

    /// Returns the number of elements produced so far.
    #[inline]
    #[must_use]
    pub const fn pulled(&self) -> usize {
        self.pulled
    }

    /// Returns how many elements the source has produced so far.
    ///
    /// Stages such as `filter` may request more source elements than the
    /// pipeline emits; a `take` limit stops requesting them.
    #[must_use]
    pub fn source_pulls(&self) -> usize {
        self.context.source_pulls()
    }

    fn finish(&mut self) {
        self.state = if self.context.is_cancelled() {
            PullState::Cancelled
        } else {
            PullState::Exhausted
        };
        tracing::debug!(
            state = ?self.state,
            stages = self.stages,
            pulled = self.pulled,
            source_pulls = self.context.source_pulls(),
            "lazy consumption finished"
        );
    }
}

impl<T> Iterator for Pull<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_finished() {
            return None;
        }
        self.state = PullState::Pulling;
        match self.cursor.next() {
            Some(element) => {
                self.pulled += 1;
                Some(element)
            }
            None => {
                self.finish();
                None
            }
        }
    }
}

impl<T> FusedIterator for Pull<T> {}

impl<T> fmt::Debug for Pull<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Pull")
            .field("state", &self.state)
            .field("pulled", &self.pulled)
            .field("source_pulls", &self.context.source_pulls())
            .finish_non_exhaustive()
    }
}
