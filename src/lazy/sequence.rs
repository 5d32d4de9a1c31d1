//! The lazy sequence pipeline.

use std::fmt;

use super::pull::{Cursor, Limit, Pull, PullContext, boxed};
use crate::error::SourceExhaustedError;
use crate::persistent::{PersistentVector, ReferenceCounter, Shareable};

/// Builds the first stage iterator of one consumption.
#[cfg(feature = "arc")]
pub(crate) type Factory<T> =
    dyn Fn(&PullContext) -> Result<Cursor<T>, SourceExhaustedError> + Send + Sync;

/// Builds the first stage iterator of one consumption.
#[cfg(not(feature = "arc"))]
pub(crate) type Factory<T> = dyn Fn(&PullContext) -> Result<Cursor<T>, SourceExhaustedError>;

// =============================================================================
// Stage
// =============================================================================

/// Descriptor of one pipeline stage, in the order stages were added.
///
/// Descriptors carry the numeric parameters of their stage. The closures
/// themselves live in the composed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Element-wise transformation.
    Map,
    /// Keeps elements accepted by a predicate.
    Filter,
    /// Stops after the given number of elements.
    Take(usize),
    /// Running accumulation.
    Scan,
    /// Drops the given number of leading elements.
    Skip(usize),
    /// Stops at the first rejected element.
    TakeWhile,
    /// Drops leading elements while a predicate holds.
    SkipWhile,
    /// Expands each element into a sub-sequence.
    FlatMap,
    /// Pairs elements with another sequence.
    ZipWith,
    /// Groups elements into vectors of the given size.
    Chunk(usize),
    /// Observes elements without changing them.
    Inspect,
}

// =============================================================================
// LazySequence
// =============================================================================

/// A deferred, restartable pipeline of stages over a source.
///
/// A `LazySequence` is a description. Adding a stage is O(1) and evaluates
/// nothing; every terminal operation (`pull`, `to_list`, `reduce`, ...)
/// starts a fresh consumption that re-runs the pipeline from the source.
/// Elements travel through the whole stage chain one at a time, so a
/// `take(n)` stops the source after exactly the elements it needed.
///
/// # Examples
///
/// ```rust
/// use graham::lazy::LazySequence;
///
/// let evens = LazySequence::infinite(1).filter(|n| n % 2 == 0).take(5);
///
/// assert_eq!(evens.to_list(), Ok(vec![2, 4, 6, 8, 10]));
/// // Restart: the same description can be consumed again.
/// assert_eq!(evens.reduce(0, |sum, n| sum + n), Ok(30));
/// ```
///
/// Calling `to_list` on an infinite sequence without a `take` never
/// returns.
pub struct LazySequence<T> {
    source: ReferenceCounter<Factory<T>>,
    stages: PersistentVector<Stage>,
}

impl<T> Clone for LazySequence<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            stages: self.stages.clone(),
        }
    }
}

impl<T> fmt::Debug for LazySequence<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LazySequence")
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> LazySequence<T> {
    pub(crate) fn from_source<F>(factory: F) -> Self
    where
        F: Fn(&PullContext) -> Result<Cursor<T>, SourceExhaustedError> + Shareable + 'static,
    {
        let source: ReferenceCounter<Factory<T>> = ReferenceCounter::new(factory);
        Self {
            source,
            stages: PersistentVector::new(),
        }
    }

    fn derive<U, F>(&self, stage: Stage, factory: F) -> LazySequence<U>
    where
        F: Fn(&PullContext) -> Result<Cursor<U>, SourceExhaustedError> + Shareable + 'static,
    {
        let source: ReferenceCounter<Factory<U>> = ReferenceCounter::new(factory);
        LazySequence {
            source,
            stages: self.stages.push(stage),
        }
    }

    /// Returns the stage descriptors, oldest first.
    #[must_use]
    pub const fn stages(&self) -> &PersistentVector<Stage> {
        &self.stages
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Transforms every element.
    #[must_use]
    pub fn map<U, F>(&self, function: F) -> LazySequence<U>
    where
        U: 'static,
        F: Fn(T) -> U + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let function = ReferenceCounter::new(function);
        self.derive(Stage::Map, move |context| {
            let function = function.clone();
            Ok(boxed(upstream(context)?.map(move |element| function(element))))
        })
    }

    /// Keeps the elements accepted by `predicate`.
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let predicate = ReferenceCounter::new(predicate);
        self.derive(Stage::Filter, move |context| {
            let predicate = predicate.clone();
            Ok(boxed(
                upstream(context)?.filter(move |element| predicate(element)),
            ))
        })
    }

    /// Emits at most `count` elements, then cancels the consumption without
    /// requesting another element from upstream.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// assert_eq!(LazySequence::infinite(10).take(3).to_list(), Ok(vec![10, 11, 12]));
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        let upstream = self.source.clone();
        self.derive(Stage::Take(count), move |context| {
            Ok(boxed(Limit::new(upstream(context)?, count, context.clone())))
        })
    }

    /// Emits `seed`, then every running accumulation of `function`.
    ///
    /// The seed is emitted before the source is touched.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// let sums = LazySequence::of([1, 2, 3]).scan(0, |sum, n| sum + n);
    /// assert_eq!(sums.to_list(), Ok(vec![0, 1, 3, 6]));
    /// ```
    #[must_use]
    pub fn scan<U, F>(&self, seed: U, function: F) -> LazySequence<U>
    where
        U: Clone + Shareable + 'static,
        F: Fn(&U, T) -> U + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let function = ReferenceCounter::new(function);
        self.derive(Stage::Scan, move |context| {
            let function = function.clone();
            let accumulations = upstream(context)?.scan(seed.clone(), move |state, element| {
                *state = function(state, element);
                Some(state.clone())
            });
            Ok(boxed(std::iter::once(seed.clone()).chain(accumulations)))
        })
    }

    /// Drops the first `count` elements.
    #[must_use]
    pub fn skip(&self, count: usize) -> Self {
        let upstream = self.source.clone();
        self.derive(Stage::Skip(count), move |context| {
            Ok(boxed(upstream(context)?.skip(count)))
        })
    }

    /// Emits elements while `predicate` holds, then stops.
    #[must_use]
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let predicate = ReferenceCounter::new(predicate);
        self.derive(Stage::TakeWhile, move |context| {
            let predicate = predicate.clone();
            Ok(boxed(
                upstream(context)?.take_while(move |element| predicate(element)),
            ))
        })
    }

    /// Drops elements while `predicate` holds, then emits the rest.
    #[must_use]
    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let predicate = ReferenceCounter::new(predicate);
        self.derive(Stage::SkipWhile, move |context| {
            let predicate = predicate.clone();
            Ok(boxed(
                upstream(context)?.skip_while(move |element| predicate(element)),
            ))
        })
    }

    /// Replaces every element with the elements of `function(element)`.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// let pairs = LazySequence::of([1, 2]).flat_map(|n| [n, n * 10]);
    /// assert_eq!(pairs.to_list(), Ok(vec![1, 10, 2, 20]));
    /// ```
    #[must_use]
    pub fn flat_map<U, I, F>(&self, function: F) -> LazySequence<U>
    where
        U: 'static,
        I: IntoIterator<Item = U> + 'static,
        I::IntoIter: 'static,
        F: Fn(T) -> I + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let function = ReferenceCounter::new(function);
        self.derive(Stage::FlatMap, move |context| {
            let function = function.clone();
            Ok(boxed(
                upstream(context)?.flat_map(move |element| function(element)),
            ))
        })
    }

    /// Pairs elements with those of `other` and combines each pair.
    ///
    /// Ends with the shorter of the two sequences. `other` runs as its own
    /// consumption: its source pulls and any `take` limit inside it do not
    /// show up in the state or counters of the returned sequence's [`Pull`].
    /// Both sides start a consumption each time, so zipping a
    /// [`once`](LazySequence::once) sequence with itself fails with
    /// [`SourceExhaustedError`].
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// let labels = LazySequence::of(["a", "b", "c"]);
    /// let labelled = LazySequence::infinite(1).zip_with(&labels, |n, label| format!("{label}{n}"));
    /// assert_eq!(labelled.to_list(), Ok(vec!["a1".to_string(), "b2".to_string(), "c3".to_string()]));
    /// ```
    #[must_use]
    pub fn zip_with<U, V, F>(&self, other: &LazySequence<U>, function: F) -> LazySequence<V>
    where
        U: 'static,
        V: 'static,
        F: Fn(T, U) -> V + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let other = other.source.clone();
        let function = ReferenceCounter::new(function);
        self.derive(Stage::ZipWith, move |context| {
            let function = function.clone();
            let left = upstream(context)?;
            let right = other(&PullContext::new())?;
            Ok(boxed(
                left.zip(right)
                    .map(move |(first, second)| function(first, second)),
            ))
        })
    }

    /// Groups consecutive elements into vectors of `size`; the last group
    /// may be shorter. A `size` of zero is treated as one.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// let chunks = LazySequence::range(0, 5, 1).chunk(2);
    /// assert_eq!(chunks.to_list(), Ok(vec![vec![0, 1], vec![2, 3], vec![4]]));
    /// ```
    #[must_use]
    pub fn chunk(&self, size: usize) -> LazySequence<Vec<T>> {
        let size = size.max(1);
        let upstream = self.source.clone();
        self.derive(Stage::Chunk(size), move |context| {
            let mut elements = upstream(context)?;
            Ok(boxed(std::iter::from_fn(move || {
                let group: Vec<T> = elements.by_ref().take(size).collect();
                (!group.is_empty()).then_some(group)
            })))
        })
    }

    /// Calls `observer` on every element as it passes through.
    #[must_use]
    pub fn inspect<F>(&self, observer: F) -> Self
    where
        F: Fn(&T) + Shareable + 'static,
    {
        let upstream = self.source.clone();
        let observer = ReferenceCounter::new(observer);
        self.derive(Stage::Inspect, move |context| {
            let observer = observer.clone();
            Ok(boxed(
                upstream(context)?.inspect(move |element| observer(element)),
            ))
        })
    }

    // =========================================================================
    // Terminal Operations
    // =========================================================================

    /// Starts a consumption and returns its cursor.
    ///
    /// # Errors
    ///
    /// Returns [`SourceExhaustedError`] if the source can only be consumed
    /// once and already was.
    pub fn pull(&self) -> Result<Pull<T>, SourceExhaustedError> {
        let context = PullContext::new();
        let cursor = (self.source)(&context)?;
        Ok(Pull::new(cursor, context, self.stages.len()))
    }

    /// Runs the pipeline to completion and collects the elements.
    ///
    /// # Errors
    ///
    /// See [`LazySequence::pull`].
    pub fn to_list(&self) -> Result<Vec<T>, SourceExhaustedError> {
        Ok(self.pull()?.collect())
    }

    /// Alias of [`LazySequence::to_list`].
    ///
    /// # Errors
    ///
    /// See [`LazySequence::pull`].
    pub fn force(&self) -> Result<Vec<T>, SourceExhaustedError> {
        self.to_list()
    }

    /// Runs the pipeline to completion into a [`PersistentVector`].
    ///
    /// # Errors
    ///
    /// See [`LazySequence::pull`].
    pub fn to_vector(&self) -> Result<PersistentVector<T>, SourceExhaustedError> {
        Ok(self.pull()?.collect())
    }

    /// Folds every element into an accumulator.
    ///
    /// # Errors
    ///
    /// See [`LazySequence::pull`].
    pub fn reduce<U, F>(&self, init: U, function: F) -> Result<U, SourceExhaustedError>
    where
        F: FnMut(U, T) -> U,
    {
        Ok(self.pull()?.fold(init, function))
    }

    /// Returns the first element, pulling nothing beyond it.
    ///
    /// # Errors
    ///
    /// See [`LazySequence::pull`].
    pub fn first(&self) -> Result<Option<T>, SourceExhaustedError> {
        Ok(self.pull()?.next())
    }

    /// Counts the elements.
    ///
    /// # Errors
    ///
    /// See [`LazySequence::pull`].
    pub fn count(&self) -> Result<usize, SourceExhaustedError> {
        Ok(self.pull()?.count())
    }
}
