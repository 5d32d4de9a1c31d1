//! Sources a lazy pipeline can start from.
//!
//! Every source except [`LazySequence::once`] can be consumed any number of
//! times: each consumption builds a fresh iterator from the source.

use parking_lot::Mutex;

use super::sequence::LazySequence;
use crate::error::SourceExhaustedError;
use crate::persistent::{PersistentVector, ReferenceCounter, Shareable};

impl<T: 'static> LazySequence<T> {
    /// A sequence over the given elements.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// let sequence = LazySequence::of(["a", "b"]);
    /// assert_eq!(sequence.to_list(), Ok(vec!["a", "b"]));
    /// ```
    #[must_use]
    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Shareable,
    {
        Self::from_vector(&PersistentVector::of(items))
    }

    /// A sequence over the elements of `vector`.
    ///
    /// The vector is shared, not copied; later versions derived from it do
    /// not affect the sequence.
    #[must_use]
    pub fn from_vector(vector: &PersistentVector<T>) -> Self
    where
        T: Clone + Shareable,
    {
        let vector = vector.clone();
        Self::from_source(move |context| Ok(context.track(vector.clone().into_iter())))
    }

    /// `value` repeated `count` times.
    #[must_use]
    pub fn repeat_n(value: T, count: usize) -> Self
    where
        T: Clone + Shareable,
    {
        Self::from_source(move |context| {
            Ok(context.track(std::iter::repeat_n(value.clone(), count)))
        })
    }

    /// A sequence with no elements.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_source(|context| Ok(context.track(std::iter::empty())))
    }

    /// `value` repeated forever.
    #[must_use]
    pub fn repeat(value: T) -> Self
    where
        T: Clone + Shareable,
    {
        Self::from_source(move |context| Ok(context.track(std::iter::repeat(value.clone()))))
    }

    /// `seed`, `function(seed)`, `function(function(seed))`, ... forever.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// let powers = LazySequence::iterate(1, |n| n * 2).take(5);
    /// assert_eq!(powers.to_list(), Ok(vec![1, 2, 4, 8, 16]));
    /// ```
    #[must_use]
    pub fn iterate<F>(seed: T, function: F) -> Self
    where
        T: Clone + Shareable,
        F: Fn(&T) -> T + Shareable + 'static,
    {
        let function = ReferenceCounter::new(function);
        Self::from_source(move |context| {
            let function = function.clone();
            Ok(context.track(std::iter::successors(Some(seed.clone()), move |previous| {
                Some(function(previous))
            })))
        })
    }

    /// A sequence whose source is rebuilt by calling `factory` at the start
    /// of every consumption.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// let sequence = LazySequence::from_factory(|| vec![1, 2, 3]);
    /// assert_eq!(sequence.count(), Ok(3));
    /// assert_eq!(sequence.count(), Ok(3));
    /// ```
    #[must_use]
    pub fn from_factory<I, F>(factory: F) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
        F: Fn() -> I + Shareable + 'static,
    {
        Self::from_source(move |context| Ok(context.track(factory().into_iter())))
    }

    /// A sequence over a single-use iterator.
    ///
    /// The first consumption takes the iterator. Every later consumption
    /// fails with [`SourceExhaustedError`] rather than yielding nothing.
    ///
    /// ```rust
    /// use graham::error::SourceExhaustedError;
    /// use graham::lazy::LazySequence;
    ///
    /// let sequence = LazySequence::once(vec![1, 2].into_iter());
    /// assert_eq!(sequence.to_list(), Ok(vec![1, 2]));
    /// assert_eq!(sequence.to_list(), Err(SourceExhaustedError));
    /// ```
    #[must_use]
    pub fn once<I>(iterator: I) -> Self
    where
        I: Iterator<Item = T> + Shareable + 'static,
    {
        let slot = Mutex::new(Some(iterator));
        Self::from_source(move |context| match slot.lock().take() {
            Some(iterator) => Ok(context.track(iterator)),
            None => {
                tracing::debug!("single-use lazy source consumed again");
                Err(SourceExhaustedError)
            }
        })
    }
}

impl LazySequence<i64> {
    /// Integers from `start` towards `end` (exclusive) in increments of `step`.
    ///
    /// A negative `step` counts down. A `step` of zero yields an empty
    /// sequence.
    ///
    /// ```rust
    /// use graham::lazy::LazySequence;
    ///
    /// assert_eq!(LazySequence::range(0, 10, 3).to_list(), Ok(vec![0, 3, 6, 9]));
    /// assert_eq!(LazySequence::range(5, 0, -2).to_list(), Ok(vec![5, 3, 1]));
    /// ```
    #[must_use]
    pub fn range(start: i64, end: i64, step: i64) -> Self {
        if step == 0 {
            return Self::empty();
        }
        Self::from_source(move |context| {
            let values = std::iter::successors(Some(start), move |value| value.checked_add(step))
                .take_while(move |value| if step > 0 { *value < end } else { *value > end });
            Ok(context.track(values))
        })
    }

    /// `start`, `start + 1`, `start + 2`, ... without end.
    #[must_use]
    pub fn infinite(start: i64) -> Self {
        Self::infinite_by(start, 1)
    }

    /// `start`, `start + step`, `start + 2 * step`, ...
    ///
    /// The sequence ends only if the next value would overflow `i64`.
    #[must_use]
    pub fn infinite_by(start: i64, step: i64) -> Self {
        Self::from_source(move |context| {
            Ok(context.track(std::iter::successors(Some(start), move |value| {
                value.checked_add(step)
            })))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 5, 1, vec![0, 1, 2, 3, 4])]
    #[case(0, 0, 1, vec![])]
    #[case(3, 0, -1, vec![3, 2, 1])]
    #[case(0, 5, 0, vec![])]
    #[case(0, 5, 10, vec![0])]
    fn test_range(
        #[case] start: i64,
        #[case] end: i64,
        #[case] step: i64,
        #[case] expected: Vec<i64>,
    ) {
        assert_eq!(LazySequence::range(start, end, step).to_list(), Ok(expected));
    }

    #[rstest]
    fn test_infinite_by_stops_at_overflow() {
        let near_max = LazySequence::infinite_by(i64::MAX - 1, 1);
        assert_eq!(near_max.to_list(), Ok(vec![i64::MAX - 1, i64::MAX]));
    }

    #[rstest]
    fn test_repeat_and_repeat_n() {
        assert_eq!(LazySequence::repeat("x").take(2).to_list(), Ok(vec!["x", "x"]));
        assert_eq!(LazySequence::repeat_n(7, 3).to_list(), Ok(vec![7, 7, 7]));
        assert_eq!(LazySequence::repeat_n(7, 0).count(), Ok(0));
    }

    #[rstest]
    fn test_from_vector_is_restartable() {
        let vector = PersistentVector::of([1, 2, 3]);
        let sequence = LazySequence::from_vector(&vector);
        assert_eq!(sequence.to_list(), Ok(vec![1, 2, 3]));
        assert_eq!(sequence.to_vector(), Ok(vector));
    }

    #[rstest]
    fn test_once_fails_on_second_consumption() {
        let sequence = LazySequence::once(0..3);
        assert_eq!(sequence.count(), Ok(3));
        assert_eq!(sequence.count(), Err(SourceExhaustedError));
        assert!(sequence.pull().is_err());
    }

    #[rstest]
    fn test_empty() {
        assert_eq!(LazySequence::<i32>::empty().first(), Ok(None));
    }
}
