//! Error types surfaced by the collections, lazy sequences and combinators.
//!
//! Every fallible operation in this crate returns exactly one of the
//! structured errors below. Because all containers are immutable, a failed
//! operation never leaves a partially modified value behind: the receiver and
//! every other existing version stay exactly as they were.
//!
//! Callers that prefer a single error type can convert any of them into
//! [`Error`] with `?`.
//!
//! # Examples
//!
//! ```rust
//! use graham::error::{Error, IndexError};
//! use graham::persistent::PersistentVector;
//!
//! fn third(vector: &PersistentVector<i32>) -> Result<i32, Error> {
//!     Ok(*vector.get(2)?)
//! }
//!
//! let vector = PersistentVector::of([1, 2]);
//! assert_eq!(
//!     third(&vector),
//!     Err(Error::Index(IndexError { index: 2, length: 2 }))
//! );
//! ```

use thiserror::Error;

/// An index outside `[0, length)` was used on a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("index {index} out of range for vector of length {length}")]
pub struct IndexError {
    /// The offending index.
    pub index: usize,
    /// The length of the vector at the time of the call.
    pub length: usize,
}

/// `pop` was called on an empty vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("cannot pop from an empty vector")]
pub struct EmptyError;

/// A map lookup without a default found no entry for the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("key not present in map")]
pub struct KeyAbsent;

/// A single-consumption lazy source was consumed a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("lazy sequence source was already consumed")]
pub struct SourceExhaustedError;

/// A pattern dispatcher found no case accepting the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("no matching case for value ({cases} cases tried)")]
pub struct NoMatchError {
    /// Number of cases that were evaluated and rejected the subject.
    pub cases: usize,
}

/// A value was requested from `Maybe::Nothing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("cannot get value from Nothing")]
pub struct NothingError;

/// The wrong side of an `Either` was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("cannot get {requested} value from {actual}")]
pub struct WrongSideError {
    /// The side that was asked for (`"left"` or `"right"`).
    pub requested: &'static str,
    /// The variant actually held (`"Left"` or `"Right"`).
    pub actual: &'static str,
}

/// Union of every error kind raised by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// See [`IndexError`].
    #[error(transparent)]
    Index(#[from] IndexError),
    /// See [`EmptyError`].
    #[error(transparent)]
    Empty(#[from] EmptyError),
    /// See [`KeyAbsent`].
    #[error(transparent)]
    KeyAbsent(#[from] KeyAbsent),
    /// See [`SourceExhaustedError`].
    #[error(transparent)]
    SourceExhausted(#[from] SourceExhaustedError),
    /// See [`NoMatchError`].
    #[error(transparent)]
    NoMatch(#[from] NoMatchError),
    /// See [`NothingError`].
    #[error(transparent)]
    Nothing(#[from] NothingError),
    /// See [`WrongSideError`].
    #[error(transparent)]
    WrongSide(#[from] WrongSideError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_index_error_display() {
        let error = IndexError {
            index: 7,
            length: 3,
        };
        assert_eq!(
            error.to_string(),
            "index 7 out of range for vector of length 3"
        );
    }

    #[rstest]
    fn test_no_match_error_display() {
        assert_eq!(
            NoMatchError { cases: 2 }.to_string(),
            "no matching case for value (2 cases tried)"
        );
    }

    #[rstest]
    fn test_wrong_side_error_display() {
        let error = WrongSideError {
            requested: "right",
            actual: "Left",
        };
        assert_eq!(error.to_string(), "cannot get right value from Left");
    }

    #[rstest]
    #[case(Error::from(EmptyError), "cannot pop from an empty vector")]
    #[case(Error::from(KeyAbsent), "key not present in map")]
    #[case(
        Error::from(SourceExhaustedError),
        "lazy sequence source was already consumed"
    )]
    #[case(Error::from(NothingError), "cannot get value from Nothing")]
    fn test_umbrella_error_is_transparent(#[case] error: Error, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_errors_implement_std_error() {
        let error: &dyn std::error::Error = &Error::from(IndexError {
            index: 0,
            length: 0,
        });
        assert!(error.source().is_none());
    }
}
