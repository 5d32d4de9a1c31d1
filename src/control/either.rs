//! Either type - a value that is one of two alternatives.
//!
//! `Either<L, R>` is right-biased: `map`, `flat_map` and `get_or_else`
//! act on `Right` and pass `Left` through untouched. By convention `Left`
//! carries an error and `Right` a successful result.
//!
//! # Examples
//!
//! ```rust
//! use graham::control::Either;
//!
//! fn parse(input: &str) -> Either<String, i32> {
//!     input.parse().map_err(|_| format!("not a number: {input}")).into()
//! }
//!
//! assert_eq!(parse("21").map(|n| n * 2), Either::right(42));
//! assert_eq!(parse("x").get_or_else(0), 0);
//!
//! let description = parse("7").fold(|error| error, |n| format!("got {n}"));
//! assert_eq!(description, "got 7");
//! ```

use std::fmt;

use crate::error::WrongSideError;
use crate::typeclass::{Functor, TypeConstructor};

/// A value that is either `Left(L)` or `Right(R)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Either<L, R> {
    /// The left variant, conventionally an error.
    Left(L),
    /// The right variant, conventionally a success.
    Right(R),
}

impl<L, R> Either<L, R> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Wraps `value` as `Left`.
    #[inline]
    pub const fn left(value: L) -> Self {
        Self::Left(value)
    }

    /// Wraps `value` as `Right`.
    #[inline]
    pub const fn right(value: R) -> Self {
        Self::Right(value)
    }

    // =========================================================================
    // Type Checking
    // =========================================================================

    /// Returns `true` if this is a `Left` value.
    #[inline]
    pub const fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` if this is a `Right` value.
    #[inline]
    pub const fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    const fn side(&self) -> &'static str {
        match self {
            Self::Left(_) => "Left",
            Self::Right(_) => "Right",
        }
    }

    // =========================================================================
    // Value Extraction
    // =========================================================================

    /// Returns the left value.
    ///
    /// # Errors
    ///
    /// Returns [`WrongSideError`] if this is a `Right`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::control::Either;
    /// use graham::error::WrongSideError;
    ///
    /// let right: Either<&str, i32> = Either::right(1);
    /// assert_eq!(
    ///     right.get_left(),
    ///     Err(WrongSideError { requested: "left", actual: "Right" })
    /// );
    /// ```
    pub const fn get_left(&self) -> Result<&L, WrongSideError> {
        match self {
            Self::Left(value) => Ok(value),
            Self::Right(_) => Err(WrongSideError {
                requested: "left",
                actual: self.side(),
            }),
        }
    }

    /// Returns the right value.
    ///
    /// # Errors
    ///
    /// Returns [`WrongSideError`] if this is a `Left`.
    pub const fn get_right(&self) -> Result<&R, WrongSideError> {
        match self {
            Self::Right(value) => Ok(value),
            Self::Left(_) => Err(WrongSideError {
                requested: "right",
                actual: self.side(),
            }),
        }
    }

    /// Returns the right value, or `default` for a `Left`.
    #[inline]
    pub fn get_or_else(self, default: R) -> R {
        match self {
            Self::Left(_) => default,
            Self::Right(value) => value,
        }
    }

    /// Converts into `Some(left)` or `None`.
    #[inline]
    pub fn left_value(self) -> Option<L> {
        match self {
            Self::Left(value) => Some(value),
            Self::Right(_) => None,
        }
    }

    /// Converts into `Some(right)` or `None`.
    #[inline]
    pub fn right_value(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(value) => Some(value),
        }
    }

    // =========================================================================
    // Mapping Operations
    // =========================================================================

    /// Applies `function` to a `Right` value.
    #[inline]
    pub fn map<T, F>(self, function: F) -> Either<L, T>
    where
        F: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => Either::Left(value),
            Self::Right(value) => Either::Right(function(value)),
        }
    }

    /// Applies `function` to a `Left` value.
    #[inline]
    pub fn map_left<T, F>(self, function: F) -> Either<T, R>
    where
        F: FnOnce(L) -> T,
    {
        match self {
            Self::Left(value) => Either::Left(function(value)),
            Self::Right(value) => Either::Right(value),
        }
    }

    /// Chains a computation that may itself produce a `Left`.
    ///
    /// ```rust
    /// use graham::control::Either;
    ///
    /// let halve = |n: i32| {
    ///     if n % 2 == 0 { Either::right(n / 2) } else { Either::left("odd") }
    /// };
    /// assert_eq!(Either::right(8).flat_map(halve).flat_map(halve), Either::right(2));
    /// assert_eq!(Either::right(6).flat_map(halve).flat_map(halve), Either::left("odd"));
    /// ```
    #[inline]
    pub fn flat_map<T, F>(self, function: F) -> Either<L, T>
    where
        F: FnOnce(R) -> Either<L, T>,
    {
        match self {
            Self::Left(value) => Either::Left(value),
            Self::Right(value) => function(value),
        }
    }

    /// Collapses both sides into one value.
    #[inline]
    pub fn fold<T, F, G>(self, left_function: F, right_function: G) -> T
    where
        F: FnOnce(L) -> T,
        G: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => left_function(value),
            Self::Right(value) => right_function(value),
        }
    }

    /// Exchanges the two sides.
    #[inline]
    pub fn swap(self) -> Either<R, L> {
        match self {
            Self::Left(value) => Either::Right(value),
            Self::Right(value) => Either::Left(value),
        }
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl<L: fmt::Display, R: fmt::Display> fmt::Display for Either<L, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left(value) => write!(formatter, "Left({value})"),
            Self::Right(value) => write!(formatter, "Right({value})"),
        }
    }
}

// =============================================================================
// From Implementations
// =============================================================================

/// `Ok(r)` becomes `Right(r)`, and `Err(e)` becomes `Left(e)`.
impl<L, R> From<Result<R, L>> for Either<L, R> {
    #[inline]
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(value) => Self::Right(value),
            Err(error) => Self::Left(error),
        }
    }
}

/// `Right(r)` becomes `Ok(r)`, and `Left(l)` becomes `Err(l)`.
impl<L, R> From<Either<L, R>> for Result<R, L> {
    #[inline]
    fn from(either: Either<L, R>) -> Self {
        match either {
            Either::Left(value) => Err(value),
            Either::Right(value) => Ok(value),
        }
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<L, R> TypeConstructor for Either<L, R> {
    type Inner = R;
    type WithType<B> = Either<L, B>;
}

impl<L, R> Functor for Either<L, R> {
    fn fmap<B, F>(self, function: F) -> Either<L, B>
    where
        F: FnMut(R) -> B,
    {
        self.map(function)
    }
}
