//! Maybe type - an optional value with monadic combinators.
//!
//! `Maybe<T>` is either `Just(T)` or `Nothing`. It mirrors `Option`, adds a
//! structured error for extracting from `Nothing`, and bridges the
//! error-returning lookups of the persistent collections into an absent
//! value.
//!
//! # Examples
//!
//! ```rust
//! use graham::control::Maybe;
//! use graham::persistent::PersistentHashMap;
//!
//! let ages = PersistentHashMap::of([("ada", 36), ("alan", 41)]);
//!
//! let next_year = Maybe::lookup(&ages, &"ada").map(|age| age + 1);
//! assert_eq!(next_year, Maybe::just(37));
//!
//! let missing = Maybe::lookup(&ages, &"grace").map(|age| age + 1);
//! assert_eq!(missing.get_or_else(0), 0);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use crate::error::NothingError;
use crate::persistent::{PersistentHashMap, PersistentVector};
use crate::typeclass::{Foldable, Functor, TypeConstructor};

/// An optional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Maybe<T> {
    /// A present value.
    Just(T),
    /// No value.
    Nothing,
}

impl<T> Default for Maybe<T> {
    #[inline]
    fn default() -> Self {
        Self::Nothing
    }
}

impl<T> Maybe<T> {
    /// Wraps a present value.
    #[inline]
    pub const fn just(value: T) -> Self {
        Self::Just(value)
    }

    /// The absent value.
    #[inline]
    pub const fn nothing() -> Self {
        Self::Nothing
    }

    /// `Just` for `Some`, `Nothing` for `None`.
    #[inline]
    pub fn of(value: Option<T>) -> Self {
        value.into()
    }

    /// Returns `true` for `Just`.
    #[inline]
    pub const fn is_just(&self) -> bool {
        matches!(self, Self::Just(_))
    }

    /// Returns `true` for `Nothing`.
    #[inline]
    pub const fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Returns the held value.
    ///
    /// # Errors
    ///
    /// Returns [`NothingError`] for `Nothing`.
    #[inline]
    pub const fn get(&self) -> Result<&T, NothingError> {
        match self {
            Self::Just(value) => Ok(value),
            Self::Nothing => Err(NothingError),
        }
    }

    /// Returns the held value or `default`.
    #[inline]
    pub fn get_or_else(self, default: T) -> T {
        match self {
            Self::Just(value) => value,
            Self::Nothing => default,
        }
    }

    /// Returns the held value or computes one; `fallback` only runs for `Nothing`.
    #[inline]
    pub fn get_or_else_with<F>(self, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Just(value) => value,
            Self::Nothing => fallback(),
        }
    }

    /// Transforms the held value.
    #[inline]
    pub fn map<U, F>(self, function: F) -> Maybe<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Just(value) => Maybe::Just(function(value)),
            Self::Nothing => Maybe::Nothing,
        }
    }

    /// Chains a computation that may itself produce `Nothing`.
    #[inline]
    pub fn flat_map<U, F>(self, function: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Maybe<U>,
    {
        match self {
            Self::Just(value) => function(value),
            Self::Nothing => Maybe::Nothing,
        }
    }

    /// Keeps the value only if `predicate` accepts it.
    #[inline]
    #[must_use]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Self::Just(value) if predicate(&value) => Self::Just(value),
            _ => Self::Nothing,
        }
    }

    /// Returns `self` if it is `Just`, otherwise `alternative`.
    #[inline]
    #[must_use]
    pub fn or_else(self, alternative: Self) -> Self {
        match self {
            Self::Just(_) => self,
            Self::Nothing => alternative,
        }
    }

    /// Converts into the standard `Option`.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        self.into()
    }
}

impl<T: Clone> Maybe<T> {
    /// The element at `index`, or `Nothing` when the index is out of range.
    ///
    /// ```rust
    /// use graham::control::Maybe;
    /// use graham::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::of([10, 20]);
    /// assert_eq!(Maybe::at(&vector, 1), Maybe::just(20));
    /// assert_eq!(Maybe::at(&vector, 5), Maybe::nothing());
    /// ```
    pub fn at(vector: &PersistentVector<T>, index: usize) -> Self {
        vector.get(index).ok().cloned().into()
    }

    /// The value bound to `key`, or `Nothing` when the key is absent.
    pub fn lookup<K, Q>(map: &PersistentHashMap<K, T>, key: &Q) -> Self
    where
        K: Hash + Eq + Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        map.get(key).ok().cloned().into()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<T> From<Option<T>> for Maybe<T> {
    #[inline]
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => Self::Just(value),
            None => Self::Nothing,
        }
    }
}

/// Any error becomes `Nothing`.
impl<T, E> From<Result<T, E>> for Maybe<T> {
    #[inline]
    fn from(result: Result<T, E>) -> Self {
        result.ok().into()
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    #[inline]
    fn from(maybe: Maybe<T>) -> Self {
        match maybe {
            Maybe::Just(value) => Some(value),
            Maybe::Nothing => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Just(value) => write!(formatter, "Just({value})"),
            Self::Nothing => write!(formatter, "Nothing"),
        }
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

impl<T> TypeConstructor for Maybe<T> {
    type Inner = T;
    type WithType<B> = Maybe<B>;
}

impl<T> Functor for Maybe<T> {
    fn fmap<B, F>(self, function: F) -> Maybe<B>
    where
        F: FnMut(T) -> B,
    {
        self.map(function)
    }
}

impl<T> Foldable for Maybe<T> {
    fn fold_left<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(B, T) -> B,
    {
        match self {
            Self::Just(value) => function(init, value),
            Self::Nothing => init,
        }
    }

    fn fold_right<B, F>(self, init: B, mut function: F) -> B
    where
        F: FnMut(T, B) -> B,
    {
        match self {
            Self::Just(value) => function(value, init),
            Self::Nothing => init,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_get() {
        assert_eq!(Maybe::just(1).get(), Ok(&1));
        assert_eq!(Maybe::<i32>::nothing().get(), Err(NothingError));
    }

    #[rstest]
    #[case(Maybe::just(5), 5)]
    #[case(Maybe::nothing(), 0)]
    fn test_get_or_else(#[case] value: Maybe<i32>, #[case] expected: i32) {
        assert_eq!(value.get_or_else(0), expected);
    }

    #[rstest]
    fn test_get_or_else_with_is_lazy() {
        let value = Maybe::just(1).get_or_else_with(|| panic!("fallback must not run"));
        assert_eq!(value, 1);
        assert_eq!(Maybe::nothing().get_or_else_with(|| 9), 9);
    }

    #[rstest]
    fn test_map_and_flat_map() {
        let half = |n: i32| if n % 2 == 0 { Maybe::just(n / 2) } else { Maybe::nothing() };
        assert_eq!(Maybe::just(3).map(|n| n * 2), Maybe::just(6));
        assert_eq!(Maybe::just(4).flat_map(half), Maybe::just(2));
        assert_eq!(Maybe::just(3).flat_map(half), Maybe::nothing());
        assert_eq!(Maybe::<i32>::nothing().map(|n| n * 2), Maybe::nothing());
    }

    #[rstest]
    fn test_filter() {
        assert_eq!(Maybe::just(4).filter(|n| *n > 3), Maybe::just(4));
        assert_eq!(Maybe::just(2).filter(|n| *n > 3), Maybe::nothing());
    }

    #[rstest]
    fn test_or_else() {
        assert_eq!(Maybe::just(1).or_else(Maybe::just(2)), Maybe::just(1));
        assert_eq!(Maybe::nothing().or_else(Maybe::just(2)), Maybe::just(2));
    }

    #[rstest]
    fn test_conversions() {
        assert_eq!(Maybe::of(Some(1)), Maybe::just(1));
        assert_eq!(Maybe::from(Err::<i32, &str>("bad")), Maybe::nothing());
        assert_eq!(Maybe::just(1).into_option(), Some(1));
    }

    #[rstest]
    fn test_lookup_bridges_key_absent() {
        let map = PersistentHashMap::of([("a".to_string(), 1)]);
        assert_eq!(Maybe::lookup(&map, "a"), Maybe::just(1));
        assert_eq!(Maybe::lookup(&map, "b"), Maybe::nothing());
    }

    #[rstest]
    fn test_display() {
        assert_eq!(Maybe::just(1).to_string(), "Just(1)");
        assert_eq!(Maybe::<i32>::nothing().to_string(), "Nothing");
    }

    #[rstest]
    fn test_fold_left() {
        assert_eq!(Maybe::just(2).fold_left(1, |sum, n| sum + n), 3);
        assert_eq!(Maybe::nothing().fold_left(1, |sum, n: i32| sum + n), 1);
    }
}
