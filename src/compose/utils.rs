//! Combinators used alongside [`compose!`](crate::compose!) and
//! [`pipe!`](crate::pipe!).
//!
//! - [`identity`]: returns its argument (I combinator)
//! - [`constant`]: ignores its argument (K combinator)
//! - [`flip`]: swaps the arguments of a binary function (C combinator)
//! - [`memoize`]: caches a function's results by argument

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Returns the value unchanged.
///
/// The unit of composition: `compose!(identity, f)` and `compose!(f, identity)`
/// both behave like `f`.
///
/// ```
/// use graham::compose::identity;
///
/// assert_eq!(identity(42), 42);
/// ```
#[inline]
pub fn identity<T>(value: T) -> T {
    value
}

/// Creates a function that always returns `value`, ignoring its input.
///
/// ```
/// use graham::compose::constant;
///
/// let zeros: Vec<i32> = vec![1, 2, 3].into_iter().map(constant(0)).collect();
/// assert_eq!(zeros, vec![0, 0, 0]);
/// ```
#[inline]
pub fn constant<T: Clone, U>(value: T) -> impl Fn(U) -> T {
    move |_| value.clone()
}

/// Swaps the arguments of a binary function: `flip(f)(b, a) == f(a, b)`.
///
/// ```
/// use graham::compose::flip;
///
/// fn subtract(minuend: i32, subtrahend: i32) -> i32 {
///     minuend - subtrahend
/// }
///
/// assert_eq!(flip(subtract)(3, 10), 7);
/// assert_eq!(flip(flip(subtract))(10, 3), subtract(10, 3));
/// ```
#[inline]
pub fn flip<A, B, C, F>(function: F) -> impl Fn(B, A) -> C
where
    F: Fn(A, B) -> C,
{
    move |second_argument, first_argument| function(first_argument, second_argument)
}

/// A function wrapped with a result cache keyed by its argument.
///
/// Created by [`memoize`]. Multi-argument functions can be memoised by
/// taking a tuple.
pub struct Memoized<A, R, F> {
    function: F,
    cache: RefCell<HashMap<A, R>>,
}

/// Wraps `function` so each distinct argument is computed only once.
///
/// ```
/// use graham::compose::memoize;
/// use std::cell::Cell;
///
/// let calls = Cell::new(0);
/// let square = memoize(|n: u64| {
///     calls.set(calls.get() + 1);
///     n * n
/// });
///
/// assert_eq!(square.call(12), 144);
/// assert_eq!(square.call(12), 144);
/// assert_eq!(calls.get(), 1);
/// ```
pub fn memoize<A, R, F>(function: F) -> Memoized<A, R, F>
where
    A: Hash + Eq + Clone,
    R: Clone,
    F: Fn(A) -> R,
{
    Memoized {
        function,
        cache: RefCell::new(HashMap::new()),
    }
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Hash + Eq + Clone,
    R: Clone,
    F: Fn(A) -> R,
{
    /// Returns the cached result for `argument`, computing it on a miss.
    ///
    /// The function runs outside the cache borrow, so it may call other
    /// memoised functions.
    pub fn call(&self, argument: A) -> R {
        if let Some(result) = self.cache.borrow().get(&argument) {
            return result.clone();
        }
        let result = (self.function)(argument.clone());
        self.cache.borrow_mut().insert(argument, result.clone());
        result
    }

    /// Number of cached results.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Drops every cached result.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<A, R, F> fmt::Debug for Memoized<A, R, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Memoized")
            .field("cached", &self.cache.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn test_constant_with_reference() {
        let always_hello = constant("hello");
        assert_eq!(always_hello(42), "hello");
    }

    #[rstest]
    fn test_flip_with_asymmetric_function() {
        fn power(base: i32, exponent: u32) -> i32 {
            base.pow(exponent)
        }

        assert_eq!(flip(power)(3, 2), 8);
    }

    #[rstest]
    fn test_memoize_caches_per_argument() {
        let calls = Cell::new(0);
        let length = memoize(|text: String| {
            calls.set(calls.get() + 1);
            text.len()
        });

        assert_eq!(length.call("abc".to_string()), 3);
        assert_eq!(length.call("abc".to_string()), 3);
        assert_eq!(length.call("de".to_string()), 2);
        assert_eq!(calls.get(), 2);
        assert_eq!(length.cached(), 2);
    }

    #[rstest]
    fn test_memoize_tuple_argument() {
        let add = memoize(|(left, right): (i32, i32)| left + right);
        assert_eq!(add.call((2, 3)), 5);
        assert_eq!(add.cached(), 1);
    }

    #[rstest]
    fn test_memoize_clear() {
        let calls = Cell::new(0);
        let double = memoize(|n: i32| {
            calls.set(calls.get() + 1);
            n * 2
        });

        double.call(1);
        double.clear();
        double.call(1);
        assert_eq!(calls.get(), 2);
        assert_eq!(double.cached(), 1);
    }
}
