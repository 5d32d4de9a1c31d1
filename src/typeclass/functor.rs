//! Functor type class - mapping over the values held by a container.
//!
//! # Laws
//!
//! ## Identity Law
//!
//! ```text
//! fa.fmap(|x| x) == fa
//! ```
//!
//! ## Composition Law
//!
//! ```text
//! fa.fmap(f).fmap(g) == fa.fmap(|x| g(f(x)))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use graham::typeclass::Functor;
//!
//! let x: Option<i32> = Some(5);
//! let y: Option<String> = x.fmap(|n| n.to_string());
//! assert_eq!(y, Some("5".to_string()));
//! ```

use super::higher::TypeConstructor;

/// A container whose values can be transformed without changing its shape.
///
/// `function` is `FnMut` so that multi-valued containers such as vectors can
/// call it once per element.
pub trait Functor: TypeConstructor {
    /// Applies `function` to every held value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graham::typeclass::Functor;
    ///
    /// assert_eq!(vec![1, 2, 3].fmap(|n| n * 2), vec![2, 4, 6]);
    /// ```
    fn fmap<B, F>(self, function: F) -> Self::WithType<B>
    where
        F: FnMut(Self::Inner) -> B;

    /// Replaces every held value with a clone of `value`.
    fn replace<B: Clone>(self, value: B) -> Self::WithType<B>
    where
        Self: Sized,
    {
        self.fmap(move |_| value.clone())
    }

    /// Discards the held values, keeping only the shape.
    fn void(self) -> Self::WithType<()>
    where
        Self: Sized,
    {
        self.fmap(|_| ())
    }
}

impl<A> Functor for Option<A> {
    fn fmap<B, F>(self, function: F) -> Option<B>
    where
        F: FnMut(A) -> B,
    {
        self.map(function)
    }
}

impl<T> Functor for Vec<T> {
    fn fmap<B, F>(self, function: F) -> Vec<B>
    where
        F: FnMut(T) -> B,
    {
        self.into_iter().map(function).collect()
    }
}
