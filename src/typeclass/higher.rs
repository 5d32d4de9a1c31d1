//! Higher-kinded type emulation through generic associated types.
//!
//! Rust has no higher-kinded types, so a trait cannot abstract over
//! `Option<_>` or `PersistentVector<_>` directly. [`TypeConstructor`] names
//! the applied type parameter and the same constructor applied to another
//! type, which is enough to state `Functor` and `Foldable`.
//!
//! # Example
//!
//! ```rust
//! use graham::typeclass::TypeConstructor;
//!
//! fn rebuild<T: TypeConstructor>(_value: T) -> T::WithType<String>
//! where
//!     T::WithType<String>: Default,
//! {
//!     Default::default()
//! }
//!
//! let none_string: Option<String> = rebuild(Some(42));
//! assert_eq!(none_string, None);
//! ```

/// A type constructor applied to `Inner`.
///
/// # Laws
///
/// `<F as TypeConstructor>::WithType<F::Inner>` is `F` itself.
pub trait TypeConstructor {
    /// The type this constructor is currently applied to.
    type Inner;

    /// The same constructor applied to `B`.
    type WithType<B>: TypeConstructor<Inner = B>;
}

impl<A> TypeConstructor for Option<A> {
    type Inner = A;
    type WithType<B> = Option<B>;
}

impl<T> TypeConstructor for Vec<T> {
    type Inner = T;
    type WithType<B> = Vec<B>;
}
