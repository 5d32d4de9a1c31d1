//! # graham
//!
//! Persistent immutable collections with structural sharing, lazy sequence
//! pipelines, and the functional combinators built on them.
//!
//! ## Overview
//!
//! - **Persistent Data Structures**: `PersistentVector` (32-way radix trie)
//!   and `PersistentHashMap` (hash array mapped trie). Every update returns
//!   a new version that shares unchanged nodes with the old one.
//! - **Lazy Sequences**: `LazySequence` composes map/filter/take/scan and
//!   friends without evaluating anything until a terminal operation pulls,
//!   one element at a time through the whole pipeline.
//! - **Control Structures**: `Maybe` and `Either`.
//! - **Pattern Dispatch**: ordered predicate/handler matching.
//! - **Function Composition**: `compose!`, `pipe!`, `memoize` and friends.
//! - **Type Classes**: `Functor` and `Foldable`.
//!
//! ## Feature Flags
//!
//! - `typeclass`: Type class traits
//! - `persistent`: Persistent data structures
//! - `lazy`: Lazy sequences and memoised thunks
//! - `control`: `Maybe` and `Either`
//! - `pattern`: Pattern dispatcher
//! - `compose`: Function composition utilities
//! - `arc`: Thread-safe reference counting for persistent structures
//! - `serde`: Serialization of persistent structures
//! - `fxhash` / `ahash`: Alternate key hashers for `PersistentHashMap`
//! - `full`: Enable all module features plus `serde`
//!
//! ## Example
//!
//! ```rust
//! use graham::prelude::*;
//!
//! let base = PersistentVector::of([1, 2, 3]);
//! let updated = base.set(0, 10).unwrap();
//! assert_eq!(base.get(0), Ok(&1));
//! assert_eq!(updated.get(0), Ok(&10));
//!
//! let evens = LazySequence::infinite(1).filter(|n| n % 2 == 0).take(3);
//! assert_eq!(evens.to_list(), Ok(vec![2, 4, 6]));
//!
//! assert_eq!(Maybe::at(&base, 9), Maybe::nothing());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use graham::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::*;

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "compose")]
    pub use crate::compose::*;

    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;

    #[cfg(feature = "lazy")]
    pub use crate::lazy::*;

    #[cfg(feature = "pattern")]
    pub use crate::pattern::*;
}

pub mod error;

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "compose")]
pub mod compose;

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "persistent")]
pub mod persistent;

#[cfg(feature = "lazy")]
pub mod lazy;

#[cfg(feature = "pattern")]
pub mod pattern;
