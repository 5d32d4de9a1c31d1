//! Persistent (immutable) data structures.
//!
//! This module provides immutable collections that use structural sharing
//! to minimise copying:
//!
//! - [`PersistentVector`]: Persistent vector (32-way radix trie with a tail buffer)
//! - [`PersistentHashMap`]: Persistent hash map (HAMT)
//!
//! # Structural Sharing
//!
//! Every operation that looks like a mutation returns a new version. The new
//! version rebuilds only the nodes on the path to the changed element and
//! shares everything else with the old one, so both stay valid and cheap to
//! keep around.
//!
//! # Examples
//!
//! ## `PersistentVector`
//!
//! ```rust
//! use graham::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! assert_eq!(vector.get(50), Ok(&50));
//!
//! let updated = vector.set(50, 999).unwrap();
//! assert_eq!(vector.get(50), Ok(&50));     // Original unchanged
//! assert_eq!(updated.get(50), Ok(&999));   // New version
//! ```
//!
//! ## `PersistentHashMap`
//!
//! ```rust
//! use graham::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .set("one".to_string(), 1)
//!     .set("two".to_string(), 2);
//! assert_eq!(map.get("one"), Ok(&1));
//!
//! let updated = map.set("one".to_string(), 100);
//! assert_eq!(map.get("one"), Ok(&1));       // Original unchanged
//! assert_eq!(updated.get("one"), Ok(&100)); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

/// Values that may be stored behind [`ReferenceCounter`] in shared state.
///
/// With the `arc` feature this requires `Send + Sync`, so closures captured
/// by lazy pipelines can cross threads together with the collections. Without
/// it every type qualifies.
#[cfg(feature = "arc")]
pub trait Shareable: Send + Sync {}

#[cfg(feature = "arc")]
impl<T: Send + Sync + ?Sized> Shareable for T {}

/// Values that may be stored behind [`ReferenceCounter`] in shared state.
///
/// With the `arc` feature this requires `Send + Sync`, so closures captured
/// by lazy pipelines can cross threads together with the collections. Without
/// it every type qualifies.
#[cfg(not(feature = "arc"))]
pub trait Shareable {}

#[cfg(not(feature = "arc"))]
impl<T: ?Sized> Shareable for T {}

mod hashmap;
mod node;
mod vector;

pub use hashmap::PersistentHashMap;
pub use hashmap::PersistentHashMapIntoIterator;
pub use hashmap::PersistentHashMapIterator;
pub use vector::PersistentVector;
pub use vector::PersistentVectorIntoIterator;
pub use vector::PersistentVectorIterator;

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_shares_allocation() {
        let shared = ReferenceCounter::new(vec![1, 2, 3]);
        let cloned = shared.clone();
        assert!(ReferenceCounter::ptr_eq(&shared, &cloned));
        assert_eq!(ReferenceCounter::strong_count(&shared), 2);
    }

    #[cfg(feature = "arc")]
    #[rstest]
    fn test_reference_counter_is_arc() {
        let shared: ReferenceCounter<i32> = std::sync::Arc::new(1);
        assert_eq!(*shared, 1);
    }

    #[cfg(not(feature = "arc"))]
    #[rstest]
    fn test_reference_counter_is_rc() {
        let shared: ReferenceCounter<i32> = std::rc::Rc::new(1);
        assert_eq!(*shared, 1);
    }
}
