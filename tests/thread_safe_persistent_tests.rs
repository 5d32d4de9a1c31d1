//! Integration tests for sharing persistent structures and lazy sequences
//! across threads with the `arc` feature enabled.

#![cfg(all(feature = "arc", feature = "lazy"))]

use graham::lazy::LazySequence;
use graham::persistent::{PersistentHashMap, PersistentVector};
use rstest::rstest;
use std::sync::Arc;
use std::thread;

// =============================================================================
// PersistentVector
// =============================================================================

#[rstest]
fn test_vector_cross_thread_structural_sharing() {
    let original: PersistentVector<usize> = (0..1000).collect();

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let shared = original.clone();
            thread::spawn(move || {
                let updated = shared.set(index * 100, usize::MAX).unwrap();
                assert_eq!(shared.get(index * 100), Ok(&(index * 100)));
                updated
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, vector) in results.iter().enumerate() {
        assert_eq!(vector.get(index * 100), Ok(&usize::MAX));
        assert_eq!(vector.iter().filter(|n| **n == usize::MAX).count(), 1);
    }
    assert!(original.iter().copied().eq(0..1000));
}

// =============================================================================
// PersistentHashMap
// =============================================================================

#[rstest]
fn test_map_concurrent_readers_and_writers() {
    let original = Arc::new(
        (0..500)
            .map(|key| (key, key * 2))
            .collect::<PersistentHashMap<i32, i32>>(),
    );

    let handles: Vec<_> = (0..4)
        .map(|thread_index| {
            let shared = Arc::clone(&original);
            thread::spawn(move || {
                let mut local = (*shared).clone();
                for key in 0..50 {
                    local = local.set(1000 + thread_index * 50 + key, key);
                }
                for key in 0..500 {
                    assert_eq!(shared.get(&key), Ok(&(key * 2)));
                }
                local
            })
        })
        .collect();

    for handle in handles {
        let local = handle.join().expect("Thread panicked");
        assert_eq!(local.len(), 550);
    }
    assert_eq!(original.len(), 500);
}

// =============================================================================
// LazySequence
// =============================================================================

#[rstest]
fn test_lazy_sequence_consumed_on_many_threads() {
    let squares = LazySequence::infinite(1).map(|n| n * n).take(10);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sequence = squares.clone();
            thread::spawn(move || sequence.reduce(0, |sum, n| sum + n))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Thread panicked"), Ok(385));
    }
}
