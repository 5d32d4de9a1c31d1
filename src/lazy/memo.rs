//! Memoised thunks.
//!
//! A [`Memo`] defers a computation until its value is first requested and
//! caches the result for every later request.
//!
//! # Examples
//!
//! ```rust
//! use graham::lazy::memo;
//! use std::cell::Cell;
//!
//! let calls = Cell::new(0);
//! let answer = memo(|| {
//!     calls.set(calls.get() + 1);
//!     42
//! });
//!
//! assert_eq!(calls.get(), 0);
//! assert_eq!(*answer.get(), 42);
//! assert_eq!(*answer.get(), 42);
//! assert_eq!(calls.get(), 1);
//! ```

use std::cell::{Ref, RefCell};
use std::fmt;

enum MemoState<T, F> {
    Pending(F),
    Ready(T),
    /// The initializer panicked.
    Poisoned,
}

/// A value computed at most once, on first access.
///
/// `Memo` is single-threaded. The initializer runs outside any borrow of
/// the memo, so it may read other memos.
pub struct Memo<T, F = fn() -> T> {
    state: RefCell<MemoState<T, F>>,
}

/// Shorthand for [`Memo::new`].
pub fn memo<T, F: FnOnce() -> T>(initializer: F) -> Memo<T, F> {
    Memo::new(initializer)
}

impl<T, F: FnOnce() -> T> Memo<T, F> {
    /// Wraps `initializer` without calling it.
    #[inline]
    pub const fn new(initializer: F) -> Self {
        Self {
            state: RefCell::new(MemoState::Pending(initializer)),
        }
    }

    /// Returns the value, computing it on the first call.
    ///
    /// # Panics
    ///
    /// Panics if an earlier call's initializer panicked, or if the
    /// initializer calls `get` on the same memo.
    pub fn get(&self) -> Ref<'_, T> {
        let pending = matches!(*self.state.borrow(), MemoState::Pending(_));
        if pending {
            let previous = std::mem::replace(&mut *self.state.borrow_mut(), MemoState::Poisoned);
            if let MemoState::Pending(initializer) = previous {
                let value = initializer();
                tracing::trace!("memo evaluated");
                *self.state.borrow_mut() = MemoState::Ready(value);
            }
        }

        Ref::map(self.state.borrow(), |state| match state {
            MemoState::Ready(value) => value,
            MemoState::Pending(_) | MemoState::Poisoned => {
                panic!("memo initializer panicked or re-entered")
            }
        })
    }

    /// Returns `true` once the value has been computed.
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        matches!(*self.state.borrow(), MemoState::Ready(_))
    }

    /// Consumes the memo, computing the value if necessary.
    ///
    /// # Panics
    ///
    /// Panics if an earlier initializer call panicked.
    pub fn into_inner(self) -> T {
        match self.state.into_inner() {
            MemoState::Ready(value) => value,
            MemoState::Pending(initializer) => initializer(),
            MemoState::Poisoned => panic!("memo initializer panicked"),
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Memo<T, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            MemoState::Ready(value) => formatter.debug_tuple("Memo").field(value).finish(),
            MemoState::Pending(_) => formatter.write_str("Memo(<pending>)"),
            MemoState::Poisoned => formatter.write_str("Memo(<poisoned>)"),
        }
    }
}
