//! Lazy evaluation: deferred sequence pipelines and memoised thunks.
//!
//! - [`LazySequence`]: a restartable description of a source plus stages,
//!   evaluated element by element when a terminal operation pulls
//! - [`Pull`] / [`PullState`]: the cursor and lifecycle of one consumption
//! - [`Memo`] / [`memo`]: a value computed at most once
//!
//! # Examples
//!
//! ```rust
//! use graham::lazy::LazySequence;
//!
//! let squares = LazySequence::infinite(1).map(|n| n * n).take_while(|n| *n < 50);
//! assert_eq!(squares.to_list(), Ok(vec![1, 4, 9, 16, 25, 36, 49]));
//! ```

mod memo;
mod pull;
mod sequence;
mod source;

pub use memo::{Memo, memo};
pub use pull::{Pull, PullState};
pub use sequence::{LazySequence, Stage};
