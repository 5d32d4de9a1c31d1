//! Monadic wrappers for absent values and alternatives.
//!
//! - [`Maybe`]: a value that may be absent
//! - [`Either`]: a value that is one of two alternatives (right-biased)
//!
//! # Examples
//!
//! ```rust
//! use graham::control::{Either, Maybe};
//!
//! let found = Maybe::just(3).filter(|n| n % 2 == 1).map(|n| n * 10);
//! assert_eq!(found, Maybe::just(30));
//!
//! let checked: Either<&str, i32> = Either::right(5);
//! assert_eq!(checked.flat_map(|n| if n > 0 { Either::right(n) } else { Either::left("negative") }), Either::right(5));
//! ```

mod either;
mod maybe;

pub use either::Either;
pub use maybe::Maybe;
