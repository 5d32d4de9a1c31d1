//! Function composition utilities.
//!
//! - [`compose!`]: compose functions right-to-left
//! - [`pipe!`]: apply functions to a value left-to-right
//! - [`curry2!`] to [`curry5!`]: take arguments one at a time
//! - [`partial!`]: fix some arguments, leave `__` positions open
//! - [`identity`], [`constant`], [`flip`]: basic combinators
//! - [`memoize`]: cache a function's results by argument
//!
//! # Laws
//!
//! - **Associativity**: `compose!(f, compose!(g, h)) == compose!(compose!(f, g), h)`
//! - **Identity**: `compose!(identity, f) == f == compose!(f, identity)`
//! - **Double flip**: `flip(flip(f)) == f`
//!
//! # Examples
//!
//! ```
//! use graham::{compose, pipe};
//!
//! fn add_one(x: i32) -> i32 { x + 1 }
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! assert_eq!(compose!(add_one, double)(5), 11);
//! assert_eq!(pipe!(5, double, add_one), 11);
//! ```

mod compose_macro;
mod curry_macro;
mod partial_macro;
mod pipe_macro;
mod utils;

pub use utils::{Memoized, constant, flip, identity, memoize};

// Macros are exported at the crate root by #[macro_export].
pub use crate::compose;
pub use crate::partial;
pub use crate::pipe;
pub use crate::{curry2, curry3, curry4, curry5};
