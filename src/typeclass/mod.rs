//! Type classes shared by the collections and the monad layer.
//!
//! - [`TypeConstructor`]: higher-kinded type emulation via GAT
//! - [`Functor`]: mapping over contained values
//! - [`Foldable`]: reducing a structure to a summary value
//!
//! Implementations are provided for `Option`, `Vec`, the persistent
//! collections and `Maybe` / `Either`.

mod foldable;
mod functor;
mod higher;

pub use foldable::Foldable;
pub use functor::Functor;
pub use higher::TypeConstructor;
