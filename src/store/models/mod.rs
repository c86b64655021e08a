//! Entity records held by the store.
//!
//! These are plain data; all behavior lives on [`crate::store::Store`].

pub mod order;
pub mod product;
pub mod user;

pub use order::*;
pub use product::*;
pub use user::*;

/// Identifier assigned by the store. Strictly increasing per entity type, starting at 1.
pub type Id = u64;
