//! Keyset-paginated query surface over the per-day store.

pub mod model;

#[cfg(feature = "sqlite")]
pub mod engine;

pub use model::{OrderType, QueryModel};

#[cfg(feature = "sqlite")]
pub use engine::{KeysetPage, QueryEngine};
