//! Storage layer for the synced resource store.
//!
//! # Submodules
//!
//! - [`collection`] - Collection path patterns and segment matching
//! - [`schema`] - Table definition of the store
//! - [`sqlite`] - Read-only SQLite access to cards, providers, logos and images

pub mod collection;
pub mod schema;
pub mod sqlite;

pub use sqlite::{ImageAsset, ResourceRow, ResourceStore};
