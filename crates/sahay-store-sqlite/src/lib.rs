//! SQLite backend for the Sahay record store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The connection is serialized, which
//! gives each write single-writer semantics: one statement batch per call,
//! immediately durable.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
