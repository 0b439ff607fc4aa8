//! SQLite backend for the Evergreen object store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every record is an opaque
//! blob row keyed by its full path string, which keeps the backend shape
//! identical to a remote object store: the rest of the system never sees
//! SQL.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
