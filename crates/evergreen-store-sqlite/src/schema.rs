//! SQL schema for the SQLite object store.
//!
//! Executed once at connection startup. Future migrations will be gated
//! on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per stored object. The key carries the whole namespace layout
-- (notes/, {vault}/, images/); the body is opaque to this crate.
CREATE TABLE IF NOT EXISTS objects (
    key          TEXT PRIMARY KEY,
    body         BLOB NOT NULL,
    content_type TEXT NOT NULL
);

PRAGMA user_version = 1;
";
