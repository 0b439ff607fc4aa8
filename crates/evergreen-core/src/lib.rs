//! Core types and trait definitions for the Evergreen note publisher.
//!
//! This crate is deliberately free of HTTP and storage-backend
//! dependencies. All other crates depend on it; it depends on nothing
//! proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod identity;
pub mod keys;
pub mod note;
pub mod store;
pub mod theme;

pub use error::{Error, Result};
