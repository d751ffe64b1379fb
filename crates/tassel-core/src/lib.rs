//! Core types and trait definitions for the Tassel clearance portal.
//!
//! This crate is deliberately free of HTTP, database, and password-hashing
//! dependencies. All other crates depend on it; it depends on nothing
//! proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod blob;
pub mod document;
pub mod error;
pub mod portal;
pub mod session;
pub mod store;
pub mod student;
pub mod transition;
pub mod upload;
pub mod verify;
pub mod view;

pub use error::{Error, Result};
pub use portal::Portal;
