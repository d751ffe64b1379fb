//! Filesystem backend for the Tassel blob store.
//!
//! Uploaded documents land under one directory per student, named by a
//! content hash so re-saving identical bytes yields the same reference.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FsBlobStore;

#[cfg(test)]
mod tests;
