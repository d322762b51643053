//! In-memory document storage backend for docstate.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and evaluates the same
//! aggregation pipelines the providers send to MongoDB, which makes it suitable for
//! development and tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use docstate_memory::InMemoryStore;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryStore::new();
//!     let ids = store
//!         .insert("books", vec![doc! { "title": "Dune" }])
//!         .await;
//!
//!     assert_eq!(ids.len(), 1);
//! }
//! ```

pub mod store;
pub(crate) mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
