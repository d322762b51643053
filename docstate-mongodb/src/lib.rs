//! MongoDB backend implementation for docstate.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait on top
//! of the official async driver. Connection pooling, retries and timeouts are the
//! driver's; every driver failure surfaces as a storage-unavailable error.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docstate = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docstate::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "library")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
