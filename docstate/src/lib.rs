//! Main docstate crate providing read-side state providers for document stores.
//!
//! This crate is the primary entry point for users of docstate. It re-exports the core
//! types and functionality from the sub-crates and gives access to the storage backends.
//!
//! # Features
//!
//! - **Paginated listings** - A page of typed objects and the total match count from one query
//! - **Item lookups** - Path identifiers decoded into store keys, malformed ones answered as absent
//! - **Pluggable conventions** - Collection naming, identifier codecs, denormalizers and
//!   pagination policies are traits
//! - **Multiple backends** - In-memory and MongoDB
//!
//! # Quick Start
//!
//! ```ignore
//! use docstate::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Book {
//!     pub id: String,
//!     pub title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> ProviderResult<()> {
//!     let store = InMemoryStore::builder()
//!         .with_documents("books", vec![doc! { "title": "Dune" }, doc! { "title": "Emma" }])
//!         .build()
//!         .await?;
//!
//!     let books = CollectionProvider::builder(store.clone())
//!         .denormalizer(DocumentDenormalizer::default())
//!         .pagination(Pagination::default())
//!         .build()?;
//!
//!     let page = books
//!         .provide::<Book>(&Operation::of::<Book>("Book"), &UriVariables::new(), &RequestContext::new())
//!         .await?;
//!
//!     println!("{} of {} books", page.len(), page.total);
//!
//!     let book = ItemProvider::builder(store)
//!         .denormalizer(DocumentDenormalizer::default())
//!         .build()?
//!         .provide::<Book>(
//!             &Operation::of::<Book>("Book"),
//!             &UriVariables::new().with("id", page.items[0].id.clone()),
//!             &RequestContext::new(),
//!         )
//!         .await?;
//!
//!     println!("{book:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use docstate_core::{
    backend, document, error, identifier, mapper, naming, operation, page, pagination, provider,
    query,
};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docstate_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docstate_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
