//! Read-side state providers for document stores.
//!
//! This crate is the core of the docstate project and provides:
//!
//! - **Operations** ([`operation`]) - Resource descriptors, URI variables and request context
//! - **Store backend abstraction** ([`backend`]) - The read-only trait every document store implements
//! - **Naming** ([`naming`]) - Collection names derived from resource short names
//! - **Identifiers** ([`identifier`]) - Decoding path identifiers into store-native keys
//! - **Query construction** ([`query`]) - The paginated listing pipeline and point lookups
//! - **Denormalization** ([`document`]) - Turning raw documents into typed objects
//! - **Result mapping** ([`mapper`]) - Shaping store results into [`page::Page`]s and items
//! - **Pagination** ([`pagination`]) - Limit and offset resolution from request context
//! - **Providers** ([`provider`]) - The collection and item providers tying it all together
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use docstate_core::{
//!     document::DocumentDenormalizer,
//!     operation::{Operation, RequestContext, UriVariables},
//!     pagination::Pagination,
//!     provider::CollectionProvider,
//! };
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Book {
//!     pub id: String,
//!     pub title: String,
//! }
//!
//! let provider = CollectionProvider::builder(backend)
//!     .denormalizer(DocumentDenormalizer::default())
//!     .pagination(Pagination::default())
//!     .build()?;
//!
//! let page = provider
//!     .provide::<Book>(&Operation::of::<Book>("Book"), &UriVariables::new(), &RequestContext::new())
//!     .await?;
//! ```

pub mod backend;
pub mod document;
pub mod error;
pub mod identifier;
pub mod mapper;
pub mod naming;
pub mod operation;
pub mod page;
pub mod pagination;
pub mod provider;
pub mod query;
