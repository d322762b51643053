//! Storage backend abstraction for the providers.
//!
//! This module defines the read-only surface the providers need from a document store:
//! an aggregation round trip and a single-document lookup. Backends decode their native
//! cursors into `Vec<Document>` before returning, so nothing downstream ever sees a
//! driver-specific type.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use docstate_core::backend::StoreBackend;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//!
//! let book = backend.find_one(doc! { "title": "Dune" }, "books").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document;
use std::{fmt::Debug, sync::Arc};

use crate::error::ProviderResult;

/// Abstract interface for the document stores the providers read from.
///
/// # Thread Safety
///
/// Implementations are shared by every in-flight request and must support concurrent
/// reads. Connection pooling and timeouts are the implementation's concern.
///
/// # Error Handling
///
/// Any failure to reach the store or to drain its results must be reported as
/// [`ProviderError::StorageUnavailable`](crate::error::ProviderError::StorageUnavailable).
/// Results are returned whole or not at all.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Runs an aggregation pipeline against a collection.
    ///
    /// # Arguments
    ///
    /// * `pipeline` - The pipeline stages, in order
    /// * `collection` - The name of the collection to aggregate over
    ///
    /// # Returns
    ///
    /// Every document the pipeline produced, or a
    /// [`ProviderError`](crate::error::ProviderError) on failure. A collection that does
    /// not exist behaves like an empty one.
    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        collection: &str,
    ) -> ProviderResult<Vec<Document>>;

    /// Fetches at most one document matching a filter.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter document
    /// * `collection` - The name of the collection to query
    ///
    /// # Returns
    ///
    /// The first matching document, `None` if nothing matched, or a
    /// [`ProviderError`](crate::error::ProviderError) on failure.
    async fn find_one(
        &self,
        filter: Document,
        collection: &str,
    ) -> ProviderResult<Option<Document>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> ProviderResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        collection: &str,
    ) -> ProviderResult<Vec<Document>> {
        (*self)
            .aggregate(pipeline, collection)
            .await
    }

    async fn find_one(
        &self,
        filter: Document,
        collection: &str,
    ) -> ProviderResult<Option<Document>> {
        (*self)
            .find_one(filter, collection)
            .await
    }
}

#[async_trait]
impl<B> StoreBackend for Arc<B>
where
    B: StoreBackend,
{
    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        collection: &str,
    ) -> ProviderResult<Vec<Document>> {
        (**self)
            .aggregate(pipeline, collection)
            .await
    }

    async fn find_one(
        &self,
        filter: Document,
        collection: &str,
    ) -> ProviderResult<Option<Document>> {
        (**self)
            .find_one(filter, collection)
            .await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> ProviderResult<Self::Backend>;
}
