//! In-memory storage implementation for the providers.
//!
//! Documents are kept per collection in insertion order, which is the natural order
//! listings return them in.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, oid::ObjectId};

use docstate_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::ProviderResult,
    identifier::ID_FIELD,
};

use crate::evaluator::PipelineEvaluator;

type StoreMap = HashMap<String, Vec<Document>>;


/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Performance
///
/// Every query scans its collection. This is meant for tests and small datasets.
///
/// # Example
///
/// ```ignore
/// use docstate_memory::InMemoryStore;
/// use docstate_core::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let ids = store.insert("books", vec![doc! { "title": "Dune" }]).await;
///
/// let found = store.find_one(doc! { "_id": ids[0].clone() }, "books").await?;
/// assert!(found.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Appends documents to a collection, creating it if needed.
    ///
    /// Documents without an `_id` receive a fresh [`ObjectId`]. Returns the `_id` of every
    /// inserted document, in order.
    pub async fn insert(
        &self,
        collection: &str,
        documents: impl IntoIterator<Item = Document>,
    ) -> Vec<Bson> {
        let mut store = self.store.write().await;
        let collection_docs = store
            .entry(collection.to_string())
            .or_default();

        documents
            .into_iter()
            .map(|mut document| {
                if !document.contains_key(ID_FIELD) {
                    let mut with_id = Document::new();
                    with_id.insert(ID_FIELD, ObjectId::new());
                    for (key, value) in document {
                        with_id.insert(key, value);
                    }
                    document = with_id;
                }

                let id = document
                    .get(ID_FIELD)
                    .cloned()
                    .unwrap_or(Bson::Null);
                collection_docs.push(document);
                id
            })
            .collect()
    }

    /// Removes every document from a collection.
    pub async fn clear(&self, collection: &str) {
        self.store
            .write()
            .await
            .remove(collection);
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn aggregate(&self, pipeline: Vec<Document>, collection: &str) -> ProviderResult<Vec<Document>> {
        let documents = self.store
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default();

        tracing::trace!(collection, stages = pipeline.len(), "evaluating pipeline in memory");

        PipelineEvaluator::run(documents, &pipeline)
    }

    async fn find_one(&self, filter: Document, collection: &str) -> ProviderResult<Option<Document>> {
        let store = self.store.read().await;
        let Some(documents) = store.get(collection) else {
            return Ok(None);
        };

        for document in documents {
            if PipelineEvaluator::matches(document, &filter)? {
                return Ok(Some(document.clone()));
            }
        }

        Ok(None)
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// Collections can be seeded before the store is handed to providers.
///
/// # Example
///
/// ```ignore
/// use docstate_memory::InMemoryStore;
/// use docstate_core::backend::StoreBackendBuilder;
/// use bson::doc;
///
/// let store = InMemoryStore::builder()
///     .with_documents("books", vec![doc! { "title": "Dune" }])
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder {
    seed: Vec<(String, Vec<Document>)>,
}

impl InMemoryStoreBuilder {
    /// Seeds a collection with documents.
    pub fn with_documents(
        mut self,
        collection: &str,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        self.seed
            .push((collection.to_string(), documents.into_iter().collect()));
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] holding the seeded documents.
    async fn build(self) -> ProviderResult<Self::Backend> {
        let store = InMemoryStore::new();

        for (collection, documents) in self.seed {
            store.insert(&collection, documents).await;
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = InMemoryStore::new();
        let ids = store
            .insert("books", vec![doc! { "title": "Dune" }, doc! { "_id": "isbn-1", "title": "Emma" }])
            .await;

        assert!(matches!(ids[0], Bson::ObjectId(_)));
        assert_eq!(ids[1], Bson::String("isbn-1".to_string()));
        assert_eq!(store.count("books").await, 2);
    }

    #[tokio::test]
    async fn test_find_one() {
        let store = InMemoryStore::builder()
            .with_documents("books", vec![doc! { "_id": 1, "title": "Dune" }])
            .build()
            .await
            .unwrap();

        let found = store.find_one(doc! { "_id": 1 }, "books").await.unwrap();
        assert_eq!(found, Some(doc! { "_id": 1, "title": "Dune" }));

        assert!(store.find_one(doc! { "_id": 2 }, "books").await.unwrap().is_none());
        assert!(store.find_one(doc! { "_id": 1 }, "authors").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_aggregate_missing_collection() {
        let store = InMemoryStore::new();
        let result = store
            .aggregate(docstate_core::query::ListingPipeline::new(10, 0).build(), "books")
            .await
            .unwrap();

        assert_eq!(result, vec![doc! { "data": [] }]);
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        store.insert("books", vec![doc! { "title": "Dune" }]).await;

        assert_eq!(clone.count("books").await, 1);
        clone.clear("books").await;
        assert_eq!(store.count("books").await, 0);
    }
}
