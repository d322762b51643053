use std::time::Duration;
use async_trait::async_trait;
use futures::TryStreamExt;
use bson::Document;
use mongodb::{
    Client, Collection as MongoCollection,
    options::ClientOptions,
};
use docstate_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{ProviderError, ProviderResult},
};


fn unavailable(err: mongodb::error::Error) -> ProviderError {
    ProviderError::StorageUnavailable(err.to_string())
}

/// Reads documents from a MongoDB database.
///
/// The wrapped [`Client`] is a pooled handle; clones share its connections.
#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn aggregate(&self, pipeline: Vec<Document>, collection: &str) -> ProviderResult<Vec<Document>> {
        tracing::trace!(database = %self.database, collection, "running aggregation");

        self.get_collection(collection)
            .aggregate(pipeline)
            .await
            .map_err(unavailable)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(unavailable)
    }

    async fn find_one(&self, filter: Document, collection: &str) -> ProviderResult<Option<Document>> {
        tracing::trace!(database = %self.database, collection, "running find_one");

        self.get_collection(collection)
            .find_one(filter)
            .await
            .map_err(unavailable)
    }

    async fn shutdown(self) -> ProviderResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Builder for [`MongoDbStore`].
///
/// Timeouts configured here are enforced by the driver; when one expires the pending call
/// fails with a storage-unavailable error.
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    app_name: Option<String>,
    connect_timeout: Option<Duration>,
    server_selection_timeout: Option<Duration>,
    max_pool_size: Option<u32>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            app_name: None,
            connect_timeout: None,
            server_selection_timeout: None,
            max_pool_size: None,
        }
    }

    /// Sets the application name reported to the server.
    pub fn with_app_name(mut self, app_name: &str) -> Self {
        self.app_name = Some(app_name.to_string());
        self
    }

    /// Sets how long establishing a connection may take.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets how long an operation may wait for a suitable server.
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of pooled connections per server.
    pub fn with_max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> ProviderResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        if let Some(app_name) = self.app_name {
            options.app_name = Some(app_name);
        }
        if let Some(timeout) = self.connect_timeout {
            options.connect_timeout = Some(timeout);
        }
        if let Some(timeout) = self.server_selection_timeout {
            options.server_selection_timeout = Some(timeout);
        }
        if let Some(size) = self.max_pool_size {
            options.max_pool_size = Some(size);
        }

        tracing::debug!(database = %self.database, "connecting to MongoDB");

        Ok(MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| ProviderError::Configuration(e.to_string()))?,
            self.database,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_rejects_malformed_dsn() {
        let result = MongoDbStore::builder("not-a-connection-string", "library")
            .build()
            .await;

        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_builder_does_not_connect_eagerly() {
        let store = MongoDbStore::builder("mongodb://localhost:27017", "library")
            .with_app_name("docstate-tests")
            .with_server_selection_timeout(Duration::from_millis(50))
            .build()
            .await
            .unwrap();

        assert_eq!(store.database(), "library");
    }
}
