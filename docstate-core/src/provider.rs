//! Collection and item providers.
//!
//! Providers are the entry points for the surrounding framework:
//!
//! - [`CollectionProvider`] - answers "list" requests with a [`Page`]
//! - [`ItemProvider`] - answers "fetch one" requests with an optional object
//!
//! Both are built through builders that refuse to produce a provider while a required
//! collaborator is missing.
//!
//! # Example
//!
//! ```ignore
//! use docstate_core::{
//!     document::DocumentDenormalizer,
//!     operation::{Operation, RequestContext, UriVariables},
//!     provider::ItemProvider,
//! };
//!
//! let provider = ItemProvider::builder(backend)
//!     .denormalizer(DocumentDenormalizer::default())
//!     .build()?;
//!
//! let book = provider
//!     .provide::<Book>(
//!         &Operation::of::<Book>("Book"),
//!         &UriVariables::new().with("id", "65a1f0c2e4b0a1b2c3d4e5f6"),
//!         &RequestContext::new(),
//!     )
//!     .await?;
//! ```

use serde::de::DeserializeOwned;

use crate::{
    backend::StoreBackend,
    document::{DenormalizationContext, Denormalizer},
    error::{ProviderError, ProviderResult},
    identifier::{IdentifierCodec, ObjectIdCodec},
    mapper::{decode_listing, to_object, to_page},
    naming::{DefaultInflector, Inflector},
    operation::{Operation, RequestContext, UriVariables},
    page::Page,
    pagination::PaginationPolicy,
    query::{ListingPipeline, point_lookup},
};

/// Returns the collection an operation reads from.
///
/// An explicit collection in the operation's state options wins over the inflector.
pub fn resolve_collection(operation: &Operation, inflector: &dyn Inflector) -> String {
    operation
        .state_options()
        .and_then(|options| options.collection.clone())
        .unwrap_or_else(|| inflector.tableize(operation.short_name()))
}

fn missing(provider: &str, collaborator: &str) -> ProviderError {
    ProviderError::Configuration(format!("{provider} requires a {collaborator}"))
}

/// Answers listing requests with a page of typed objects and the total match count.
#[derive(Debug)]
pub struct CollectionProvider<B: StoreBackend> {
    backend: B,
    denormalizer: Box<dyn Denormalizer>,
    pagination: Box<dyn PaginationPolicy>,
    inflector: Box<dyn Inflector>,
}

impl<B: StoreBackend> CollectionProvider<B> {
    /// Creates a builder reading from the given backend.
    pub fn builder(backend: B) -> CollectionProviderBuilder<B> {
        CollectionProviderBuilder::new(backend)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lists one page of the operation's collection.
    ///
    /// The page and the total are computed by a single aggregation, so they describe the
    /// same snapshot of the collection.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Pagination`] if the context carries invalid pagination parameters
    /// - [`ProviderError::StorageUnavailable`] if the store round trip fails
    /// - [`ProviderError::Mapping`] / [`ProviderError::Denormalization`] if a document does
    ///   not fit the target type
    pub async fn provide<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        _uri_variables: &UriVariables,
        context: &RequestContext,
    ) -> ProviderResult<Page<T>> {
        let collection = resolve_collection(operation, &*self.inflector);
        let limit = self.pagination.limit(operation, context)?;
        let offset = self.pagination.offset(operation, context)?;

        tracing::debug!(
            class = operation.class(),
            collection = %collection,
            limit,
            offset,
            "listing documents"
        );

        let pipeline = ListingPipeline::new(limit, offset).build();
        tracing::trace!(?pipeline, "listing pipeline");

        let result = self
            .backend
            .aggregate(pipeline, &collection)
            .await
            .inspect_err(|err| {
                tracing::warn!(collection = %collection, error = %err, "listing failed");
            })?;

        let page = to_page::<T>(
            &*self.denormalizer,
            decode_listing(result)?,
            limit,
            offset,
            &DenormalizationContext::new(operation.class()),
        )?;

        tracing::debug!(
            collection = %collection,
            items = page.len(),
            total = page.total,
            "listed documents"
        );

        Ok(page)
    }
}

/// Builder for [`CollectionProvider`].
///
/// The denormalizer and the pagination policy are required; the inflector defaults to
/// [`DefaultInflector`].
pub struct CollectionProviderBuilder<B: StoreBackend> {
    backend: B,
    denormalizer: Option<Box<dyn Denormalizer>>,
    pagination: Option<Box<dyn PaginationPolicy>>,
    inflector: Box<dyn Inflector>,
}

impl<B: StoreBackend> CollectionProviderBuilder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            denormalizer: None,
            pagination: None,
            inflector: Box::new(DefaultInflector),
        }
    }

    /// Sets the denormalizer used to build objects from raw documents.
    pub fn denormalizer(mut self, denormalizer: impl Denormalizer + 'static) -> Self {
        self.denormalizer = Some(Box::new(denormalizer));
        self
    }

    /// Sets the policy deciding each page's limit and offset.
    pub fn pagination(mut self, pagination: impl PaginationPolicy + 'static) -> Self {
        self.pagination = Some(Box::new(pagination));
        self
    }

    /// Replaces the collection naming convention.
    pub fn inflector(mut self, inflector: impl Inflector + 'static) -> Self {
        self.inflector = Box::new(inflector);
        self
    }

    /// Builds the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the denormalizer or the pagination policy
    /// was not set.
    pub fn build(self) -> ProviderResult<CollectionProvider<B>> {
        Ok(CollectionProvider {
            backend: self.backend,
            denormalizer: self
                .denormalizer
                .ok_or_else(|| missing("CollectionProvider", "denormalizer"))?,
            pagination: self
                .pagination
                .ok_or_else(|| missing("CollectionProvider", "pagination policy"))?,
            inflector: self.inflector,
        })
    }
}

/// Answers single-item requests by primary key.
#[derive(Debug)]
pub struct ItemProvider<B: StoreBackend> {
    backend: B,
    denormalizer: Box<dyn Denormalizer>,
    codec: Box<dyn IdentifierCodec>,
    inflector: Box<dyn Inflector>,
}

impl<B: StoreBackend> ItemProvider<B> {
    /// Creates a builder reading from the given backend.
    pub fn builder(backend: B) -> ItemProviderBuilder<B> {
        ItemProviderBuilder::new(backend)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetches the item identified by the first URI variable.
    ///
    /// Returns `Ok(None)` without contacting the store when there is no URI variable or it
    /// does not decode into a key, and `Ok(None)` when no document has that key.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::StorageUnavailable`] if the store round trip fails
    /// - [`ProviderError::Mapping`] / [`ProviderError::Denormalization`] if the document
    ///   does not fit the target type
    pub async fn provide<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        uri_variables: &UriVariables,
        _context: &RequestContext,
    ) -> ProviderResult<Option<T>> {
        let Some(key) = uri_variables
            .first()
            .and_then(|raw| self.codec.decode(raw))
        else {
            tracing::debug!(
                class = operation.class(),
                identifier = ?uri_variables.first(),
                "identifier does not decode, skipping lookup"
            );
            return Ok(None);
        };

        let collection = resolve_collection(operation, &*self.inflector);
        tracing::debug!(
            class = operation.class(),
            collection = %collection,
            key = %key,
            "fetching document"
        );

        let document = self
            .backend
            .find_one(point_lookup(self.codec.field(), key), &collection)
            .await
            .inspect_err(|err| {
                tracing::warn!(collection = %collection, error = %err, "lookup failed");
            })?;

        let Some(document) = document else {
            tracing::debug!(collection = %collection, "document not found");
            return Ok(None);
        };

        to_object::<T>(
            &*self.denormalizer,
            document,
            &DenormalizationContext::new(operation.class()),
        )
    }
}

/// Builder for [`ItemProvider`].
///
/// The denormalizer is required; the identifier codec defaults to [`ObjectIdCodec`] and
/// the inflector to [`DefaultInflector`].
pub struct ItemProviderBuilder<B: StoreBackend> {
    backend: B,
    denormalizer: Option<Box<dyn Denormalizer>>,
    codec: Box<dyn IdentifierCodec>,
    inflector: Box<dyn Inflector>,
}

impl<B: StoreBackend> ItemProviderBuilder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            denormalizer: None,
            codec: Box::new(ObjectIdCodec),
            inflector: Box::new(DefaultInflector),
        }
    }

    /// Sets the denormalizer used to build objects from raw documents.
    pub fn denormalizer(mut self, denormalizer: impl Denormalizer + 'static) -> Self {
        self.denormalizer = Some(Box::new(denormalizer));
        self
    }

    /// Replaces the identifier codec.
    pub fn codec(mut self, codec: impl IdentifierCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Replaces the collection naming convention.
    pub fn inflector(mut self, inflector: impl Inflector + 'static) -> Self {
        self.inflector = Box::new(inflector);
        self
    }

    /// Builds the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the denormalizer was not set.
    pub fn build(self) -> ProviderResult<ItemProvider<B>> {
        Ok(ItemProvider {
            backend: self.backend,
            denormalizer: self
                .denormalizer
                .ok_or_else(|| missing("ItemProvider", "denormalizer"))?,
            codec: self.codec,
            inflector: self.inflector,
        })
    }
}
