//! Convenient re-exports of commonly used types from docstate.
//!
//! ```ignore
//! use docstate::prelude::*;
//! ```

pub use docstate_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{DenormalizationContext, Denormalizer, DocumentDenormalizer, RawDocument},
    error::{ProviderError, ProviderResult},
    identifier::{IdentifierCodec, ObjectIdCodec, StringIdCodec},
    naming::{DefaultInflector, Inflector},
    operation::{Operation, PaginationOverrides, RequestContext, StateOptions, UriVariables},
    page::Page,
    pagination::{Pagination, PaginationOptions, PaginationPolicy},
    provider::{CollectionProvider, ItemProvider},
};
