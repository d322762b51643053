//! Error types and result types for provider operations.
//!
//! A missing item is never an error: providers return `Ok(None)` for it. Every variant
//! below propagates unchanged to the caller, who decides how to present it.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors raised while answering a read request.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A required collaborator was not supplied, or a backend could not be configured.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The store round trip failed (network, timeout, authentication, driver error).
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    /// The store or the denormalizer produced a value of the wrong shape.
    #[error("Mapping error: {0}")]
    Mapping(String),
    /// Converting a raw document into the target type failed.
    #[error("Denormalization error: {0}")]
    Denormalization(String),
    /// The request context carried pagination parameters that cannot be honored.
    #[error("Pagination error: {0}")]
    Pagination(String),
}

/// A specialized `Result` type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<BsonError> for ProviderError {
    fn from(err: BsonError) -> Self {
        ProviderError::Denormalization(err.to_string())
    }
}

impl From<SerdeJsonError> for ProviderError {
    fn from(err: SerdeJsonError) -> Self {
        ProviderError::Denormalization(err.to_string())
    }
}
