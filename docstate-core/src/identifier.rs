//! Identifier codecs.
//!
//! A codec turns the opaque string taken from a request path into the key type the store
//! uses for its primary key field. Decoding never fails loudly: a string that cannot be a
//! key simply identifies nothing.
//!
//! A provider holds exactly one codec, so every document it reads is expected to use the
//! same key representation. A provider configured with [`ObjectIdCodec`] never matches a
//! document whose `_id` was stored as a string (and vice versa).

use bson::{Bson, oid::ObjectId};
use std::fmt::Debug;

/// The primary key field used by document stores.
pub const ID_FIELD: &str = "_id";

/// Parses path identifiers into store-native keys.
pub trait IdentifierCodec: Send + Sync + Debug {
    /// Returns the document field holding the primary key.
    fn field(&self) -> &str {
        ID_FIELD
    }

    /// Decodes a raw identifier into a key, or `None` if it cannot identify any document.
    fn decode(&self, raw: &str) -> Option<Bson>;
}

/// Decodes 24-character hexadecimal strings into [`ObjectId`] keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdCodec;

impl IdentifierCodec for ObjectIdCodec {
    fn decode(&self, raw: &str) -> Option<Bson> {
        ObjectId::parse_str(raw)
            .ok()
            .map(Bson::ObjectId)
    }
}

/// Uses the raw identifier as a string key.
#[derive(Debug, Clone, Default)]
pub struct StringIdCodec {
    field: Option<String>,
}

impl StringIdCodec {
    pub fn new() -> Self {
        Self { field: None }
    }

    /// Looks identifiers up in `field` instead of `_id`.
    pub fn with_field(field: impl Into<String>) -> Self {
        Self { field: Some(field.into()) }
    }
}

impl IdentifierCodec for StringIdCodec {
    fn field(&self) -> &str {
        self.field.as_deref().unwrap_or(ID_FIELD)
    }

    fn decode(&self, raw: &str) -> Option<Bson> {
        if raw.is_empty() {
            return None;
        }

        Some(Bson::String(raw.to_string()))
    }
}
