//! Raw documents and their denormalization.
//!
//! Backends hand back [`RawDocument`]s, plain BSON maps using the store's own field names.
//! A [`Denormalizer`] reshapes one of those maps into the representation of the target
//! type; the result mapper then deserializes it into the concrete type.
//!
//! The denormalizer's output is deliberately untyped: a [`Bson::Document`] becomes an
//! object, [`Bson::Null`] means "no object", and anything else is rejected by the mapper.

use bson::{Bson, Document};
use std::fmt::Debug;

use crate::{error::ProviderResult, identifier::ID_FIELD};

/// A document as returned by the store.
pub type RawDocument = Document;

/// Format name reported by [`DocumentDenormalizer`].
pub const BSON_FORMAT: &str = "bson";

/// Information about the conversion being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenormalizationContext<'a> {
    /// Name of the target type.
    pub class: &'a str,
    /// Format of the raw document.
    pub format: &'a str,
}

impl<'a> DenormalizationContext<'a> {
    pub fn new(class: &'a str) -> Self {
        Self { class, format: BSON_FORMAT }
    }
}

/// Reshapes raw documents into the representation of a target type.
///
/// Fields of the raw document that the target type does not declare are tolerated: typed
/// deserialization ignores them.
pub trait Denormalizer: Send + Sync + Debug {
    /// Converts a raw document.
    ///
    /// # Returns
    ///
    /// A [`Bson::Document`] for an object, [`Bson::Null`] for no object, or an error if the
    /// document cannot be converted.
    fn denormalize(
        &self,
        document: RawDocument,
        context: &DenormalizationContext<'_>,
    ) -> ProviderResult<Bson>;
}

/// Exposes the store's primary key under the target type's identifier attribute.
///
/// `_id` is renamed to `id` (configurable). ObjectIds are rendered as 24-character hex
/// strings, other key types are kept as they are. An explicit identifier attribute already
/// present in the document wins over `_id`. All other fields pass through untouched,
/// so nested ObjectIds such as references stay ObjectIds and deserialize into
/// [`bson::oid::ObjectId`] fields, not `String` ones.
///
/// # Example
///
/// ```ignore
/// use bson::{doc, oid::ObjectId};
/// use docstate_core::document::{DenormalizationContext, Denormalizer, DocumentDenormalizer};
///
/// let id = ObjectId::new();
/// let value = DocumentDenormalizer::default()
///     .denormalize(doc! { "_id": id, "title": "Dune" }, &DenormalizationContext::new("Book"))?;
///
/// assert_eq!(value, bson::Bson::Document(doc! { "id": id.to_hex(), "title": "Dune" }));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentDenormalizer {
    identifier_attribute: String,
}

impl DocumentDenormalizer {
    pub fn new(identifier_attribute: impl Into<String>) -> Self {
        Self {
            identifier_attribute: identifier_attribute.into(),
        }
    }

    pub fn identifier_attribute(&self) -> &str {
        &self.identifier_attribute
    }
}

impl Default for DocumentDenormalizer {
    fn default() -> Self {
        Self::new("id")
    }
}

impl Denormalizer for DocumentDenormalizer {
    fn denormalize(
        &self,
        document: RawDocument,
        _context: &DenormalizationContext<'_>,
    ) -> ProviderResult<Bson> {
        let has_identifier = document.contains_key(&self.identifier_attribute);
        let mut output = Document::new();

        for (key, value) in document {
            if key == ID_FIELD && key != self.identifier_attribute {
                if has_identifier {
                    continue;
                }

                let identifier = match value {
                    Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
                    other => other,
                };
                output.insert(self.identifier_attribute.clone(), identifier);
            } else {
                output.insert(key, value);
            }
        }

        Ok(Bson::Document(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    fn ctx() -> DenormalizationContext<'static> {
        DenormalizationContext::new("Book")
    }

    #[test]
    fn test_renames_object_id() {
        let id = ObjectId::new();
        let value = DocumentDenormalizer::default()
            .denormalize(doc! { "_id": id, "title": "Dune", "tags": ["scifi"] }, &ctx())
            .unwrap();

        assert_eq!(
            value,
            Bson::Document(doc! { "id": id.to_hex(), "title": "Dune", "tags": ["scifi"] })
        );
    }

    #[test]
    fn test_keeps_string_keys_and_explicit_identifier() {
        let value = DocumentDenormalizer::default()
            .denormalize(doc! { "_id": "isbn-1", "title": "Dune" }, &ctx())
            .unwrap();
        assert_eq!(value, Bson::Document(doc! { "id": "isbn-1", "title": "Dune" }));

        let value = DocumentDenormalizer::default()
            .denormalize(doc! { "_id": ObjectId::new(), "id": 7 }, &ctx())
            .unwrap();
        assert_eq!(value, Bson::Document(doc! { "id": 7 }));
    }

    #[test]
    fn test_leaves_nested_object_ids_untouched() {
        let id = ObjectId::new();
        let author = ObjectId::new();
        let value = DocumentDenormalizer::default()
            .denormalize(doc! { "_id": id, "author": author, "meta": { "editor": author } }, &ctx())
            .unwrap();

        assert_eq!(
            value,
            Bson::Document(doc! { "id": id.to_hex(), "author": author, "meta": { "editor": author } })
        );
    }

    #[test]
    fn test_keeps_store_key_when_attribute_is_id_field() {
        let id = ObjectId::new();
        let value = DocumentDenormalizer::new("_id")
            .denormalize(doc! { "_id": id }, &ctx())
            .unwrap();
        assert_eq!(value, Bson::Document(doc! { "_id": id }));
    }
}
