//! Result mapping from raw store output to typed values.
//!
//! The listing pipeline yields a single synthetic document carrying `total` and `data`, or
//! nothing at all when the store skips the facet for an empty input. Item lookups yield at
//! most one document. Both paths run every document through a [`Denormalizer`] and then
//! deserialize into the caller's type.

use bson::{Bson, de::deserialize_from_document};
use serde::de::DeserializeOwned;

use crate::{
    document::{DenormalizationContext, Denormalizer, RawDocument},
    error::{ProviderError, ProviderResult},
    page::Page,
    query::{DATA_FIELD, TOTAL_FIELD},
};

/// Total count and page documents extracted from a listing result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub total: u64,
    pub documents: Vec<RawDocument>,
}

/// Extracts the total and the page documents from the aggregation output.
///
/// An empty output counts as zero matches. A missing or null `total` is zero, a missing
/// `data` is an empty page.
pub fn decode_listing(result: Vec<RawDocument>) -> ProviderResult<Listing> {
    let Some(mut facet) = result.into_iter().next() else {
        return Ok(Listing::default());
    };

    let total = match facet.remove(TOTAL_FIELD) {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(n)) if n >= 0 => n as u64,
        Some(Bson::Int64(n)) if n >= 0 => n as u64,
        Some(Bson::Double(n)) if n >= 0.0 && n.fract() == 0.0 => n as u64,
        Some(other) => {
            return Err(ProviderError::Mapping(format!(
                "expected \"{TOTAL_FIELD}\" to be a non-negative integer, got {other}"
            )));
        }
    };

    let documents = match facet.remove(DATA_FIELD) {
        None => Vec::new(),
        Some(Bson::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Bson::Document(document) => Ok(document),
                other => Err(ProviderError::Mapping(format!(
                    "expected \"{DATA_FIELD}\" to hold documents, got {:?}",
                    other.element_type()
                ))),
            })
            .collect::<ProviderResult<Vec<_>>>()?,
        Some(other) => {
            return Err(ProviderError::Mapping(format!(
                "expected \"{DATA_FIELD}\" to be an array, got {:?}",
                other.element_type()
            )));
        }
    };

    Ok(Listing { total, documents })
}

/// Converts one raw document into the target type, or `None` if the denormalizer yields
/// no object.
pub fn to_object<T: DeserializeOwned>(
    denormalizer: &dyn Denormalizer,
    document: RawDocument,
    context: &DenormalizationContext<'_>,
) -> ProviderResult<Option<T>> {
    match denormalizer.denormalize(document, context)? {
        Bson::Document(fields) => Ok(Some(deserialize_from_document::<T>(fields)?)),
        Bson::Null => Ok(None),
        other => Err(ProviderError::Mapping(format!(
            "expected {} to be an object or null, got {:?}",
            context.class,
            other.element_type()
        ))),
    }
}

/// Converts a decoded listing into a page of typed objects.
pub fn to_page<T: DeserializeOwned>(
    denormalizer: &dyn Denormalizer,
    listing: Listing,
    limit: usize,
    offset: usize,
    context: &DenormalizationContext<'_>,
) -> ProviderResult<Page<T>> {
    if listing.documents.len() > limit {
        return Err(ProviderError::Mapping(format!(
            "store returned {} documents for a page of {limit}",
            listing.documents.len()
        )));
    }

    let items = listing
        .documents
        .into_iter()
        .map(|document| {
            to_object::<T>(denormalizer, document, context)?.ok_or_else(|| {
                ProviderError::Mapping(format!(
                    "expected every {} in a page to be an object",
                    context.class
                ))
            })
        })
        .collect::<ProviderResult<Vec<T>>>()?;

    Ok(Page::builder(items)
        .with_total(listing.total)
        .with_limit(limit)
        .with_offset(offset)
        .build())
}
