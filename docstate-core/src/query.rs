//! Query construction for the providers.
//!
//! Two query shapes are produced:
//!
//! - [`ListingPipeline`] - an aggregation computing the total match count and one page of
//!   documents in a single round trip
//! - [`point_lookup`] - a filter selecting the document with a given primary key
//!
//! # Listing pipeline
//!
//! ```text
//! [ { $match: {} },
//!   { $facet: { count: [ { $count: "total" } ],
//!               data:  [ { $skip: offset }, { $limit: limit } ] } },
//!   { $project: { total: { $arrayElemAt: [ "$count.total", 0 ] }, data: 1 } } ]
//! ```
//!
//! Both facets read the same input, so the count and the page always agree even while
//! other clients write to the collection.

use bson::{Bson, Document, doc};

/// Field of the projected listing result holding the total match count.
pub const TOTAL_FIELD: &str = "total";
/// Field of the projected listing result holding the page documents.
pub const DATA_FIELD: &str = "data";

/// A paginated listing over a collection.
///
/// # Example
///
/// ```ignore
/// use docstate_core::query::ListingPipeline;
///
/// let pipeline = ListingPipeline::new(10, 20).build();
/// assert_eq!(pipeline.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPipeline {
    filter: Document,
    limit: usize,
    offset: usize,
}

impl ListingPipeline {
    /// Creates a match-all listing returning at most `limit` documents after skipping `offset`.
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            filter: Document::new(),
            limit,
            offset,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Builds the pipeline stages.
    pub fn build(&self) -> Vec<Document> {
        vec![
            doc! { "$match": self.filter.clone() },
            doc! {
                "$facet": {
                    "count": [ { "$count": TOTAL_FIELD } ],
                    DATA_FIELD: self.window(),
                }
            },
            doc! {
                "$project": {
                    TOTAL_FIELD: { "$arrayElemAt": [ format!("$count.{TOTAL_FIELD}"), 0 ] },
                    DATA_FIELD: 1,
                }
            },
        ]
    }

    fn window(&self) -> Vec<Bson> {
        let skip = doc! { "$skip": to_i64(self.offset) };

        // $limit rejects zero
        let take = if self.limit == 0 {
            doc! { "$match": { "$expr": false } }
        } else {
            doc! { "$limit": to_i64(self.limit) }
        };

        vec![Bson::Document(skip), Bson::Document(take)]
    }
}

/// Builds a filter selecting the document whose `field` equals `key`.
pub fn point_lookup(field: &str, key: Bson) -> Document {
    doc! { field: key }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_listing_pipeline_shape() {
        let pipeline = ListingPipeline::new(2, 4).build();

        assert_eq!(pipeline.len(), 3);
        assert_eq!(pipeline[0], doc! { "$match": {} });
        assert_eq!(
            pipeline[1],
            doc! {
                "$facet": {
                    "count": [ { "$count": "total" } ],
                    "data": [ { "$skip": 4_i64 }, { "$limit": 2_i64 } ],
                }
            }
        );
        assert_eq!(
            pipeline[2],
            doc! {
                "$project": {
                    "total": { "$arrayElemAt": [ "$count.total", 0 ] },
                    "data": 1,
                }
            }
        );
    }

    #[test]
    fn test_listing_pipeline_skips_by_offset() {
        let pipeline = ListingPipeline::new(10, 0).build();
        let window = pipeline[1]
            .get_document("$facet")
            .unwrap()
            .get_array("data")
            .unwrap();

        assert_eq!(window[0], Bson::Document(doc! { "$skip": 0_i64 }));
        assert_eq!(window[1], Bson::Document(doc! { "$limit": 10_i64 }));
    }

    #[test]
    fn test_listing_pipeline_zero_limit() {
        let pipeline = ListingPipeline::new(0, 3).build();
        let window = pipeline[1]
            .get_document("$facet")
            .unwrap()
            .get_array("data")
            .unwrap();

        assert_eq!(window[1], Bson::Document(doc! { "$match": { "$expr": false } }));
    }

    #[test]
    fn test_point_lookup() {
        let id = ObjectId::new();
        assert_eq!(point_lookup("_id", Bson::ObjectId(id)), doc! { "_id": id });
    }
}
