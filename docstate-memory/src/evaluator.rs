//! Aggregation pipeline evaluation for in-memory documents.
//!
//! This module evaluates the subset of the aggregation language the providers emit:
//! `$match` (field equality and constant `$expr`), `$skip`, `$limit`, `$count`, `$facet`
//! and inclusion `$project` with field paths and `$arrayElemAt`. Anything else is rejected
//! the way a store rejects a malformed pipeline.

use bson::{Bson, Document};

use docstate_core::error::{ProviderError, ProviderResult};

fn rejected(message: impl Into<String>) -> ProviderError {
    ProviderError::StorageUnavailable(format!("pipeline rejected: {}", message.into()))
}

pub(crate) struct PipelineEvaluator;

impl PipelineEvaluator {
    /// Runs every stage of `pipeline` over `documents`, in order.
    pub fn run(documents: Vec<Document>, pipeline: &[Document]) -> ProviderResult<Vec<Document>> {
        pipeline
            .iter()
            .try_fold(documents, |documents, stage| Self::apply(documents, stage))
    }

    /// Returns whether `document` satisfies `filter`.
    pub fn matches(document: &Document, filter: &Document) -> ProviderResult<bool> {
        for (field, expected) in filter {
            if field == "$expr" {
                match expected {
                    Bson::Boolean(value) => {
                        if !value {
                            return Ok(false);
                        }
                    }
                    other => return Err(rejected(format!("unsupported $expr {other}"))),
                }
                continue;
            }

            if field.starts_with('$') {
                return Err(rejected(format!("unsupported query operator {field}")));
            }

            if let Bson::Document(inner) = expected {
                if inner.keys().any(|key| key.starts_with('$')) {
                    return Err(rejected(format!("unsupported operator on field {field}")));
                }
            }

            if document.get(field) != Some(expected) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn apply(documents: Vec<Document>, stage: &Document) -> ProviderResult<Vec<Document>> {
        let mut entries = stage.iter();
        let (Some((name, spec)), None) = (entries.next(), entries.next()) else {
            return Err(rejected("a stage must have exactly one field"));
        };

        match name.as_str() {
            "$match" => {
                let filter = spec
                    .as_document()
                    .ok_or_else(|| rejected("$match expects a document"))?;

                let mut matched = Vec::with_capacity(documents.len());
                for document in documents {
                    if Self::matches(&document, filter)? {
                        matched.push(document);
                    }
                }
                Ok(matched)
            }
            "$skip" => {
                let skip = Self::count_argument(name, spec)?;
                Ok(documents.into_iter().skip(skip).collect())
            }
            "$limit" => match Self::count_argument(name, spec)? {
                0 => Err(rejected("the limit must be positive")),
                limit => Ok(documents.into_iter().take(limit).collect()),
            },
            "$count" => {
                let field = spec
                    .as_str()
                    .ok_or_else(|| rejected("$count expects a field name"))?;

                if documents.is_empty() {
                    return Ok(Vec::new());
                }

                let count = match i32::try_from(documents.len()) {
                    Ok(n) => Bson::Int32(n),
                    Err(_) => Bson::Int64(documents.len() as i64),
                };

                let mut result = Document::new();
                result.insert(field, count);
                Ok(vec![result])
            }
            "$facet" => {
                let facets = spec
                    .as_document()
                    .ok_or_else(|| rejected("$facet expects a document"))?;

                let mut result = Document::new();
                for (facet, sub_pipeline) in facets {
                    let stages = sub_pipeline
                        .as_array()
                        .ok_or_else(|| rejected(format!("facet {facet} expects an array")))?
                        .iter()
                        .map(|stage| {
                            stage
                                .as_document()
                                .cloned()
                                .ok_or_else(|| rejected(format!("facet {facet} expects stages")))
                        })
                        .collect::<ProviderResult<Vec<_>>>()?;

                    let output = Self::run(documents.clone(), &stages)?;
                    result.insert(
                        facet.clone(),
                        Bson::Array(output.into_iter().map(Bson::Document).collect()),
                    );
                }
                Ok(vec![result])
            }
            "$project" => {
                let projection = spec
                    .as_document()
                    .ok_or_else(|| rejected("$project expects a document"))?;

                documents
                    .iter()
                    .map(|document| Self::project(document, projection))
                    .collect()
            }
            other => Err(rejected(format!("unsupported stage {other}"))),
        }
    }

    fn count_argument(name: &str, spec: &Bson) -> ProviderResult<usize> {
        let value = match spec {
            Bson::Int32(n) => i64::from(*n),
            Bson::Int64(n) => *n,
            _ => return Err(rejected(format!("{name} expects an integer"))),
        };

        usize::try_from(value).map_err(|_| rejected(format!("{name} must not be negative")))
    }

    fn project(document: &Document, projection: &Document) -> ProviderResult<Document> {
        let mut result = Document::new();

        if !projection.contains_key("_id") {
            if let Some(id) = document.get("_id") {
                result.insert("_id", id.clone());
            }
        }

        for (field, spec) in projection {
            match spec {
                Bson::Boolean(true) => Self::include(document, field, &mut result),
                Bson::Int32(n) if *n != 0 => Self::include(document, field, &mut result),
                Bson::Int64(n) if *n != 0 => Self::include(document, field, &mut result),
                Bson::Boolean(false) | Bson::Int32(0) | Bson::Int64(0) if field == "_id" => {}
                Bson::Boolean(false) | Bson::Int32(_) | Bson::Int64(_) => {
                    return Err(rejected(format!("cannot exclude {field} in an inclusion projection")));
                }
                expression => {
                    if let Some(value) = Self::evaluate(document, expression)? {
                        result.insert(field.clone(), value);
                    }
                }
            }
        }

        Ok(result)
    }

    fn include(document: &Document, field: &str, result: &mut Document) {
        if let Some(value) = document.get(field) {
            result.insert(field, value.clone());
        }
    }

    /// Evaluates an expression; `None` means the value is missing.
    fn evaluate(document: &Document, expression: &Bson) -> ProviderResult<Option<Bson>> {
        match expression {
            Bson::String(path) if path.starts_with('$') => {
                let segments = path[1..].split('.').collect::<Vec<_>>();
                Ok(Self::resolve(&Bson::Document(document.clone()), &segments))
            }
            Bson::Document(operator) if operator.keys().any(|key| key.starts_with('$')) => {
                match operator.get("$arrayElemAt") {
                    Some(Bson::Array(args)) if args.len() == 2 && operator.len() == 1 => {
                        Self::array_elem_at(document, &args[0], &args[1])
                    }
                    _ => Err(rejected(format!("unsupported expression {operator}"))),
                }
            }
            literal => Ok(Some(literal.clone())),
        }
    }

    fn array_elem_at(document: &Document, array: &Bson, index: &Bson) -> ProviderResult<Option<Bson>> {
        let index = match Self::evaluate(document, index)? {
            Some(Bson::Int32(n)) => i64::from(n),
            Some(Bson::Int64(n)) => n,
            _ => return Err(rejected("$arrayElemAt expects an integer index")),
        };

        match Self::evaluate(document, array)? {
            None | Some(Bson::Null) => Ok(Some(Bson::Null)),
            Some(Bson::Array(items)) => {
                let position = if index < 0 {
                    items.len() as i64 + index
                } else {
                    index
                };

                Ok(usize::try_from(position)
                    .ok()
                    .and_then(|position| items.get(position))
                    .cloned())
            }
            Some(other) => Err(rejected(format!("$arrayElemAt expects an array, got {other}"))),
        }
    }

    /// Follows a dotted path, traversing arrays of documents element-wise.
    fn resolve(value: &Bson, segments: &[&str]) -> Option<Bson> {
        let Some((head, rest)) = segments.split_first() else {
            return Some(value.clone());
        };

        match value {
            Bson::Document(document) => document
                .get(*head)
                .and_then(|inner| Self::resolve(inner, rest)),
            Bson::Array(items) => Some(Bson::Array(
                items
                    .iter()
                    .filter(|item| matches!(item, Bson::Document(_)))
                    .filter_map(|item| Self::resolve(item, segments))
                    .collect(),
            )),
            _ => None,
        }
    }
}
