//! Pagination policies.
//!
//! A [`PaginationPolicy`] decides how many documents a listing returns and how many it
//! skips, given the operation and the request context. The default [`Pagination`] reads
//! page-number parameters from the context's `filters` map.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::{
    error::{ProviderError, ProviderResult},
    operation::{Operation, RequestContext},
};

/// Resolves the window of a listing request.
pub trait PaginationPolicy: Send + Sync + Debug {
    /// Returns the maximum number of items to return.
    fn limit(&self, operation: &Operation, context: &RequestContext) -> ProviderResult<usize>;

    /// Returns the number of matching documents to skip.
    fn offset(&self, operation: &Operation, context: &RequestContext) -> ProviderResult<usize>;
}

/// Configuration for the default [`Pagination`] policy.
///
/// Every field has a default, so partial configuration documents deserialize cleanly:
///
/// ```ignore
/// let options: PaginationOptions = serde_json::from_str(r#"{ "items_per_page": 10 }"#)?;
/// assert_eq!(options.page_parameter_name, "page");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PaginationOptions {
    /// Page size used when neither the operation nor the client chooses one.
    pub items_per_page: usize,
    /// Upper bound on a page size chosen by the client.
    pub maximum_items_per_page: Option<usize>,
    /// Whether clients may choose the page size through the request context.
    pub client_items_per_page: bool,
    /// Name of the filter carrying the 1-indexed page number.
    pub page_parameter_name: String,
    /// Name of the filter carrying the client-chosen page size.
    pub items_per_page_parameter_name: String,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            items_per_page: 30,
            maximum_items_per_page: None,
            client_items_per_page: false,
            page_parameter_name: "page".to_string(),
            items_per_page_parameter_name: "itemsPerPage".to_string(),
        }
    }
}

/// Page-number based pagination.
///
/// - limit: the operation's page size, else the configured default, replaced by the
///   client's choice when allowed; only the client's choice is clamped to the maximum
/// - offset: `(page - 1) * limit`; a zero limit only allows the first page
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    options: PaginationOptions,
}

impl Pagination {
    pub fn new(options: PaginationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PaginationOptions {
        &self.options
    }

    /// Returns the 1-indexed page requested through the context.
    pub fn page(&self, context: &RequestContext) -> ProviderResult<usize> {
        let name = &self.options.page_parameter_name;

        match context.filter(name) {
            None => Ok(1),
            Some(value) => match parse_count(value, name)? {
                0 => Err(ProviderError::Pagination("Page should not be less than 1".to_string())),
                page => Ok(page),
            },
        }
    }
}

impl PaginationPolicy for Pagination {
    fn limit(&self, operation: &Operation, context: &RequestContext) -> ProviderResult<usize> {
        let overrides = operation.pagination();
        let mut limit = overrides
            .items_per_page
            .unwrap_or(self.options.items_per_page);

        let client_items_per_page = overrides
            .client_items_per_page
            .unwrap_or(self.options.client_items_per_page);

        if client_items_per_page {
            let name = &self.options.items_per_page_parameter_name;
            if let Some(value) = context.filter(name) {
                limit = parse_count(value, name)?;

                if let Some(maximum) = overrides
                    .maximum_items_per_page
                    .or(self.options.maximum_items_per_page)
                {
                    limit = limit.min(maximum);
                }
            }
        }

        Ok(limit)
    }

    fn offset(&self, operation: &Operation, context: &RequestContext) -> ProviderResult<usize> {
        let page = self.page(context)?;
        let limit = self.limit(operation, context)?;

        if limit == 0 {
            return match page {
                1 => Ok(0),
                _ => Err(ProviderError::Pagination(
                    "Page should not be greater than 1 if limit is equal to 0".to_string(),
                )),
            };
        }

        (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ProviderError::Pagination("Page is out of range".to_string()))
    }
}

/// Reads a non-negative integer from a JSON number or numeric string.
fn parse_count(value: &Value, name: &str) -> ProviderResult<usize> {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n < 0 => Err(ProviderError::Pagination(format!(
            "\"{name}\" should not be negative"
        ))),
        Some(n) => usize::try_from(n)
            .map_err(|_| ProviderError::Pagination(format!("\"{name}\" is out of range"))),
        None => Err(ProviderError::Pagination(format!(
            "\"{name}\" should be an integer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::PaginationOverrides;
    use serde_json::json;

    fn context(filters: Value) -> RequestContext {
        RequestContext::new().with("filters", filters)
    }

    fn operation() -> Operation {
        Operation::new("Book", "Book")
    }

    #[test]
    fn test_defaults() {
        let pagination = Pagination::default();
        let ctx = RequestContext::new();
        assert_eq!(pagination.limit(&operation(), &ctx).unwrap(), 30);
        assert_eq!(pagination.offset(&operation(), &ctx).unwrap(), 0);
    }

    #[test]
    fn test_offset_from_page() {
        let pagination = Pagination::default();
        let ctx = context(json!({ "page": "3" }));
        assert_eq!(pagination.offset(&operation(), &ctx).unwrap(), 60);

        let ctx = context(json!({ "page": 2 }));
        assert_eq!(pagination.offset(&operation(), &ctx).unwrap(), 30);
    }

    #[test]
    fn test_client_items_per_page() {
        let ctx = context(json!({ "itemsPerPage": "5", "page": 2 }));

        let ignored = Pagination::default();
        assert_eq!(ignored.limit(&operation(), &ctx).unwrap(), 30);

        let allowed = Pagination::new(PaginationOptions {
            client_items_per_page: true,
            maximum_items_per_page: Some(50),
            ..PaginationOptions::default()
        });
        assert_eq!(allowed.limit(&operation(), &ctx).unwrap(), 5);
        assert_eq!(allowed.offset(&operation(), &ctx).unwrap(), 5);

        let too_many = context(json!({ "itemsPerPage": 500 }));
        assert_eq!(allowed.limit(&operation(), &too_many).unwrap(), 50);
    }

    #[test]
    fn test_operation_overrides() {
        let op = operation().with_pagination(PaginationOverrides {
            items_per_page: Some(2),
            ..PaginationOverrides::default()
        });
        let ctx = context(json!({ "page": 2 }));
        let pagination = Pagination::default();
        assert_eq!(pagination.limit(&op, &ctx).unwrap(), 2);
        assert_eq!(pagination.offset(&op, &ctx).unwrap(), 2);
    }

    fn zero_limit_operation() -> Operation {
        operation().with_pagination(PaginationOverrides {
            items_per_page: Some(0),
            ..PaginationOverrides::default()
        })
    }

    #[test]
    fn test_zero_limit_has_zero_offset() {
        let pagination = Pagination::default();
        let op = zero_limit_operation();

        assert_eq!(pagination.offset(&op, &RequestContext::new()).unwrap(), 0);
        assert_eq!(pagination.offset(&op, &context(json!({ "page": 1 }))).unwrap(), 0);
        assert!(matches!(
            pagination.offset(&op, &context(json!({ "page": 4 }))),
            Err(ProviderError::Pagination(_))
        ));
    }

    #[test]
    fn test_zero_limit_still_validates_page() {
        let pagination = Pagination::default();
        let op = zero_limit_operation();

        for page in [json!(0), json!("abc"), json!(-3)] {
            assert!(
                matches!(
                    pagination.offset(&op, &context(json!({ "page": page }))),
                    Err(ProviderError::Pagination(_))
                ),
                "page={page}"
            );
        }
    }

    #[test]
    fn test_maximum_only_caps_client_page_size() {
        let op = operation().with_pagination(PaginationOverrides {
            items_per_page: Some(100),
            ..PaginationOverrides::default()
        });
        let pagination = Pagination::new(PaginationOptions {
            client_items_per_page: true,
            maximum_items_per_page: Some(50),
            ..PaginationOptions::default()
        });

        assert_eq!(pagination.limit(&op, &RequestContext::new()).unwrap(), 100);
        assert_eq!(
            pagination.limit(&op, &context(json!({ "itemsPerPage": 80 }))).unwrap(),
            50
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let pagination = Pagination::default();

        let zero = context(json!({ "page": 0 }));
        assert!(matches!(
            pagination.offset(&operation(), &zero),
            Err(ProviderError::Pagination(_))
        ));

        let negative = context(json!({ "page": "-1" }));
        assert!(matches!(
            pagination.offset(&operation(), &negative),
            Err(ProviderError::Pagination(_))
        ));

        let garbage = context(json!({ "page": "abc" }));
        assert!(matches!(
            pagination.offset(&operation(), &garbage),
            Err(ProviderError::Pagination(_))
        ));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: PaginationOptions =
            serde_json::from_value(json!({ "items_per_page": 10 })).unwrap();
        assert_eq!(options.items_per_page, 10);
        assert_eq!(options.page_parameter_name, "page");
        assert!(!options.client_items_per_page);
    }
}
