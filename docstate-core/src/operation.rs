//! Request-side inputs handed to the providers.
//!
//! An [`Operation`] describes the resource type being read, [`UriVariables`] carries the
//! identifier components extracted from the request path, and [`RequestContext`] carries
//! request-scoped hints such as pagination parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend-specific options attached to an operation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StateOptions {
    /// Explicit collection name. When set, the inflector is bypassed.
    pub collection: Option<String>,
}

impl StateOptions {
    /// Creates state options targeting the given collection.
    pub fn collection(name: impl Into<String>) -> Self {
        Self { collection: Some(name.into()) }
    }
}

/// Per-operation pagination overrides.
///
/// Unset fields fall back to the pagination policy's own options.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PaginationOverrides {
    /// Default number of items per page for this operation.
    pub items_per_page: Option<usize>,
    /// Upper bound for client-requested page sizes.
    pub maximum_items_per_page: Option<usize>,
    /// Whether clients may choose the page size.
    pub client_items_per_page: Option<bool>,
}

/// Describes the resource type an operation reads.
///
/// # Example
///
/// ```ignore
/// use docstate_core::operation::{Operation, StateOptions};
///
/// let operation = Operation::of::<Book>("Book");
/// assert_eq!(operation.short_name(), "Book");
///
/// let archived = Operation::of::<Book>("Book")
///     .with_state_options(StateOptions::collection("archived_books"));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Operation {
    class: String,
    short_name: String,
    state_options: Option<StateOptions>,
    pagination: PaginationOverrides,
}

impl Operation {
    /// Creates an operation for the given class name and short name.
    pub fn new(class: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            short_name: short_name.into(),
            state_options: None,
            pagination: PaginationOverrides::default(),
        }
    }

    /// Creates an operation whose class is the Rust type name of `T`.
    pub fn of<T>(short_name: impl Into<String>) -> Self {
        Self::new(std::any::type_name::<T>(), short_name)
    }

    /// Attaches backend-specific state options.
    pub fn with_state_options(mut self, options: StateOptions) -> Self {
        self.state_options = Some(options);
        self
    }

    /// Replaces the pagination overrides.
    pub fn with_pagination(mut self, pagination: PaginationOverrides) -> Self {
        self.pagination = pagination;
        self
    }

    /// Returns the name of the target type.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns the short name used to derive the collection name.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Returns the state options, if any were attached.
    pub fn state_options(&self) -> Option<&StateOptions> {
        self.state_options.as_ref()
    }

    /// Returns the pagination overrides.
    pub fn pagination(&self) -> &PaginationOverrides {
        &self.pagination
    }
}

/// Ordered identifier components extracted from a resource path.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UriVariables(Vec<(String, String)>);

impl UriVariables {
    /// Creates an empty set of URI variables.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a variable, keeping insertion order.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first variable.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(_, value)| value.as_str())
    }

    /// Returns the value of the named variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UriVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect()
        )
    }
}

/// Opaque request-scoped hints, passed through to collaborators unmodified.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RequestContext(Map<String, Value>);

impl RequestContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets a top-level key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns a top-level value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a value from the `filters` map, where request query parameters live.
    pub fn filter(&self, name: &str) -> Option<&Value> {
        self.0
            .get("filters")
            .and_then(Value::as_object)
            .and_then(|filters| filters.get(name))
    }
}

impl From<Map<String, Value>> for RequestContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
