//! Page type returned by listing operations.
//!
//! A [`Page`] is a bounded window of results together with the total number of documents
//! matching the listing, independent of the window.

use serde::{Deserialize, Serialize};

/// A single page of listing results.
///
/// # Type Parameters
///
/// * `T` - The type of items contained in this page
///
/// # Example
///
/// ```ignore
/// use docstate_core::page::Page;
///
/// let page: Page<String> = Page::builder(vec!["item1".to_string()])
///     .with_total(100)
///     .with_limit(10)
///     .with_offset(20)
///     .build();
///
/// assert_eq!(page.current_page(), 3);
/// assert_eq!(page.last_page(), 10);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items contained in this page.
    pub items: Vec<T>,
    /// Total count of matching documents across all pages.
    pub total: u64,
    /// Maximum number of items requested for this page.
    pub limit: usize,
    /// Number of matching documents skipped before this page.
    pub offset: usize,
}

impl<T> Page<T> {
    /// Creates a new builder for constructing a page.
    pub fn builder(items: Vec<T>) -> PageBuilder<T> {
        PageBuilder::new(items)
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the requested page size.
    pub fn items_per_page(&self) -> usize {
        self.limit
    }

    /// Returns the 1-indexed number of this page.
    pub fn current_page(&self) -> usize {
        if self.limit == 0 {
            return 1;
        }

        self.offset / self.limit + 1
    }

    /// Returns the 1-indexed number of the last page, which is 1 for an empty listing.
    pub fn last_page(&self) -> usize {
        if self.limit == 0 || self.total == 0 {
            return 1;
        }

        usize::try_from(self.total.div_ceil(self.limit as u64)).unwrap_or(usize::MAX)
    }

    /// Returns the next page number (if more pages exist).
    pub fn next_page(&self) -> Option<usize> {
        let current = self.current_page();
        (current < self.last_page()).then_some(current + 1)
    }

    /// Returns the previous page number (if this is not the first page).
    pub fn previous_page(&self) -> Option<usize> {
        let current = self.current_page();
        (current > 1).then_some(current - 1)
    }

    /// Transforms every item, keeping the window metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            limit: 0,
            offset: 0,
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Builder for constructing [`Page`] instances with fluent API.
pub struct PageBuilder<T> {
    items: Vec<T>,
    total: u64,
    limit: usize,
    offset: usize,
}

impl<T> PageBuilder<T> {
    /// Creates a new builder with the given items.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total: 0,
            limit: 0,
            offset: 0,
        }
    }

    /// Sets the total count of matching documents.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    /// Sets the requested page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the number of skipped documents.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Builds and returns the final [`Page`] instance.
    pub fn build(self) -> Page<T> {
        Page {
            items: self.items,
            total: self.total,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(len: usize, total: u64, limit: usize, offset: usize) -> Page<usize> {
        Page::builder((0..len).collect())
            .with_total(total)
            .with_limit(limit)
            .with_offset(offset)
            .build()
    }

    #[test]
    fn test_page_navigation() {
        let first = page(2, 3, 2, 0);
        assert_eq!(first.current_page(), 1);
        assert_eq!(first.last_page(), 2);
        assert_eq!(first.next_page(), Some(2));
        assert_eq!(first.previous_page(), None);

        let second = page(1, 3, 2, 2);
        assert_eq!(second.current_page(), 2);
        assert_eq!(second.next_page(), None);
        assert_eq!(second.previous_page(), Some(1));
    }

    #[test]
    fn test_empty_and_zero_limit_pages() {
        let empty = page(0, 0, 10, 0);
        assert_eq!(empty.last_page(), 1);
        assert_eq!(empty.next_page(), None);

        let zero = page(0, 5, 0, 0);
        assert_eq!(zero.current_page(), 1);
        assert_eq!(zero.last_page(), 1);
    }

    #[test]
    fn test_map_keeps_window() {
        let mapped = page(2, 7, 2, 4).map(|i| i * 10);
        assert_eq!(mapped.items, vec![0, 10]);
        assert_eq!(mapped.total, 7);
        assert_eq!(mapped.offset, 4);
        assert_eq!(mapped.items_per_page(), 2);
    }
}
