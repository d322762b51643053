//! Collection naming conventions.
//!
//! Resource types are addressed by short names such as `Book` or `BookReview`; the store
//! keeps them in collections such as `books` and `book_reviews`. An [`Inflector`] performs
//! that translation and can be swapped per provider.

use std::fmt::Debug;

/// Derives a storage collection name from a resource short name.
///
/// Implementations must be pure and total: every input produces some output.
pub trait Inflector: Send + Sync + Debug {
    /// Converts a short name into a collection name.
    fn tableize(&self, short_name: &str) -> String;
}

/// The default convention: snake_case, lower-cased, with the last word pluralized.
///
/// # Example
///
/// ```ignore
/// use docstate_core::naming::{DefaultInflector, Inflector};
///
/// assert_eq!(DefaultInflector.tableize("Book"), "books");
/// assert_eq!(DefaultInflector.tableize("BookReview"), "book_reviews");
/// assert_eq!(DefaultInflector.tableize("Category"), "categories");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInflector;

impl DefaultInflector {
    const UNCOUNTABLE: [&'static str; 16] = [
        "audio", "data", "deer", "equipment", "feedback", "fish", "information", "media",
        "metadata", "money", "moose", "news", "rice", "series", "sheep", "species",
    ];

    const IRREGULAR: [(&'static str, &'static str); 21] = [
        ("person", "people"),
        ("man", "men"),
        ("woman", "women"),
        ("child", "children"),
        ("tooth", "teeth"),
        ("foot", "feet"),
        ("mouse", "mice"),
        ("goose", "geese"),
        ("ox", "oxen"),
        ("criterion", "criteria"),
        ("knife", "knives"),
        ("wife", "wives"),
        ("life", "lives"),
        ("leaf", "leaves"),
        ("half", "halves"),
        ("wolf", "wolves"),
        ("shelf", "shelves"),
        ("thief", "thieves"),
        ("hero", "heroes"),
        ("potato", "potatoes"),
        ("tomato", "tomatoes"),
    ];

    /// Splits camel-cased words with underscores and lower-cases ASCII letters.
    ///
    /// Characters other than ASCII letters are copied through unchanged.
    pub fn underscore(input: &str) -> String {
        let chars = input.chars().collect::<Vec<_>>();
        let mut output = String::with_capacity(input.len() + 4);

        for (i, &c) in chars.iter().enumerate() {
            if c.is_ascii_uppercase() && i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars
                    .get(i + 1)
                    .is_some_and(|n| n.is_ascii_lowercase());

                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower)
                {
                    output.push('_');
                }
            }
            output.push(c.to_ascii_lowercase());
        }

        output
    }

    /// Pluralizes the trailing run of ASCII letters, leaving any prefix untouched.
    pub fn pluralize(input: &str) -> String {
        let start = input
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_alphabetic())
            .last()
            .map(|(i, _)| i);

        let Some(start) = start else {
            return input.to_string();
        };

        let (prefix, word) = input.split_at(start);
        format!("{prefix}{}", Self::pluralize_word(word))
    }

    fn pluralize_word(word: &str) -> String {
        let lower = word.to_ascii_lowercase();

        if Self::UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_string();
        }

        if let Some((_, plural)) = Self::IRREGULAR
            .iter()
            .find(|(singular, _)| *singular == lower)
        {
            return plural.to_string();
        }

        if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        {
            return format!("{word}es");
        }

        let mut tail = lower.chars().rev();
        if let (Some('y'), Some(before)) = (tail.next(), tail.next()) {
            if !"aeiou".contains(before) {
                return format!("{}ies", &word[..word.len() - 1]);
            }
        }

        format!("{word}s")
    }
}

impl Inflector for DefaultInflector {
    fn tableize(&self, short_name: &str) -> String {
        Self::pluralize(&Self::underscore(short_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tableize_simple_names() {
        assert_eq!(DefaultInflector.tableize("Book"), "books");
        assert_eq!(DefaultInflector.tableize("book"), "books");
        assert_eq!(DefaultInflector.tableize("Category"), "categories");
        assert_eq!(DefaultInflector.tableize("Day"), "days");
        assert_eq!(DefaultInflector.tableize("Box"), "boxes");
        assert_eq!(DefaultInflector.tableize("Status"), "statuses");
        assert_eq!(DefaultInflector.tableize("Match"), "matches");
    }

    #[test]
    fn test_tableize_compound_names() {
        assert_eq!(DefaultInflector.tableize("BookReview"), "book_reviews");
        assert_eq!(DefaultInflector.tableize("HTMLPage"), "html_pages");
        assert_eq!(DefaultInflector.tableize("SalesPerson"), "sales_people");
        assert_eq!(DefaultInflector.tableize("Book2Author"), "book2_authors");
    }

    #[test]
    fn test_tableize_irregular_and_uncountable() {
        assert_eq!(DefaultInflector.tableize("Person"), "people");
        assert_eq!(DefaultInflector.tableize("Child"), "children");
        assert_eq!(DefaultInflector.tableize("Leaf"), "leaves");
        assert_eq!(DefaultInflector.tableize("Sheep"), "sheep");
        assert_eq!(DefaultInflector.tableize("News"), "news");
    }

    #[test]
    fn test_tableize_passes_through_other_characters() {
        assert_eq!(DefaultInflector.tableize(""), "");
        assert_eq!(DefaultInflector.tableize("v2"), "v2");
        assert_eq!(DefaultInflector.tableize("book-item"), "book-items");
        assert_eq!(DefaultInflector.tableize("Café"), "café");
    }
}
