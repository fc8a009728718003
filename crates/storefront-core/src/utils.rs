//! Utility functions shared by the client and the relay

use crate::{Error, Result};

/// URL slug for a customer's detail page
///
/// Runs of whitespace become a single `-` and the result is lowercased.
#[must_use]
pub fn customer_slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Whether `slug` addresses the customer called `name`
#[must_use]
pub fn slug_matches(slug: &str, name: &str) -> bool {
    !slug.is_empty() && customer_slug(name) == slug.to_lowercase()
}

/// Presence check for a required form field
///
/// # Errors
///
/// Returns a validation error when `value` is empty or only whitespace.
pub fn require_present<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        tracing::debug!(field, "Required field is empty");
        return Err(Error::validation(field, format!("{} is required", capitalize(field))));
    }
    Ok(trimmed)
}

/// Parse a price typed as a plain number or a currency-formatted string
///
/// Currency symbols, letters and thousands separators are ignored, so
/// `"₦15,000"`, `"NGN 15000"` and `"15000.00"` all parse.
///
/// # Errors
///
/// Returns a validation error on `price` when no number can be read.
pub fn parse_price(text: &str) -> Result<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();

    digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::validation("price", "Valid price is required"))
}

/// Join a base URL and path segments with exactly one slash between them
///
/// Empty segments are skipped, which lets callers pass an optional
/// trailing identifier as `""`.
#[must_use]
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Taskane Marina", "taskane-marina")]
    #[case("  Ada   Obi  ", "ada-obi")]
    #[case("Single", "single")]
    #[case("", "")]
    fn test_customer_slug(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(customer_slug(name), expected);
    }

    #[test]
    fn test_slug_matches() {
        assert!(slug_matches("taskane-marina", "Taskane Marina"));
        assert!(slug_matches("Taskane-Marina", "taskane  marina"));
        assert!(!slug_matches("taskane", "Taskane Marina"));
        assert!(!slug_matches("", ""));
    }

    #[test]
    fn test_require_present() {
        assert_eq!(require_present("name", "  Soap ").unwrap(), "Soap");

        let err = require_present("description", "   ").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation error: description - Description is required"
        );
    }

    #[rstest]
    #[case("15000", 15000.0)]
    #[case("₦15,000", 15000.0)]
    #[case("NGN 2,499.50", 2499.5)]
    #[case("0", 0.0)]
    fn test_parse_price(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_price(text).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("free")]
    #[case("1.2.3")]
    fn test_parse_price_rejects(#[case] text: &str) {
        let err = parse_price(text).unwrap_err();
        assert!(err.is_validation());
    }

    #[rstest]
    #[case("https://api.example.com/v1/", &["all/products"], "https://api.example.com/v1/all/products")]
    #[case("https://api.example.com/v1", &["/all/orders/", "a1"], "https://api.example.com/v1/all/orders/a1")]
    #[case("https://api.example.com/v1", &["all/category", ""], "https://api.example.com/v1/all/category")]
    #[case("https://api.example.com", &[], "https://api.example.com")]
    fn test_join_url(#[case] base: &str, #[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(join_url(base, segments), expected);
    }
}
