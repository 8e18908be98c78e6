//! Input normalization and validation shared by the store and the API.
//!
//! Uniqueness of `(category, name)` is decided on the *name key*: the trimmed,
//! lower-cased name. The store persists the key next to the display name and
//! indexes it, so every lookup must go through [`name_key`].

use serde_json::Value;

use crate::error::{Error, Result};

/// Normalized key used for uniqueness, lookups, and ordering.
///
/// Uses full Unicode lower-casing so that `"Сталь"` and `"сталь"` collide.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim a required name, failing with [`Error::MissingName`] when blank.
pub fn require_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingName);
    }
    Ok(trimmed.to_string())
}

/// Validate an amount that is already numeric.
pub fn check_amount(value: f64, field: &str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidAmount(field.to_string()));
    }
    Ok(value)
}

/// Parse a loosely-typed JSON amount.
///
/// Accepts numbers and numeric strings (an empty string reads as 0).
/// Everything else is rejected with [`Error::InvalidAmount`] naming `field`.
pub fn parse_amount(value: &Value, field: &str) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    match number {
        Some(n) => check_amount(n, field),
        None => Err(Error::InvalidAmount(field.to_string())),
    }
}

/// Parse an optional amount where JSON `null` counts as absent.
pub fn parse_optional_amount(value: Option<&Value>, field: &str) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_amount(v, field).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_key_trims_and_lowercases() {
        assert_eq!(name_key("  Сталь "), "сталь");
        assert_eq!(name_key("COPPER Wire"), "copper wire");
        assert_eq!(name_key("сталь"), name_key("СТАЛЬ"));
    }

    #[test]
    fn test_require_name() {
        assert_eq!(require_name("  Bolt M8 ").unwrap(), "Bolt M8");
        assert!(matches!(require_name(""), Err(Error::MissingName)));
        assert!(matches!(require_name(" \t\n"), Err(Error::MissingName)));
    }

    #[test]
    fn test_check_amount() {
        assert_eq!(check_amount(0.0, "Amount").unwrap(), 0.0);
        assert_eq!(check_amount(12.5, "Amount").unwrap(), 12.5);
        assert!(matches!(
            check_amount(-0.1, "Weight"),
            Err(Error::InvalidAmount(f)) if f == "Weight"
        ));
        assert!(check_amount(f64::NAN, "Amount").is_err());
        assert!(check_amount(f64::INFINITY, "Amount").is_err());
    }

    #[test]
    fn test_parse_amount_numbers_and_strings() {
        assert_eq!(parse_amount(&json!(5), "Amount").unwrap(), 5.0);
        assert_eq!(parse_amount(&json!(2.25), "Amount").unwrap(), 2.25);
        assert_eq!(parse_amount(&json!(" 7 "), "Amount").unwrap(), 7.0);
        assert_eq!(parse_amount(&json!(""), "Amount").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        for bad in [json!("abc"), json!(-1), json!("-3"), json!(true), json!([1]), json!({})] {
            assert!(
                matches!(parse_amount(&bad, "Quantity"), Err(Error::InvalidAmount(ref f)) if f == "Quantity"),
                "expected rejection for {}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_optional_amount() {
        assert_eq!(parse_optional_amount(None, "Weight").unwrap(), None);
        assert_eq!(parse_optional_amount(Some(&Value::Null), "Weight").unwrap(), None);
        assert_eq!(
            parse_optional_amount(Some(&json!(3)), "Weight").unwrap(),
            Some(3.0)
        );
        assert!(parse_optional_amount(Some(&json!("x")), "Weight").is_err());
    }
}
