//! Validation rules applied before a user record is accepted
//!
//! The only user-facing rule is the minimum name length. Both text columns
//! also carry the 255-character column limit. Lengths are counted in Unicode
//! scalar values, never bytes.
//!
//! Rules are declared on [`NewUser`](crate::models::NewUser) with the
//! `validator` derive; this module holds the shared constants, the custom
//! column-limit check, and the [`ValidationError`] the rest of the crate
//! passes around.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Minimum accepted length of a user's name
pub const NAME_MIN_CHARS: usize = 3;

/// Maximum length of either text column
pub const COLUMN_MAX_CHARS: usize = 255;

/// Message shown when a name is shorter than [`NAME_MIN_CHARS`]
pub const NAME_TOO_SHORT: &str = "Must be 3 or more characters";

/// Message shown when a value exceeds [`COLUMN_MAX_CHARS`]
pub const VALUE_TOO_LONG: &str = "Must be 255 or fewer characters";

/// Custom `validator` function enforcing the column width
///
/// # Errors
///
/// Returns a `too_long` error when `value` has more than [`COLUMN_MAX_CHARS`]
/// characters.
pub fn within_column_limit(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().count() > COLUMN_MAX_CHARS {
        let mut error = validator::ValidationError::new("too_long");
        error.message = Some(Cow::Borrowed(VALUE_TOO_LONG));
        return Err(error);
    }
    Ok(())
}

/// A rejected record, with human-readable messages per field
///
/// Field order is stable (sorted by field name) so the first message is
/// deterministic for notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed: {}", summarize(.fields))]
pub struct ValidationError {
    /// Messages keyed by field name
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Build an error carrying a single message for one field
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), vec![message.into()]);
        Self { fields }
    }

    /// The message to surface in a notification
    #[must_use]
    pub fn message(&self) -> &str {
        self.fields
            .values()
            .flatten()
            .next()
            .map_or("Invalid input", String::as_str)
    }

    /// Messages for one field, empty when the field passed
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Self { fields }
    }
}

fn summarize(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_limit_counts_characters() {
        assert!(within_column_limit(&"a".repeat(COLUMN_MAX_CHARS)).is_ok());
        assert!(within_column_limit(&"é".repeat(COLUMN_MAX_CHARS)).is_ok());

        let err = within_column_limit(&"a".repeat(COLUMN_MAX_CHARS + 1)).unwrap_err();
        assert_eq!(err.code, "too_long");
        assert_eq!(err.message.as_deref(), Some(VALUE_TOO_LONG));
    }

    #[test]
    fn test_single_error_message() {
        let err = ValidationError::single("name", NAME_TOO_SHORT);
        assert_eq!(err.message(), NAME_TOO_SHORT);
        assert_eq!(err.field("name"), [NAME_TOO_SHORT.to_string()]);
        assert!(err.field("email").is_empty());
        assert_eq!(
            err.to_string(),
            "validation failed: name: Must be 3 or more characters"
        );
    }

    #[test]
    fn test_empty_error_has_fallback_message() {
        assert_eq!(ValidationError::default().message(), "Invalid input");
    }

    #[test]
    fn test_serializes_fields() {
        let err = ValidationError::single("name", NAME_TOO_SHORT);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["fields"]["name"][0], NAME_TOO_SHORT);
    }

    proptest! {
        #[test]
        fn prop_column_limit_matches_char_count(value in "\\PC{0,300}") {
            let accepted = within_column_limit(&value).is_ok();
            prop_assert_eq!(accepted, value.chars().count() <= COLUMN_MAX_CHARS);
        }
    }
}
