//! User record and the input shapes that create or change one
//!
//! # Example
//!
//! ```rust
//! use assette::models::{NewUser, UserField};
//! use validator::Validate;
//!
//! let ok = NewUser::new("Ann", "a@b.com");
//! assert!(ok.validate().is_ok());
//!
//! let short = NewUser::new("Al", "a@b.com");
//! assert!(short.validate().is_err());
//!
//! assert_eq!(UserField::Email.as_str(), "email");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::validation::ValidationError;

/// A persisted user row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Store-assigned primary key
    pub id: i64,

    /// Display name, at least three characters
    pub name: String,

    /// Free-form e-mail text, not format-checked
    pub email: String,
}

impl User {
    /// This record's values with one field replaced, ready for validation
    #[must_use]
    pub fn with_field(&self, field: UserField, value: impl Into<String>) -> NewUser {
        let value = value.into();
        match field {
            UserField::Name => NewUser::new(value, self.email.clone()),
            UserField::Email => NewUser::new(self.name.clone(), value),
        }
    }
}

/// Values for a user that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewUser {
    /// Display name
    #[validate(
        length(min = 3, message = "Must be 3 or more characters"),
        custom(function = "crate::validation::within_column_limit")
    )]
    pub name: String,

    /// E-mail text, may be empty
    #[serde(default)]
    #[validate(custom(function = "crate::validation::within_column_limit"))]
    pub email: String,
}

impl NewUser {
    /// Create a new user input
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Run the validation rules, converting failures into [`ValidationError`]
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any rule fails.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map_err(ValidationError::from)
    }
}

/// An editable column of [`User`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserField {
    /// The `name` column
    Name,
    /// The `email` column
    Email,
}

impl UserField {
    /// Column and form name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            other => Err(ValidationError::single(
                "field",
                format!("Unknown field: {other}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::NAME_TOO_SHORT;

    #[test]
    fn test_short_name_rejected_with_message() {
        let err = NewUser::new("Al", "a@b.com").check().unwrap_err();
        assert_eq!(err.field("name"), [NAME_TOO_SHORT.to_string()]);
        assert_eq!(err.message(), NAME_TOO_SHORT);
    }

    #[test]
    fn test_three_characters_accepted() {
        assert!(NewUser::new("Ann", "").check().is_ok());
        assert!(NewUser::new("Zoë", "z@x.io").check().is_ok());
    }

    #[test]
    fn test_multibyte_name_counts_characters() {
        // two characters, four bytes
        assert!(NewUser::new("éé", "").check().is_err());
    }

    #[test]
    fn test_long_email_rejected() {
        let err = NewUser::new("Ann", "e".repeat(256)).check().unwrap_err();
        assert!(err.field("name").is_empty());
        assert_eq!(err.field("email").len(), 1);
    }

    #[test]
    fn test_with_field_replaces_one_column() {
        let user = User {
            id: 7,
            name: "Ann".to_string(),
            email: "a@b.com".to_string(),
        };

        let candidate = user.with_field(UserField::Name, "Jo");
        assert_eq!(candidate, NewUser::new("Jo", "a@b.com"));

        let candidate = user.with_field(UserField::Email, "new@b.com");
        assert_eq!(candidate, NewUser::new("Ann", "new@b.com"));
        assert_eq!(user.email, "a@b.com");
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("name".parse::<UserField>().unwrap(), UserField::Name);
        assert_eq!("email".parse::<UserField>().unwrap(), UserField::Email);
        assert!("id".parse::<UserField>().is_err());
        assert_eq!(
            serde_json::from_str::<UserField>("\"email\"").unwrap(),
            UserField::Email
        );
    }
}
