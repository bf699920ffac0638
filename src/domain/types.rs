//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! trimmed non-empty names, normalized codes) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided number could not be parsed.
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// Macro to generate lightweight newtypes for positive backend identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(CompanyId, "Unique identifier for a company.");
id_newtype!(LocationId, "Unique identifier for a location.");
id_newtype!(MachineId, "Unique identifier for a machine.");
id_newtype!(ProductId, "Unique identifier for a product.");
id_newtype!(UserId, "Unique identifier for a backend user.");
id_newtype!(TemplateId, "Unique identifier for a QC form template.");
id_newtype!(SectionId, "Unique identifier for a QC form section.");
id_newtype!(FieldId, "Unique identifier for a QC form field.");
id_newtype!(RecordId, "Unique identifier for a QC form record.");
id_newtype!(TaskId, "Unique identifier for a task assignment.");

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    EntityName,
    "Display name of a master-data record enforcing non-empty values."
);

non_empty_string_newtype!(
    FieldLabel,
    "Control point label enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    RejectionReason,
    "Reason entered by a reviewer when rejecting a QC record."
);

non_empty_string_newtype!(Username, "Login name enforcing non-empty values.");

/// Master-data code, trimmed and upper-cased.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityCode(String);

impl EntityCode {
    /// Trims, upper-cases and rejects empty codes.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner();
        Ok(Self(inner.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for EntityCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for EntityCode {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses an optional numeric text input; blank input means "absent".
pub fn parse_optional_number(raw: &str) -> Result<Option<f64>, TypeConstraintError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    // Accept a decimal comma as typed on Turkish keyboards.
    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(TypeConstraintError::InvalidNumber(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(MachineId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(RecordId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(TemplateId::new(7).map(TemplateId::get), Ok(7));
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let id = CompanyId::new(12).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        let parsed: CompanyId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn entity_name_trims_and_rejects_blank() {
        assert_eq!(EntityName::new("  Press 1 ").unwrap().as_str(), "Press 1");
        assert_eq!(EntityName::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn entity_code_is_trimmed_and_upper_cased() {
        assert_eq!(EntityCode::new(" mk-01 ").unwrap().as_str(), "MK-01");
        assert_eq!(EntityCode::new("hat 2").unwrap().as_str(), "HAT 2");
        assert_eq!(EntityCode::new(""), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            Email::new(" Operator@Example.COM ").unwrap().as_str(),
            "operator@example.com"
        );
        assert_eq!(Email::new("nope"), Err(TypeConstraintError::InvalidEmail));
    }

    #[test]
    fn optional_number_parsing() {
        assert_eq!(parse_optional_number(""), Ok(None));
        assert_eq!(parse_optional_number(" 12.5 "), Ok(Some(12.5)));
        assert_eq!(parse_optional_number("3,2"), Ok(Some(3.2)));
        assert!(parse_optional_number("abc").is_err());
    }
}
