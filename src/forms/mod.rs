//! Form definitions backing the console routes.
//!
//! Each form is deserialized from the posted body, checked with `validator`
//! and converted into the matching backend request via `TryFrom`, so invalid
//! input never reaches the backend.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod master_data;
pub mod qc_entry;
pub mod qc_record;
pub mod qc_template;
pub mod settings;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("`{0}` is required")]
    Required(&'static str),

    #[error("invalid `{field}`: {source}")]
    Invalid {
        field: &'static str,
        source: TypeConstraintError,
    },

    #[error("invalid id for `{0}`")]
    InvalidId(&'static str),

    #[error("malformed form body: {0}")]
    Malformed(String),
}

impl FormError {
    /// Catalog key of the message shown to the user.
    pub fn message_key(&self) -> &'static str {
        match self {
            FormError::Required(_) | FormError::Validation(_) => "form_required_fields",
            FormError::Invalid { .. } | FormError::InvalidId(_) => "form_invalid_values",
            FormError::Malformed(_) => "form_invalid_values",
        }
    }
}

/// HTML checkboxes post `on` when ticked and nothing otherwise.
pub(crate) fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v, "on" | "true" | "1"))
}

/// Trims the text and maps blank input to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a required id posted as text.
pub(crate) fn parse_id<T>(field: &'static str, raw: &str) -> Result<T, FormError>
where
    T: TryFrom<i64, Error = TypeConstraintError>,
{
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| T::try_from(id).ok())
        .ok_or(FormError::InvalidId(field))
}

/// Parses an optional id posted as text; blank means none.
pub(crate) fn parse_optional_id<T>(field: &'static str, raw: Option<&str>) -> Result<Option<T>, FormError>
where
    T: TryFrom<i64, Error = TypeConstraintError>,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse_id(field, raw).map(Some),
        None => Ok(None),
    }
}
