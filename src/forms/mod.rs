//! Request bodies and query parameters accepted by the JSON API.
//!
//! Each form is deserialized as sent, checked with `validator`, then turned
//! into a payload of domain types with `TryFrom`.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod activities;
pub mod bulk;
pub mod deal_categories;
pub mod deals;
pub mod groups;
pub mod lead_flow_rules;
pub mod people;
pub mod reports;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing request data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid {0} id")]
    InvalidId(&'static str),

    #[error("{0}")]
    InvalidValue(String),

    #[error("no records selected")]
    EmptySelection,

    #[error("invalid CSV file: {0}")]
    Csv(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::EmptyString => FormError::InvalidName,
            other => FormError::InvalidValue(other.to_string()),
        }
    }
}

/// Maps an optional raw string through a constructor, treating blanks as absent.
pub(crate) fn optional<T, F>(value: Option<String>, build: F) -> Result<Option<T>, FormError>
where
    F: FnOnce(String) -> Result<T, TypeConstraintError>,
{
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(build(raw)?)),
        _ => Ok(None),
    }
}

/// Converts an optional raw id into its typed form.
pub(crate) fn optional_id<T, F>(
    value: Option<i32>,
    what: &'static str,
    build: F,
) -> Result<Option<T>, FormError>
where
    F: FnOnce(i32) -> Result<T, TypeConstraintError>,
{
    value
        .map(|id| build(id).map_err(|_| FormError::InvalidId(what)))
        .transpose()
}

/// Converts a list of raw ids, rejecting the whole list on the first bad one.
pub(crate) fn id_list<T, F>(values: &[i32], what: &'static str, build: F) -> Result<Vec<T>, FormError>
where
    F: Fn(i32) -> Result<T, TypeConstraintError>,
{
    values
        .iter()
        .map(|id| build(*id).map_err(|_| FormError::InvalidId(what)))
        .collect()
}
