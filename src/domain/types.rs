//! Strongly-typed value objects used by domain entities.
//!
//! Every wrapper checks its invariant once at construction (positive ids,
//! lower-cased e-mails, E.164 phones, trimmed names) so code past the form
//! layer never re-validates.
use std::fmt::{Display, Formatter};
use std::{ops::Deref, str::FromStr};

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidateEmail;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    #[error("id must be greater than zero")]
    NonPositiveId,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("value cannot be empty")]
    EmptyString,
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("amount cannot be negative")]
    NegativeAmount,
    #[error("invalid uuid value")]
    InvalidUuid,
}

fn non_empty(value: String) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    Ok(trimmed.to_string())
}

fn normalize_email(value: String) -> Result<String, TypeConstraintError> {
    let normalized = value.trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Parses any dialable form (`+1 (512) 555-0100`, `+15125550100`) into E.164.
fn normalize_phone(value: String) -> Result<String, TypeConstraintError> {
    let trimmed = non_empty(value)?;
    let parsed = parse(None, &trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Email bodies keep safe markup only; an empty result after cleaning is rejected.
fn sanitize_body(value: String) -> Result<String, TypeConstraintError> {
    non_empty(ammonia::clean(&value))
}

macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Fails with [`TypeConstraintError::NonPositiveId`] for zero or negative ids.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(HubId, "Tenant a record belongs to.");
id_newtype!(UserId, "Agent or lender.");
id_newtype!(PersonId, "Lead or contact.");
id_newtype!(DealId, "Deal in the pipeline.");
id_newtype!(DealStageId, "Pipeline stage.");
id_newtype!(DealTypeId, "Deal category such as buyer or seller.");
id_newtype!(CallId, "Logged call.");
id_newtype!(EmailId, "Logged email.");
id_newtype!(AppointmentId, "Scheduled appointment.");
id_newtype!(PondId, "Shared lead pond.");
id_newtype!(TeamId, "Agent team.");
id_newtype!(LeadFlowRuleId, "Lead routing rule.");

/// Declares a `String` wrapper whose constructor runs `$check`.
macro_rules! validated_string {
    ($name:ident, $check:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                $check(value.into()).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

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
                f.write_str(&self.0)
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

validated_string!(UserEmail, normalize_email, "Login address of an agent or lender.");
validated_string!(PersonEmail, normalize_email, "Contact address of a person.");
validated_string!(PhoneNumber, normalize_phone, "Phone number in E.164 form.");
validated_string!(UserName, non_empty, "Agent or lender display name.");
validated_string!(PersonName, non_empty, "Full name of a lead or contact.");
validated_string!(DealName, non_empty, "Deal title.");
validated_string!(CategoryName, non_empty, "Deal stage or deal type label.");
validated_string!(GroupName, non_empty, "Pond or team name.");
validated_string!(RuleName, non_empty, "Lead flow rule name.");
validated_string!(EmailSubject, non_empty, "Subject line of a logged email.");
validated_string!(AppointmentTitle, non_empty, "Appointment title.");
validated_string!(EmailBody, sanitize_body, "Sanitized HTML body of a logged email.");

/// Non-negative whole-currency amount (prices, commissions).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value < 0 {
            return Err(TypeConstraintError::NegativeAmount);
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Amount {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// Opaque person identifier that is safe to hand to other systems.
///
/// Stored as a 16-byte blob in the `people` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicId(Uuid);

impl PublicId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeConstraintError> {
        Uuid::from_slice(bytes)
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidUuid)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Display for PublicId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PublicId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidUuid)
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(PersonId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(DealId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        let email = PersonEmail::new("  Jane.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
        assert_eq!(
            UserEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn phones_are_normalized_to_e164() {
        let phone = PhoneNumber::new("+1 (512) 555-0100").unwrap();
        assert_eq!(phone.as_str(), "+15125550100");
        assert_eq!(PhoneNumber::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(PhoneNumber::new("call me"), Err(TypeConstraintError::InvalidPhone));
    }

    #[test]
    fn email_body_drops_scripts() {
        let body = EmailBody::new("<p>Hi</p><script>alert(1)</script>").unwrap();
        assert_eq!(body.as_str(), "<p>Hi</p>");
        assert_eq!(
            EmailBody::new("<script>alert(1)</script>"),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn amounts_reject_negatives() {
        assert_eq!(Amount::new(-1), Err(TypeConstraintError::NegativeAmount));
        assert_eq!(Amount::new(0).unwrap().get(), 0);
    }

    #[test]
    fn public_id_survives_blob_storage() {
        let id = PublicId::new();
        assert_eq!(PublicId::from_bytes(id.as_bytes()), Ok(id));
        assert_eq!(
            PublicId::from_bytes(&[1, 2, 3]),
            Err(TypeConstraintError::InvalidUuid)
        );
    }
}
