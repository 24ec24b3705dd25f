//! Activities logged against a person: calls, emails and appointments.

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AppointmentId, AppointmentTitle, CallId, EmailBody, EmailId, EmailSubject, HubId, PersonId,
    PhoneNumber, TypeConstraintError, UserId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CallOutcome {
    Connected,
    NoAnswer,
    LeftVoicemail,
    BadNumber,
    Other(String),
}

impl Display for CallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallOutcome::Connected => write!(f, "Connected"),
            CallOutcome::NoAnswer => write!(f, "NoAnswer"),
            CallOutcome::LeftVoicemail => write!(f, "LeftVoicemail"),
            CallOutcome::BadNumber => write!(f, "BadNumber"),
            CallOutcome::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CallOutcome {
    fn from(s: &str) -> Self {
        match s {
            "Connected" => CallOutcome::Connected,
            "NoAnswer" => CallOutcome::NoAnswer,
            "LeftVoicemail" => CallOutcome::LeftVoicemail,
            "BadNumber" => CallOutcome::BadNumber,
            _ => CallOutcome::Other(s.to_string()),
        }
    }
}

impl From<String> for CallOutcome {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Call {
    pub id: CallId,
    pub hub_id: HubId,
    pub person_id: PersonId,
    pub user_id: UserId,
    pub phone: Option<PhoneNumber>,
    pub outcome: CallOutcome,
    pub duration_seconds: i32,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewCall {
    pub hub_id: HubId,
    pub person_id: PersonId,
    pub user_id: UserId,
    pub phone: Option<PhoneNumber>,
    pub outcome: CallOutcome,
    pub duration_seconds: i32,
    pub note: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailDirection {
    Incoming,
    Outgoing,
}

impl EmailDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            EmailDirection::Incoming => "incoming",
            EmailDirection::Outgoing => "outgoing",
        }
    }
}

impl TryFrom<&str> for EmailDirection {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "incoming" => Ok(EmailDirection::Incoming),
            "outgoing" => Ok(EmailDirection::Outgoing),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown email direction `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Email {
    pub id: EmailId,
    pub hub_id: HubId,
    pub person_id: PersonId,
    pub user_id: UserId,
    pub direction: EmailDirection,
    pub subject: EmailSubject,
    pub body: EmailBody,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewEmail {
    pub hub_id: HubId,
    pub person_id: PersonId,
    pub user_id: UserId,
    pub direction: EmailDirection,
    pub subject: EmailSubject,
    pub body: EmailBody,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub hub_id: HubId,
    pub person_id: PersonId,
    pub user_id: UserId,
    pub title: AppointmentTitle,
    pub location: Option<String>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub outcome: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Time slot of an appointment; the end never precedes the start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    start_at: NaiveDateTime,
    end_at: NaiveDateTime,
}

impl TimeSlot {
    pub fn new(start_at: NaiveDateTime, end_at: NaiveDateTime) -> Result<Self, TypeConstraintError> {
        if end_at < start_at {
            return Err(TypeConstraintError::InvalidValue(
                "appointment ends before it starts".to_string(),
            ));
        }
        Ok(Self { start_at, end_at })
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.start_at
    }

    pub fn end_at(&self) -> NaiveDateTime {
        self.end_at
    }
}

#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub hub_id: HubId,
    pub person_id: PersonId,
    pub user_id: UserId,
    pub title: AppointmentTitle,
    pub location: Option<String>,
    pub slot: TimeSlot,
    pub outcome: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UpdateAppointment {
    pub title: AppointmentTitle,
    pub location: Option<String>,
    pub slot: TimeSlot,
    pub outcome: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn time_slot_rejects_reversed_range() {
        assert!(TimeSlot::new(at(10), at(9)).is_err());
        assert!(TimeSlot::new(at(10), at(10)).is_ok());
    }

    #[test]
    fn call_outcome_round_trips_through_strings() {
        assert_eq!(CallOutcome::from("NoAnswer"), CallOutcome::NoAnswer);
        assert_eq!(
            CallOutcome::from("Wrong person"),
            CallOutcome::Other("Wrong person".to_string())
        );
        assert_eq!(CallOutcome::LeftVoicemail.to_string(), "LeftVoicemail");
    }

    #[test]
    fn email_direction_parses_case_insensitively() {
        assert_eq!(
            EmailDirection::try_from(" Outgoing "),
            Ok(EmailDirection::Outgoing)
        );
        assert!(EmailDirection::try_from("sideways").is_err());
    }
}
