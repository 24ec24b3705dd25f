//! Bodies for logging calls, emails and appointments against a person.

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::activity::{
    CallOutcome, EmailDirection, NewAppointment, NewCall, NewEmail, TimeSlot, UpdateAppointment,
};
use crate::domain::person::normalize_attribute;
use crate::domain::types::{
    AppointmentTitle, EmailBody, EmailSubject, HubId, PersonId, PhoneNumber, UserId,
};
use crate::forms::{FormError, optional};

#[derive(Debug, Deserialize, Validate)]
pub struct CallForm {
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub outcome: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub duration_seconds: i32,
    pub note: Option<String>,
}

impl CallForm {
    pub fn into_domain(
        self,
        hub_id: HubId,
        person_id: PersonId,
        user_id: UserId,
    ) -> Result<NewCall, FormError> {
        self.validate()?;
        Ok(NewCall {
            hub_id,
            person_id,
            user_id,
            phone: optional(self.phone, PhoneNumber::new)?,
            outcome: CallOutcome::from(self.outcome.trim()),
            duration_seconds: self.duration_seconds,
            note: normalize_attribute(self.note),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailForm {
    pub direction: String,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
}

impl EmailForm {
    pub fn into_domain(
        self,
        hub_id: HubId,
        person_id: PersonId,
        user_id: UserId,
    ) -> Result<NewEmail, FormError> {
        self.validate()?;
        Ok(NewEmail {
            hub_id,
            person_id,
            user_id,
            direction: EmailDirection::try_from(self.direction.as_str())?,
            subject: EmailSubject::new(self.subject).map_err(|_| FormError::InvalidName)?,
            body: EmailBody::new(self.body)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AppointmentForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub location: Option<String>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub outcome: Option<String>,
}

pub struct AppointmentPayload {
    pub title: AppointmentTitle,
    pub location: Option<String>,
    pub slot: TimeSlot,
    pub outcome: Option<String>,
}

impl TryFrom<AppointmentForm> for AppointmentPayload {
    type Error = FormError;

    fn try_from(form: AppointmentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            title: AppointmentTitle::new(form.title).map_err(|_| FormError::InvalidName)?,
            location: normalize_attribute(form.location),
            slot: TimeSlot::new(form.start_at, form.end_at)?,
            outcome: normalize_attribute(form.outcome),
        })
    }
}

impl AppointmentPayload {
    pub fn into_new(self, hub_id: HubId, person_id: PersonId, user_id: UserId) -> NewAppointment {
        NewAppointment {
            hub_id,
            person_id,
            user_id,
            title: self.title,
            location: self.location,
            slot: self.slot,
            outcome: self.outcome,
        }
    }

    pub fn into_update(self) -> UpdateAppointment {
        UpdateAppointment {
            title: self.title,
            location: self.location,
            slot: self.slot,
            outcome: self.outcome,
        }
    }
}

/// Page selection for activity timelines.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (HubId, PersonId, UserId) {
        (
            HubId::new(1).unwrap(),
            PersonId::new(2).unwrap(),
            UserId::new(3).unwrap(),
        )
    }

    #[test]
    fn call_outcome_is_mapped() {
        let form: CallForm =
            serde_json::from_str(r#"{"outcome": "NoAnswer", "duration_seconds": 0}"#).unwrap();
        let (hub, person, user) = ids();

        let call = form.into_domain(hub, person, user).unwrap();

        assert_eq!(call.outcome, CallOutcome::NoAnswer);
        assert!(call.phone.is_none());
    }

    #[test]
    fn email_body_is_sanitized() {
        let form: EmailForm = serde_json::from_str(
            r#"{"direction": "outgoing", "subject": "Offer", "body": "<p>Hi</p><script>x()</script>"}"#,
        )
        .unwrap();
        let (hub, person, user) = ids();

        let email = form.into_domain(hub, person, user).unwrap();

        assert_eq!(email.body.as_str(), "<p>Hi</p>");
        assert_eq!(email.direction, EmailDirection::Outgoing);
    }

    #[test]
    fn unknown_email_direction_is_rejected() {
        let form: EmailForm =
            serde_json::from_str(r#"{"direction": "up", "subject": "s", "body": "b"}"#).unwrap();
        let (hub, person, user) = ids();
        assert!(form.into_domain(hub, person, user).is_err());
    }

    #[test]
    fn appointment_cannot_end_before_start() {
        let form: AppointmentForm = serde_json::from_str(
            r#"{"title": "Showing", "start_at": "2025-05-01T10:00:00", "end_at": "2025-05-01T09:00:00"}"#,
        )
        .unwrap();
        assert!(matches!(
            AppointmentPayload::try_from(form),
            Err(FormError::InvalidValue(_))
        ));
    }
}
