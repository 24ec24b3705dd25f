//! Diesel models for calls, emails and appointments.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::activity::{
    Appointment as DomainAppointment, Call as DomainCall, CallOutcome, Email as DomainEmail,
    EmailDirection, NewAppointment as DomainNewAppointment, NewCall as DomainNewCall,
    NewEmail as DomainNewEmail, UpdateAppointment as DomainUpdateAppointment,
};
use crate::domain::types::{
    AppointmentId, AppointmentTitle, CallId, EmailBody, EmailId, EmailSubject, HubId, PersonId,
    PhoneNumber, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::calls)]
pub struct Call {
    pub id: i32,
    pub hub_id: i32,
    pub person_id: i32,
    pub user_id: i32,
    pub phone: Option<String>,
    pub outcome: String,
    pub duration_seconds: i32,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::calls)]
pub struct NewCall<'a> {
    pub hub_id: i32,
    pub person_id: i32,
    pub user_id: i32,
    pub phone: Option<&'a str>,
    pub outcome: String,
    pub duration_seconds: i32,
    pub note: Option<&'a str>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::emails)]
pub struct Email {
    pub id: i32,
    pub hub_id: i32,
    pub person_id: i32,
    pub user_id: i32,
    pub direction: String,
    pub subject: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::emails)]
pub struct NewEmail<'a> {
    pub hub_id: i32,
    pub person_id: i32,
    pub user_id: i32,
    pub direction: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::appointments)]
pub struct Appointment {
    pub id: i32,
    pub hub_id: i32,
    pub person_id: i32,
    pub user_id: i32,
    pub title: String,
    pub location: Option<String>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub outcome: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::appointments)]
pub struct NewAppointment<'a> {
    pub hub_id: i32,
    pub person_id: i32,
    pub user_id: i32,
    pub title: &'a str,
    pub location: Option<&'a str>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub outcome: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::appointments)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateAppointment<'a> {
    pub title: &'a str,
    pub location: Option<&'a str>,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub outcome: Option<&'a str>,
}

impl TryFrom<Call> for DomainCall {
    type Error = TypeConstraintError;

    fn try_from(call: Call) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CallId::try_from(call.id)?,
            hub_id: HubId::try_from(call.hub_id)?,
            person_id: PersonId::try_from(call.person_id)?,
            user_id: UserId::try_from(call.user_id)?,
            phone: call.phone.map(PhoneNumber::new).transpose()?,
            outcome: CallOutcome::from(call.outcome),
            duration_seconds: call.duration_seconds,
            note: call.note,
            created_at: call.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCall> for NewCall<'a> {
    fn from(call: &'a DomainNewCall) -> Self {
        Self {
            hub_id: call.hub_id.get(),
            person_id: call.person_id.get(),
            user_id: call.user_id.get(),
            phone: call.phone.as_ref().map(|p| p.as_str()),
            outcome: call.outcome.to_string(),
            duration_seconds: call.duration_seconds,
            note: call.note.as_deref(),
        }
    }
}

impl TryFrom<Email> for DomainEmail {
    type Error = TypeConstraintError;

    fn try_from(email: Email) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmailId::try_from(email.id)?,
            hub_id: HubId::try_from(email.hub_id)?,
            person_id: PersonId::try_from(email.person_id)?,
            user_id: UserId::try_from(email.user_id)?,
            direction: EmailDirection::try_from(email.direction.as_str())?,
            subject: EmailSubject::new(email.subject)?,
            body: EmailBody::new(email.body)?,
            created_at: email.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewEmail> for NewEmail<'a> {
    fn from(email: &'a DomainNewEmail) -> Self {
        Self {
            hub_id: email.hub_id.get(),
            person_id: email.person_id.get(),
            user_id: email.user_id.get(),
            direction: email.direction.as_str(),
            subject: email.subject.as_str(),
            body: email.body.as_str(),
        }
    }
}

impl TryFrom<Appointment> for DomainAppointment {
    type Error = TypeConstraintError;

    fn try_from(appointment: Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AppointmentId::try_from(appointment.id)?,
            hub_id: HubId::try_from(appointment.hub_id)?,
            person_id: PersonId::try_from(appointment.person_id)?,
            user_id: UserId::try_from(appointment.user_id)?,
            title: AppointmentTitle::new(appointment.title)?,
            location: appointment.location,
            start_at: appointment.start_at,
            end_at: appointment.end_at,
            outcome: appointment.outcome,
            created_at: appointment.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewAppointment> for NewAppointment<'a> {
    fn from(appointment: &'a DomainNewAppointment) -> Self {
        Self {
            hub_id: appointment.hub_id.get(),
            person_id: appointment.person_id.get(),
            user_id: appointment.user_id.get(),
            title: appointment.title.as_str(),
            location: appointment.location.as_deref(),
            start_at: appointment.slot.start_at(),
            end_at: appointment.slot.end_at(),
            outcome: appointment.outcome.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateAppointment> for UpdateAppointment<'a> {
    fn from(appointment: &'a DomainUpdateAppointment) -> Self {
        Self {
            title: appointment.title.as_str(),
            location: appointment.location.as_deref(),
            start_at: appointment.slot.start_at(),
            end_at: appointment.slot.end_at(),
            outcome: appointment.outcome.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn unknown_outcome_is_kept_verbatim() {
        let db = Call {
            id: 1,
            hub_id: 1,
            person_id: 2,
            user_id: 3,
            phone: None,
            outcome: "Call back Friday".to_string(),
            duration_seconds: 40,
            note: None,
            created_at: Utc::now().naive_utc(),
        };
        let call = DomainCall::try_from(db).unwrap();
        assert_eq!(call.outcome, CallOutcome::Other("Call back Friday".to_string()));
    }

    #[test]
    fn stored_email_direction_must_be_known() {
        let db = Email {
            id: 1,
            hub_id: 1,
            person_id: 2,
            user_id: 3,
            direction: "sideways".to_string(),
            subject: "Hi".to_string(),
            body: "Body".to_string(),
            created_at: Utc::now().naive_utc(),
        };
        assert!(DomainEmail::try_from(db).is_err());
    }
}
