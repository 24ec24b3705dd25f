//! Repository implementation for calls, emails and appointments.

use diesel::prelude::*;

use crate::domain::activity::{
    Appointment, Call, Email, NewAppointment, NewCall, NewEmail, UpdateAppointment,
};
use crate::domain::types::{AppointmentId, CallId, EmailId, HubId, PersonId};
use crate::models::activity::{
    Appointment as DbAppointment, Call as DbCall, Email as DbEmail,
    NewAppointment as DbNewAppointment, NewCall as DbNewCall, NewEmail as DbNewEmail,
    UpdateAppointment as DbUpdateAppointment,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ActivityListQuery, ActivityReader, ActivityWriter, DieselRepository};

/// Pages through one activity table for a single person, newest first.
macro_rules! list_for_person {
    ($conn:expr, $table:ident, $row:ty, $domain:ty, $query:expr) => {{
        use crate::schema::$table;

        let scoped = || {
            $table::table
                .filter($table::hub_id.eq($query.hub_id.get()))
                .filter($table::person_id.eq($query.person_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>()
        };

        let total = scoped().count().get_result::<i64>($conn)? as usize;

        let mut items = scoped().order(($table::created_at.desc(), $table::id.desc()));
        if let Some(pagination) = &$query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let rows = items
            .load::<$row>($conn)?
            .into_iter()
            .map(<$domain>::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, rows))
    }};
}

/// Deletes one activity, provided it belongs to the given person of the hub.
macro_rules! delete_scoped {
    ($conn:expr, $table:ident, $id:expr, $person_id:expr, $hub_id:expr) => {{
        use crate::schema::$table;

        let affected = diesel::delete(
            $table::table
                .filter($table::id.eq($id))
                .filter($table::person_id.eq($person_id))
                .filter($table::hub_id.eq($hub_id)),
        )
        .execute($conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }};
}

impl ActivityReader for DieselRepository {
    fn list_calls(&self, query: ActivityListQuery) -> RepositoryResult<(usize, Vec<Call>)> {
        let mut conn = self.conn()?;
        list_for_person!(&mut conn, calls, DbCall, Call, query)
    }

    fn list_emails(&self, query: ActivityListQuery) -> RepositoryResult<(usize, Vec<Email>)> {
        let mut conn = self.conn()?;
        list_for_person!(&mut conn, emails, DbEmail, Email, query)
    }

    fn list_appointments(
        &self,
        query: ActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)> {
        let mut conn = self.conn()?;
        list_for_person!(&mut conn, appointments, DbAppointment, Appointment, query)
    }
}

impl ActivityWriter for DieselRepository {
    fn create_call(&self, call: &NewCall) -> RepositoryResult<Call> {
        use crate::schema::calls;

        let mut conn = self.conn()?;
        let insertable: DbNewCall = call.into();
        let created = diesel::insert_into(calls::table)
            .values(&insertable)
            .get_result::<DbCall>(&mut conn)?;

        Ok(Call::try_from(created)?)
    }

    fn delete_call(
        &self,
        id: CallId,
        person_id: PersonId,
        hub_id: HubId,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        delete_scoped!(&mut conn, calls, id.get(), person_id.get(), hub_id.get())
    }

    fn create_email(&self, email: &NewEmail) -> RepositoryResult<Email> {
        use crate::schema::emails;

        let mut conn = self.conn()?;
        let insertable: DbNewEmail = email.into();
        let created = diesel::insert_into(emails::table)
            .values(&insertable)
            .get_result::<DbEmail>(&mut conn)?;

        Ok(Email::try_from(created)?)
    }

    fn delete_email(
        &self,
        id: EmailId,
        person_id: PersonId,
        hub_id: HubId,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        delete_scoped!(&mut conn, emails, id.get(), person_id.get(), hub_id.get())
    }

    fn create_appointment(&self, appointment: &NewAppointment) -> RepositoryResult<Appointment> {
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        let insertable: DbNewAppointment = appointment.into();
        let created = diesel::insert_into(appointments::table)
            .values(&insertable)
            .get_result::<DbAppointment>(&mut conn)?;

        Ok(Appointment::try_from(created)?)
    }

    fn update_appointment(
        &self,
        id: AppointmentId,
        person_id: PersonId,
        hub_id: HubId,
        updates: &UpdateAppointment,
    ) -> RepositoryResult<Appointment> {
        use crate::schema::appointments;

        let mut conn = self.conn()?;
        let changes: DbUpdateAppointment = updates.into();
        let updated = diesel::update(
            appointments::table
                .filter(appointments::id.eq(id.get()))
                .filter(appointments::person_id.eq(person_id.get()))
                .filter(appointments::hub_id.eq(hub_id.get())),
        )
        .set(&changes)
        .get_result::<DbAppointment>(&mut conn)?;

        Ok(Appointment::try_from(updated)?)
    }

    fn delete_appointment(
        &self,
        id: AppointmentId,
        person_id: PersonId,
        hub_id: HubId,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        delete_scoped!(
            &mut conn,
            appointments,
            id.get(),
            person_id.get(),
            hub_id.get()
        )
    }
}
