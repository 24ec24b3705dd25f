//! Calls, emails and appointments logged against a person.
//!
//! Every operation first resolves the person through [`visible_person`], so
//! scoped agents only reach the timelines of their own people. New
//! activities are attributed to the caller's user row.

use crate::auth::AuthenticatedUser;
use crate::domain::activity::{Appointment, Call, Email};
use crate::domain::types::{AppointmentId, CallId, EmailId};
use crate::forms::activities::{
    ActivityQuery, AppointmentForm, AppointmentPayload, CallForm, EmailForm,
};
use crate::pagination::{Paginated, clamp_per_page};
use crate::repository::{
    ActivityListQuery, ActivityReader, ActivityWriter, PersonReader, UserWriter,
};
use crate::services::people::visible_person;
use crate::services::{ServiceError, ServiceResult, access_hub, current_user};

macro_rules! list_activities {
    ($repo:expr, $user:expr, $person_id:expr, $params:expr, $method:ident) => {{
        let hub_id = access_hub($user)?;
        let person = visible_person($repo, $user, hub_id, $person_id)?;
        let page = $params.page.unwrap_or(1).max(1);
        let per_page = clamp_per_page($params.per_page);

        let query = ActivityListQuery::new(hub_id, person.id).paginate(page, per_page);
        let (total, items) = $repo.$method(query).map_err(|err| {
            log::error!("Failed to list activities of person {}: {err}", person.id);
            err
        })?;

        Ok(Paginated::new(items, page, per_page, total))
    }};
}

pub fn list_calls<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    params: ActivityQuery,
) -> ServiceResult<Paginated<Call>>
where
    R: ActivityReader + PersonReader + UserWriter + ?Sized,
{
    list_activities!(repo, user, person_id, params, list_calls)
}

pub fn list_emails<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    params: ActivityQuery,
) -> ServiceResult<Paginated<Email>>
where
    R: ActivityReader + PersonReader + UserWriter + ?Sized,
{
    list_activities!(repo, user, person_id, params, list_emails)
}

pub fn list_appointments<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    params: ActivityQuery,
) -> ServiceResult<Paginated<Appointment>>
where
    R: ActivityReader + PersonReader + UserWriter + ?Sized,
{
    list_activities!(repo, user, person_id, params, list_appointments)
}

pub fn create_call<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: CallForm,
) -> ServiceResult<Call>
where
    R: ActivityWriter + PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let me = current_user(repo, user)?;

    let call = form.into_domain(hub_id, person.id, me.id)?;
    Ok(repo.create_call(&call)?)
}

pub fn create_email<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: EmailForm,
) -> ServiceResult<Email>
where
    R: ActivityWriter + PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let me = current_user(repo, user)?;

    let email = form.into_domain(hub_id, person.id, me.id)?;
    Ok(repo.create_email(&email)?)
}

pub fn create_appointment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: AppointmentForm,
) -> ServiceResult<Appointment>
where
    R: ActivityWriter + PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let me = current_user(repo, user)?;

    let appointment = AppointmentPayload::try_from(form)?.into_new(hub_id, person.id, me.id);
    Ok(repo.create_appointment(&appointment)?)
}

pub fn update_appointment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    appointment_id: i32,
    form: AppointmentForm,
) -> ServiceResult<Appointment>
where
    R: ActivityWriter + PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let id = AppointmentId::new(appointment_id).map_err(|_| ServiceError::NotFound)?;

    let updates = AppointmentPayload::try_from(form)?.into_update();
    Ok(repo.update_appointment(id, person.id, hub_id, &updates)?)
}

pub fn delete_call<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    call_id: i32,
) -> ServiceResult<()>
where
    R: ActivityWriter + PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let id = CallId::new(call_id).map_err(|_| ServiceError::NotFound)?;
    Ok(repo.delete_call(id, person.id, hub_id)?)
}

pub fn delete_email<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    email_id: i32,
) -> ServiceResult<()>
where
    R: ActivityWriter + PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let id = EmailId::new(email_id).map_err(|_| ServiceError::NotFound)?;
    Ok(repo.delete_email(id, person.id, hub_id)?)
}

pub fn delete_appointment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    appointment_id: i32,
) -> ServiceResult<()>
where
    R: ActivityWriter + PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let id = AppointmentId::new(appointment_id).map_err(|_| ServiceError::NotFound)?;
    Ok(repo.delete_appointment(id, person.id, hub_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::CallOutcome;
    use crate::domain::types::{HubId, PersonId, UserId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, agent, member, person, timestamp, user};

    fn call(id: i32) -> Call {
        Call {
            id: CallId::new(id).unwrap(),
            hub_id: HubId::new(HUB).unwrap(),
            person_id: PersonId::new(5).unwrap(),
            user_id: UserId::new(3).unwrap(),
            phone: None,
            outcome: CallOutcome::Connected,
            duration_seconds: 60,
            note: None,
            created_at: timestamp(),
        }
    }

    #[test]
    fn call_is_attributed_to_caller() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), None))));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(user(3)));
        repo.expect_create_call()
            .withf(|call| call.user_id.get() == 3 && call.person_id.get() == 5)
            .returning(|_| Ok(call(1)));

        let form: CallForm =
            serde_json::from_str(r#"{"outcome": "Connected", "duration_seconds": 60}"#).unwrap();

        let created = create_call(&repo, &member(), 5, form).unwrap();
        assert_eq!(created.id.get(), 1);
    }

    #[test]
    fn agent_cannot_read_foreign_timeline() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), Some(99)))));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(user(2)));
        repo.expect_list_calls().never();

        assert!(matches!(
            list_calls(&repo, &agent(), 5, ActivityQuery::default()),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn timeline_is_paginated() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), None))));
        repo.expect_list_calls()
            .withf(|query| {
                query.person_id.get() == 5
                    && query.pagination.map(|p| (p.page, p.per_page)) == Some((1, 2))
            })
            .returning(|_| Ok((3, vec![call(3), call(2)])));

        let params = ActivityQuery {
            page: None,
            per_page: Some(2),
        };
        let page = list_calls(&repo, &member(), 5, params).unwrap();

        assert_eq!(page.meta.last_page, 2);
        assert_eq!(page.items[0].id.get(), 3);
    }

    #[test]
    fn deleting_missing_email_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), None))));
        repo.expect_delete_email()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            delete_email(&repo, &member(), 5, 8),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn call_delete_is_scoped_to_path_person() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), Some(2)))));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(user(2)));
        repo.expect_delete_call()
            .withf(|id, person_id, hub_id| {
                id.get() == 8 && person_id.get() == 5 && hub_id.get() == HUB
            })
            .returning(|_, _, _| Ok(()));

        delete_call(&repo, &agent(), 5, 8).unwrap();
    }

    #[test]
    fn appointment_update_is_scoped_to_path_person() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), None))));
        repo.expect_update_appointment()
            .withf(|id, person_id, _, _| id.get() == 4 && person_id.get() == 5)
            .returning(|_, _, _, _| Err(RepositoryError::NotFound));

        let form: AppointmentForm = serde_json::from_str(
            r#"{
                "title": "Showing",
                "start_at": "2026-03-01T10:00:00",
                "end_at": "2026-03-01T11:00:00"
            }"#,
        )
        .unwrap();

        assert!(matches!(
            update_appointment(&repo, &member(), 5, 4, form),
            Err(ServiceError::NotFound)
        ));
    }
}
