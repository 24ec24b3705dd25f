//! Services for browsing and maintaining people (contacts and leads).

use crate::auth::AuthenticatedUser;
use crate::domain::person::{Person, PersonAssignment};
use crate::domain::types::{HubId, PersonId, PondId, UserId};
use crate::forms::bulk::BulkForm;
use crate::forms::people::{
    AssignPersonForm, PeopleQuery, PersonForm, PersonPayload, UploadPeopleForm,
};
use crate::pagination::{Paginated, clamp_per_page};
use crate::repository::{
    GroupReader, PersonListQuery, PersonReader, PersonWriter, UserReader, UserWriter,
};
use crate::services::{
    ServiceError, ServiceResult, access_hub, admin_hub, current_user, is_scoped_agent,
};

/// Loads a person the caller is allowed to see.
///
/// Scoped agents get [`ServiceError::NotFound`] for people assigned to
/// someone else, the same as for people of another hub.
pub(crate) fn visible_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: HubId,
    person_id: i32,
) -> ServiceResult<Person>
where
    R: PersonReader + UserWriter + ?Sized,
{
    let person_id = PersonId::new(person_id).map_err(|_| ServiceError::NotFound)?;
    let person = repo
        .get_person_by_id(person_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    if is_scoped_agent(user) {
        let me = current_user(repo, user)?;
        if person.assigned_user_id != Some(me.id) {
            return Err(ServiceError::NotFound);
        }
    }
    Ok(person)
}

/// Lists people of the caller's hub with the requested filters.
pub fn list_people<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: PeopleQuery,
) -> ServiceResult<Paginated<Person>>
where
    R: PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let page = params.page.unwrap_or(1).max(1);
    let per_page = clamp_per_page(params.per_page);

    let mut query = PersonListQuery::new(hub_id).paginate(page, per_page);
    if let Some(search) = params.search.filter(|s| !s.trim().is_empty()) {
        query = query.search(search);
    }
    if let Some(stage) = params.stage.filter(|s| !s.trim().is_empty()) {
        query = query.stage(stage.trim());
    }
    if let Some(source) = params.source.filter(|s| !s.trim().is_empty()) {
        query = query.source(source.trim());
    }
    if let Some(pond_id) = params.pond_id {
        query = query.pond(PondId::new(pond_id)?);
    }
    if params.unassigned {
        query = query.unassigned();
    }

    if is_scoped_agent(user) {
        let me = current_user(repo, user)?;
        query = query.assigned_to(me.id);
    } else if let Some(user_id) = params.assigned_user_id {
        query = query.assigned_to(UserId::new(user_id)?);
    }

    let (total, people) = repo.list_people(query).map_err(|err| {
        log::error!("Failed to list people: {err}");
        err
    })?;

    Ok(Paginated::new(people, page, per_page, total))
}

pub fn get_person<R>(repo: &R, user: &AuthenticatedUser, person_id: i32) -> ServiceResult<Person>
where
    R: PersonReader + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    visible_person(repo, user, hub_id, person_id)
}

/// Creates a person. People created by scoped agents are assigned to them.
pub fn create_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PersonForm,
) -> ServiceResult<Person>
where
    R: PersonWriter + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let payload = PersonPayload::try_from(form)?;
    let mut new_person = payload.into_new_person(hub_id);

    if is_scoped_agent(user) {
        let me = current_user(repo, user)?;
        new_person = new_person.with_assignment(PersonAssignment {
            assigned_user_id: Some(me.id),
            ..Default::default()
        });
    }

    Ok(repo.create_person(&new_person)?)
}

pub fn update_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: PersonForm,
) -> ServiceResult<Person>
where
    R: PersonReader + PersonWriter + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;
    let updates = PersonPayload::try_from(form)?.into_update();

    Ok(repo.update_person(person.id, hub_id, &updates)?)
}

pub fn delete_person<R>(repo: &R, user: &AuthenticatedUser, person_id: i32) -> ServiceResult<()>
where
    R: PersonReader + PersonWriter + UserWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let person = visible_person(repo, user, hub_id, person_id)?;

    repo.delete_person(person.id, hub_id)?;
    log::info!("Person {} deleted from hub {hub_id}", person.id);
    Ok(())
}

/// Deletes the selected people and returns how many rows were removed.
pub fn delete_people<R>(repo: &R, user: &AuthenticatedUser, form: BulkForm) -> ServiceResult<usize>
where
    R: PersonWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let selection = form.into_selection("person", PersonId::new)?;

    let affected = repo.delete_people(hub_id, &selection)?;
    log::info!("Bulk deleted {affected} people from hub {hub_id}");
    Ok(affected)
}

/// Sets the assigned agent, lender and pond of a person.
///
/// Referenced users and the pond must belong to the hub; the lender must be a
/// lender.
pub fn assign_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: AssignPersonForm,
) -> ServiceResult<Person>
where
    R: PersonReader + PersonWriter + UserReader + GroupReader + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let person_id = PersonId::new(person_id).map_err(|_| ServiceError::NotFound)?;
    let mut assignment = PersonAssignment::try_from(form)?;

    let person = repo
        .get_person_by_id(person_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    if let Some(user_id) = assignment.assigned_user_id
        && repo.get_user_by_id(user_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form("Unknown assigned user".to_string()));
    }
    if let Some(lender_id) = assignment.assigned_lender_id {
        match repo.get_user_by_id(lender_id, hub_id)? {
            Some(lender) if lender.is_lender => {}
            _ => return Err(ServiceError::Form("Unknown lender".to_string())),
        }
    }
    if let Some(pond_id) = assignment.pond_id
        && repo.get_pond(pond_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form("Unknown pond".to_string()));
    }

    assignment.lead_flow_rule_id = person.lead_flow_rule_id;
    Ok(repo.assign_person(person.id, hub_id, &assignment)?)
}

/// Imports people from an uploaded CSV file in one transaction.
pub fn import_people<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &mut UploadPeopleForm,
) -> ServiceResult<usize>
where
    R: PersonWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let people = form.parse(hub_id)?;

    let created = repo.create_people(&people).map_err(|err| {
        log::error!("Failed to import people: {err}");
        err
    })?;
    log::info!("Imported {created} people into hub {hub_id}");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin, agent, member, outsider, person, user};

    #[test]
    fn listing_requires_access_role() {
        let repo = MockRepository::new();
        assert!(matches!(
            list_people(&repo, &outsider(), PeopleQuery::default()),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn admin_listing_uses_filters_and_page_size() {
        let mut repo = MockRepository::new();
        repo.expect_list_people()
            .withf(|query| {
                query.search.as_deref() == Some("oak")
                    && query.assigned_user_id.is_none()
                    && query.pagination.map(|p| (p.page, p.per_page)) == Some((2, 100))
            })
            .returning(|_| Ok((120, vec![person(1, None)])));

        let params = PeopleQuery {
            search: Some("oak".to_string()),
            page: Some(2),
            per_page: Some(500),
            ..Default::default()
        };

        let page = list_people(&repo, &admin(), params).unwrap();

        assert_eq!(page.meta.total, 120);
        assert_eq!(page.meta.last_page, 2);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn agents_only_list_their_people() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .returning(|_| Ok(user(2)));
        repo.expect_list_people()
            .withf(|query| query.assigned_user_id.map(|id| id.get()) == Some(2))
            .returning(|_| Ok((0, vec![])));

        let params = PeopleQuery {
            assigned_user_id: Some(7),
            ..Default::default()
        };

        let page = list_people(&repo, &agent(), params).unwrap();
        assert_eq!(page.meta.total, 0);
    }

    #[test]
    fn agent_cannot_open_someone_elses_person() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|_, _| Ok(Some(person(5, Some(8)))));
        repo.expect_create_or_update_user()
            .returning(|_| Ok(user(2)));

        assert!(matches!(
            get_person(&repo, &agent(), 5),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn missing_person_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id().returning(|_, _| Ok(None));

        assert!(matches!(
            get_person(&repo, &member(), 5),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn agent_creates_person_assigned_to_self() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .returning(|_| Ok(user(2)));
        repo.expect_create_person()
            .withf(|p| p.assignment.assigned_user_id.map(|id| id.get()) == Some(2))
            .returning(|_| Ok(person(10, Some(2))));

        let form = PersonForm {
            name: "Jane".to_string(),
            ..Default::default()
        };

        let created = create_person(&repo, &agent(), form).unwrap();
        assert_eq!(created.id.get(), 10);
    }

    #[test]
    fn bulk_delete_requires_admin() {
        let repo = MockRepository::new();
        let form = BulkForm {
            ids: vec![1],
            ..Default::default()
        };
        assert!(matches!(
            delete_people(&repo, &member(), form),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn bulk_delete_with_empty_ids_is_a_form_error() {
        let repo = MockRepository::new();
        assert!(matches!(
            delete_people(&repo, &admin(), BulkForm::default()),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn bulk_delete_reports_affected_rows() {
        let mut repo = MockRepository::new();
        repo.expect_delete_people()
            .withf(|_, selection| {
                matches!(selection, crate::domain::bulk::BulkSelection::AllExcept(ids) if ids.len() == 1)
            })
            .returning(|_, _| Ok(14));

        let form = BulkForm {
            all: true,
            except: vec![3],
            ..Default::default()
        };

        assert_eq!(delete_people(&repo, &admin(), form).unwrap(), 14);
    }

    #[test]
    fn assigning_unknown_lender_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|_, _| Ok(Some(person(5, None))));
        repo.expect_get_user_by_id().returning(|_, _| Ok(Some(user(3))));

        let form = AssignPersonForm {
            assigned_lender_id: Some(3),
            ..Default::default()
        };

        assert!(matches!(
            assign_person(&repo, &admin(), 5, form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn assigning_known_agent_updates_person() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|_, _| Ok(Some(person(5, None))));
        repo.expect_get_user_by_id().returning(|id, _| Ok(Some(user(id.get()))));
        repo.expect_assign_person()
            .withf(|id, _, assignment| {
                id.get() == 5 && assignment.assigned_user_id.map(|u| u.get()) == Some(3)
            })
            .returning(|_, _, _| Ok(person(5, Some(3))));

        let form = AssignPersonForm {
            assigned_user_id: Some(3),
            ..Default::default()
        };

        let updated = assign_person(&repo, &admin(), 5, form).unwrap();
        assert_eq!(updated.assigned_user_id.map(|u| u.get()), Some(3));
    }

    #[test]
    fn assigning_pond_of_another_hub_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|_, _| Ok(Some(person(5, None))));
        repo.expect_get_pond()
            .withf(|id, hub_id| id.get() == 1 && hub_id.get() == HUB)
            .returning(|_, _| Ok(None));
        repo.expect_assign_person().never();

        let form = AssignPersonForm {
            pond_id: Some(1),
            ..Default::default()
        };

        assert!(matches!(
            assign_person(&repo, &admin(), 5, form),
            Err(ServiceError::Form(_))
        ));
    }
}
