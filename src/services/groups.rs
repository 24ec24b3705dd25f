//! Ponds and teams.

use crate::auth::AuthenticatedUser;
use crate::domain::group::{Pond, Team, WithMembers};
use crate::domain::types::{PondId, TeamId};
use crate::forms::groups::GroupForm;
use crate::repository::{GroupReader, GroupWriter};
use crate::services::{ServiceError, ServiceResult, access_hub, admin_hub};

fn pond_id(id: i32) -> ServiceResult<PondId> {
    PondId::new(id).map_err(|_| ServiceError::NotFound)
}

fn team_id(id: i32) -> ServiceResult<TeamId> {
    TeamId::new(id).map_err(|_| ServiceError::NotFound)
}

pub fn list_ponds<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<WithMembers<Pond>>>
where
    R: GroupReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    Ok(repo.list_ponds(hub_id)?)
}

pub fn get_pond<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<WithMembers<Pond>>
where
    R: GroupReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    repo.get_pond(pond_id(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_pond<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: GroupForm,
) -> ServiceResult<WithMembers<Pond>>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let input = form.into_input(hub_id)?;

    let pond = repo.create_pond(&input)?;
    log::info!("Pond {} created in hub {hub_id}", pond.id);
    repo.get_pond(pond.id, hub_id)?.ok_or(ServiceError::NotFound)
}

/// Renames the pond, sets its owner and replaces its members.
pub fn update_pond<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: GroupForm,
) -> ServiceResult<WithMembers<Pond>>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let id = pond_id(id)?;
    let input = form.into_input(hub_id)?;

    repo.update_pond(id, &input)?;
    repo.get_pond(id, hub_id)?.ok_or(ServiceError::NotFound)
}

/// People in the pond are released from it.
pub fn delete_pond<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: GroupWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    Ok(repo.delete_pond(pond_id(id)?, hub_id)?)
}

pub fn list_teams<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<WithMembers<Team>>>
where
    R: GroupReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    Ok(repo.list_teams(hub_id)?)
}

pub fn get_team<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<WithMembers<Team>>
where
    R: GroupReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    repo.get_team(team_id(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_team<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: GroupForm,
) -> ServiceResult<WithMembers<Team>>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let input = form.into_input(hub_id)?;

    let team = repo.create_team(&input)?;
    log::info!("Team {} created in hub {hub_id}", team.id);
    repo.get_team(team.id, hub_id)?.ok_or(ServiceError::NotFound)
}

pub fn update_team<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: GroupForm,
) -> ServiceResult<WithMembers<Team>>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let id = team_id(id)?;
    let input = form.into_input(hub_id)?;

    repo.update_team(id, &input)?;
    repo.get_team(id, hub_id)?.ok_or(ServiceError::NotFound)
}

pub fn delete_team<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: GroupWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    Ok(repo.delete_team(team_id(id)?, hub_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{GroupName, HubId, UserId};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin, member, timestamp, user};

    fn team(id: i32) -> Team {
        Team {
            id: TeamId::new(id).unwrap(),
            hub_id: HubId::new(HUB).unwrap(),
            name: GroupName::new("North").unwrap(),
            leader_user_id: Some(UserId::new(1).unwrap()),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn form() -> GroupForm {
        serde_json::from_str(r#"{"name": "North", "lead_user_id": 1, "member_ids": [1, 2]}"#)
            .unwrap()
    }

    #[test]
    fn members_cannot_create_teams() {
        let repo = MockRepository::new();
        assert!(matches!(
            create_team(&repo, &member(), form()),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn created_team_is_returned_with_members() {
        let mut repo = MockRepository::new();
        repo.expect_create_team()
            .withf(|input| input.member_ids.len() == 2 && input.hub_id.get() == HUB)
            .returning(|_| Ok(team(4)));
        repo.expect_get_team().returning(|id, _| {
            Ok(Some(WithMembers {
                group: team(id.get()),
                members: vec![user(1), user(2)],
            }))
        });

        let created = create_team(&repo, &admin(), form()).unwrap();

        assert_eq!(created.group.id.get(), 4);
        assert_eq!(created.members.len(), 2);
    }

    #[test]
    fn updating_missing_pond_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_update_pond()
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            update_pond(&repo, &admin(), 9, form()),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn members_can_list_teams() {
        let mut repo = MockRepository::new();
        repo.expect_list_teams().returning(|_| {
            Ok(vec![WithMembers {
                group: team(1),
                members: vec![],
            }])
        });

        assert_eq!(list_teams(&repo, &member()).unwrap().len(), 1);
    }
}
