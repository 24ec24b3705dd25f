//! Diesel models for ponds, teams and their member pivots.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::group::{Pond as DomainPond, Team as DomainTeam};
use crate::domain::types::{GroupName, HubId, PondId, TeamId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::ponds)]
pub struct Pond {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub owner_user_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::teams)]
pub struct Team {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub leader_user_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ponds)]
pub struct NewPond<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub owner_user_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::teams)]
pub struct NewTeam<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub leader_user_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::pond_users)]
pub struct NewPondUser {
    pub pond_id: i32,
    pub user_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::team_users)]
pub struct NewTeamUser {
    pub team_id: i32,
    pub user_id: i32,
}

impl TryFrom<Pond> for DomainPond {
    type Error = TypeConstraintError;

    fn try_from(pond: Pond) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PondId::try_from(pond.id)?,
            hub_id: HubId::try_from(pond.hub_id)?,
            name: GroupName::new(pond.name)?,
            owner_user_id: pond.owner_user_id.map(UserId::new).transpose()?,
            created_at: pond.created_at,
            updated_at: pond.updated_at,
        })
    }
}

impl TryFrom<Team> for DomainTeam {
    type Error = TypeConstraintError;

    fn try_from(team: Team) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TeamId::try_from(team.id)?,
            hub_id: HubId::try_from(team.hub_id)?,
            name: GroupName::new(team.name)?,
            leader_user_id: team.leader_user_id.map(UserId::new).transpose()?,
            created_at: team.created_at,
            updated_at: team.updated_at,
        })
    }
}
