//! Ponds (shared lead pools) and teams: named groups of users.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{GroupName, HubId, PondId, TeamId, UserId};
use crate::domain::user::User;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Pond {
    pub id: PondId,
    pub hub_id: HubId,
    pub name: GroupName,
    pub owner_user_id: Option<UserId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub hub_id: HubId,
    pub name: GroupName,
    pub leader_user_id: Option<UserId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Group record together with its member users.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WithMembers<G> {
    #[serde(flatten)]
    pub group: G,
    pub members: Vec<User>,
}

/// Values written when creating or updating a pond or team.
///
/// `lead_user_id` is the pond owner or the team leader. Members are replaced
/// wholesale on update.
#[derive(Clone, Debug)]
pub struct GroupInput {
    pub hub_id: HubId,
    pub name: GroupName,
    pub lead_user_id: Option<UserId>,
    pub member_ids: Vec<UserId>,
}
