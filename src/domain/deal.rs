use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::person::Person;
use crate::domain::types::{Amount, DealId, DealName, DealStageId, DealTypeId, HubId, PersonId, UserId};
use crate::domain::user::User;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    pub id: DealId,
    pub hub_id: HubId,
    pub name: DealName,
    pub price: Option<Amount>,
    pub commission: Option<Amount>,
    pub stage_id: DealStageId,
    pub type_id: Option<DealTypeId>,
    pub projected_close_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Deal together with the people and users attached to it.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DealWithRelations {
    #[serde(flatten)]
    pub deal: Deal,
    pub people: Vec<Person>,
    pub users: Vec<User>,
}

#[derive(Clone, Debug)]
pub struct NewDeal {
    pub hub_id: HubId,
    pub name: DealName,
    pub price: Option<Amount>,
    pub commission: Option<Amount>,
    pub stage_id: DealStageId,
    pub type_id: Option<DealTypeId>,
    pub projected_close_date: Option<NaiveDate>,
    pub person_ids: Vec<PersonId>,
    pub user_ids: Vec<UserId>,
}

/// Replacement values for a deal; the pivots are replaced wholesale.
#[derive(Clone, Debug)]
pub struct UpdateDeal {
    pub name: DealName,
    pub price: Option<Amount>,
    pub commission: Option<Amount>,
    pub stage_id: DealStageId,
    pub type_id: Option<DealTypeId>,
    pub projected_close_date: Option<NaiveDate>,
    pub person_ids: Vec<PersonId>,
    pub user_ids: Vec<UserId>,
}
