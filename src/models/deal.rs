//! Diesel models for deals and their pivot tables.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::deal::{Deal as DomainDeal, NewDeal as DomainNewDeal, UpdateDeal as DomainUpdateDeal};
use crate::domain::types::{
    Amount, DealId, DealName, DealStageId, DealTypeId, HubId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::deals)]
/// Diesel model for [`crate::domain::deal::Deal`].
pub struct Deal {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub price: Option<i64>,
    pub commission: Option<i64>,
    pub stage_id: i32,
    pub type_id: Option<i32>,
    pub projected_close_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::deals)]
pub struct NewDeal<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub price: Option<i64>,
    pub commission: Option<i64>,
    pub stage_id: i32,
    pub type_id: Option<i32>,
    pub projected_close_date: Option<NaiveDate>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::deals)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateDeal<'a> {
    pub name: &'a str,
    pub price: Option<i64>,
    pub commission: Option<i64>,
    pub stage_id: i32,
    pub type_id: Option<i32>,
    pub projected_close_date: Option<NaiveDate>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::deal_people)]
pub struct NewDealPerson {
    pub deal_id: i32,
    pub person_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::deal_users)]
pub struct NewDealUser {
    pub deal_id: i32,
    pub user_id: i32,
}

impl TryFrom<Deal> for DomainDeal {
    type Error = TypeConstraintError;

    fn try_from(deal: Deal) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DealId::try_from(deal.id)?,
            hub_id: HubId::try_from(deal.hub_id)?,
            name: DealName::new(deal.name)?,
            price: deal.price.map(Amount::new).transpose()?,
            commission: deal.commission.map(Amount::new).transpose()?,
            stage_id: DealStageId::try_from(deal.stage_id)?,
            type_id: deal.type_id.map(DealTypeId::new).transpose()?,
            projected_close_date: deal.projected_close_date,
            created_at: deal.created_at,
            updated_at: deal.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewDeal> for NewDeal<'a> {
    fn from(deal: &'a DomainNewDeal) -> Self {
        Self {
            hub_id: deal.hub_id.get(),
            name: deal.name.as_str(),
            price: deal.price.map(Amount::get),
            commission: deal.commission.map(Amount::get),
            stage_id: deal.stage_id.get(),
            type_id: deal.type_id.map(DealTypeId::get),
            projected_close_date: deal.projected_close_date,
        }
    }
}

impl<'a> From<&'a DomainUpdateDeal> for UpdateDeal<'a> {
    fn from(deal: &'a DomainUpdateDeal) -> Self {
        Self {
            name: deal.name.as_str(),
            price: deal.price.map(Amount::get),
            commission: deal.commission.map(Amount::get),
            stage_id: deal.stage_id.get(),
            type_id: deal.type_id.map(DealTypeId::get),
            projected_close_date: deal.projected_close_date,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
