//! Diesel models for deal stages and deal types.

use diesel::prelude::*;

use crate::domain::deal_category::{DealStage as DomainDealStage, DealType as DomainDealType};
use crate::domain::types::{CategoryName, DealStageId, DealTypeId, HubId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::deal_stages)]
pub struct DealStage {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub sort: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::deal_types)]
pub struct DealType {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub sort: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::deal_stages)]
pub struct NewDealStage<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub sort: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::deal_types)]
pub struct NewDealType<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub sort: i32,
}

impl TryFrom<DealStage> for DomainDealStage {
    type Error = TypeConstraintError;

    fn try_from(stage: DealStage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DealStageId::try_from(stage.id)?,
            hub_id: HubId::try_from(stage.hub_id)?,
            name: CategoryName::new(stage.name)?,
            sort: stage.sort,
        })
    }
}

impl TryFrom<DealType> for DomainDealType {
    type Error = TypeConstraintError;

    fn try_from(deal_type: DealType) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DealTypeId::try_from(deal_type.id)?,
            hub_id: HubId::try_from(deal_type.hub_id)?,
            name: CategoryName::new(deal_type.name)?,
            sort: deal_type.sort,
        })
    }
}
