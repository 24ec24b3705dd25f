//! Deal stages and deal types: hub-defined labels kept in a manual order.

use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryName, DealStageId, DealTypeId, HubId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DealStage {
    pub id: DealStageId,
    pub hub_id: HubId,
    pub name: CategoryName,
    pub sort: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DealType {
    pub id: DealTypeId,
    pub hub_id: HubId,
    pub name: CategoryName,
    pub sort: i32,
}
