//! Aggregates served by the reporting endpoints.

use serde::Serialize;

use crate::domain::deal_category::DealStage;
use crate::domain::user::User;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ActivityReportRow {
    pub user: User,
    pub calls: i64,
    pub emails: i64,
    pub appointments: i64,
    pub deals: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PipelineReportRow {
    pub stage: DealStage,
    pub deals: i64,
    pub total_price: i64,
}
