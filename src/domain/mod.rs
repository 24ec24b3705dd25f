//! Domain aggregates exposed by the CRM service layer.

pub mod activity;
pub mod bulk;
pub mod deal;
pub mod deal_category;
pub mod group;
pub mod lead_flow_rule;
pub mod ordering;
pub mod person;
pub mod report;
pub mod types;
pub mod user;
