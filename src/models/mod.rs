//! Database models shared across the CRM repository.

pub mod activity;
#[cfg(feature = "server")]
pub mod config;
pub mod deal;
pub mod deal_category;
pub mod group;
pub mod lead_flow_rule;
pub mod person;
pub mod user;
