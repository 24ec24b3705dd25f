//! Response bodies that are not plain domain entities.

use serde::Serialize;

use crate::domain::lead_flow_rule::LeadFlowRule;

/// Result of a bulk mutation.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Affected {
    pub affected: usize,
}

/// Rule that would route a hypothetical lead; `None` when the lead would
/// stay unassigned.
#[derive(Debug, Serialize)]
pub struct LeadPreview {
    pub rule: Option<LeadFlowRule>,
}

/// Window covered by an activity report, echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct ReportWindow<T> {
    pub from: chrono::NaiveDateTime,
    pub to: chrono::NaiveDateTime,
    pub rows: Vec<T>,
}
