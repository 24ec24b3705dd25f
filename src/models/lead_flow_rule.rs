//! Diesel models for lead flow rules.
//!
//! Conditions are stored as a JSON array in a text column.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::lead_flow_rule::{
    Condition, LeadFlowRule as DomainLeadFlowRule, MatchType,
    NewLeadFlowRule as DomainNewLeadFlowRule, RuleTarget,
    UpdateLeadFlowRule as DomainUpdateLeadFlowRule,
};
use crate::domain::types::{HubId, LeadFlowRuleId, PondId, RuleName, TeamId, UserId};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::lead_flow_rules)]
pub struct LeadFlowRule {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub source: Option<String>,
    pub match_type: String,
    pub conditions: String,
    pub is_default: bool,
    pub is_paused: bool,
    pub sort: i32,
    pub assign_user_id: Option<i32>,
    pub assign_lender_id: Option<i32>,
    pub assign_pond_id: Option<i32>,
    pub assign_team_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::lead_flow_rules)]
pub struct NewLeadFlowRule<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub source: Option<&'a str>,
    pub match_type: &'static str,
    pub conditions: String,
    pub is_default: bool,
    pub is_paused: bool,
    pub sort: i32,
    pub assign_user_id: Option<i32>,
    pub assign_lender_id: Option<i32>,
    pub assign_pond_id: Option<i32>,
    pub assign_team_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::lead_flow_rules)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateLeadFlowRule<'a> {
    pub name: &'a str,
    pub source: Option<&'a str>,
    pub match_type: &'static str,
    pub conditions: String,
    pub is_default: bool,
    pub is_paused: bool,
    pub assign_user_id: Option<i32>,
    pub assign_lender_id: Option<i32>,
    pub assign_pond_id: Option<i32>,
    pub assign_team_id: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<LeadFlowRule> for DomainLeadFlowRule {
    type Error = RepositoryError;

    fn try_from(rule: LeadFlowRule) -> Result<Self, Self::Error> {
        let conditions: Vec<Condition> = serde_json::from_str(&rule.conditions)?;

        Ok(Self {
            id: LeadFlowRuleId::try_from(rule.id)?,
            hub_id: HubId::try_from(rule.hub_id)?,
            name: RuleName::new(rule.name)?,
            source: rule.source,
            match_type: MatchType::try_from(rule.match_type.as_str())?,
            conditions,
            is_default: rule.is_default,
            is_paused: rule.is_paused,
            sort: rule.sort,
            target: RuleTarget {
                assign_user_id: rule.assign_user_id.map(UserId::new).transpose()?,
                assign_lender_id: rule.assign_lender_id.map(UserId::new).transpose()?,
                assign_pond_id: rule.assign_pond_id.map(PondId::new).transpose()?,
                assign_team_id: rule.assign_team_id.map(TeamId::new).transpose()?,
            },
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        })
    }
}

impl<'a> NewLeadFlowRule<'a> {
    /// Builds the insertable row placed at `sort`.
    pub fn from_domain(rule: &'a DomainNewLeadFlowRule, sort: i32) -> Result<Self, RepositoryError> {
        Ok(Self {
            hub_id: rule.hub_id.get(),
            name: rule.name.as_str(),
            source: rule.source.as_deref(),
            match_type: rule.match_type.as_str(),
            conditions: serde_json::to_string(&rule.conditions)?,
            is_default: rule.is_default,
            is_paused: rule.is_paused,
            sort,
            assign_user_id: rule.target.assign_user_id.map(UserId::get),
            assign_lender_id: rule.target.assign_lender_id.map(UserId::get),
            assign_pond_id: rule.target.assign_pond_id.map(PondId::get),
            assign_team_id: rule.target.assign_team_id.map(TeamId::get),
        })
    }
}

impl<'a> TryFrom<&'a DomainUpdateLeadFlowRule> for UpdateLeadFlowRule<'a> {
    type Error = RepositoryError;

    fn try_from(rule: &'a DomainUpdateLeadFlowRule) -> Result<Self, Self::Error> {
        Ok(Self {
            name: rule.name.as_str(),
            source: rule.source.as_deref(),
            match_type: rule.match_type.as_str(),
            conditions: serde_json::to_string(&rule.conditions)?,
            is_default: rule.is_default,
            is_paused: rule.is_paused,
            assign_user_id: rule.target.assign_user_id.map(UserId::get),
            assign_lender_id: rule.target.assign_lender_id.map(UserId::get),
            assign_pond_id: rule.target.assign_pond_id.map(PondId::get),
            assign_team_id: rule.target.assign_team_id.map(TeamId::get),
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::lead_flow_rule::{ConditionOperator, LeadField};

    fn row(conditions: &str, match_type: &str) -> LeadFlowRule {
        let now = Utc::now().naive_utc();
        LeadFlowRule {
            id: 4,
            hub_id: 1,
            name: "Austin buyers".to_string(),
            source: Some("Zillow".to_string()),
            match_type: match_type.to_string(),
            conditions: conditions.to_string(),
            is_default: false,
            is_paused: false,
            sort: 2,
            assign_user_id: Some(9),
            assign_lender_id: None,
            assign_pond_id: None,
            assign_team_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn conditions_are_decoded_from_json() {
        let rule = DomainLeadFlowRule::try_from(row(
            r#"[{"field":"city","operator":"equals","value":"Austin"}]"#,
            "any",
        ))
        .unwrap();

        assert_eq!(rule.match_type, MatchType::Any);
        assert_eq!(
            rule.conditions,
            vec![Condition::new(
                LeadField::City,
                ConditionOperator::Equals,
                "Austin"
            )]
        );
        assert_eq!(rule.target.assign_user_id, Some(UserId::new(9).unwrap()));
    }

    #[test]
    fn malformed_conditions_are_rejected() {
        let result = DomainLeadFlowRule::try_from(row("not json", "all"));
        assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
    }
}
