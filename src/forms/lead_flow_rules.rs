use serde::Deserialize;
use validator::Validate;

use crate::domain::lead_flow_rule::{
    Condition, ConditionOperator, MatchType, NewLeadFlowRule, RuleTarget, UpdateLeadFlowRule,
};
use crate::domain::person::normalize_attribute;
use crate::domain::types::{HubId, PondId, RuleName, TeamId, UserId};
use crate::forms::{FormError, optional_id};

fn default_match_type() -> String {
    MatchType::All.as_str().to_string()
}

/// Body used to create or replace a lead flow rule.
#[derive(Debug, Deserialize, Validate)]
pub struct LeadFlowRuleForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_match_type")]
    pub match_type: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_paused: bool,
    pub assign_user_id: Option<i32>,
    pub assign_lender_id: Option<i32>,
    pub assign_pond_id: Option<i32>,
    pub assign_team_id: Option<i32>,
}

pub struct LeadFlowRulePayload {
    pub name: RuleName,
    pub source: Option<String>,
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    pub is_default: bool,
    pub is_paused: bool,
    pub target: RuleTarget,
}

impl TryFrom<LeadFlowRuleForm> for LeadFlowRulePayload {
    type Error = FormError;

    fn try_from(form: LeadFlowRuleForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let comparison_needs_value = |c: &Condition| {
            !matches!(
                c.operator,
                ConditionOperator::IsEmpty | ConditionOperator::IsNotEmpty
            ) && c.value.trim().is_empty()
        };
        if form.conditions.iter().any(comparison_needs_value) {
            return Err(FormError::InvalidValue(
                "condition value is required for this operator".to_string(),
            ));
        }

        Ok(Self {
            name: RuleName::new(form.name).map_err(|_| FormError::InvalidName)?,
            source: normalize_attribute(form.source),
            match_type: MatchType::try_from(form.match_type.as_str())?,
            conditions: form.conditions,
            is_default: form.is_default,
            is_paused: form.is_paused,
            target: RuleTarget {
                assign_user_id: optional_id(form.assign_user_id, "user", UserId::new)?,
                assign_lender_id: optional_id(form.assign_lender_id, "lender", UserId::new)?,
                assign_pond_id: optional_id(form.assign_pond_id, "pond", PondId::new)?,
                assign_team_id: optional_id(form.assign_team_id, "team", TeamId::new)?,
            },
        })
    }
}

impl LeadFlowRulePayload {
    pub fn into_new(self, hub_id: HubId) -> NewLeadFlowRule {
        NewLeadFlowRule {
            hub_id,
            name: self.name,
            source: self.source,
            match_type: self.match_type,
            conditions: self.conditions,
            is_default: self.is_default,
            is_paused: self.is_paused,
            target: self.target,
        }
    }

    pub fn into_update(self) -> UpdateLeadFlowRule {
        UpdateLeadFlowRule {
            name: self.name,
            source: self.source,
            match_type: self.match_type,
            conditions: self.conditions,
            is_default: self.is_default,
            is_paused: self.is_paused,
            target: self.target,
        }
    }
}

/// Body of the reorder endpoints: the zero-based target position.
#[derive(Debug, Deserialize)]
pub struct ReorderForm {
    pub position: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead_flow_rule::LeadField;

    fn parse(json: &str) -> Result<LeadFlowRulePayload, FormError> {
        let form: LeadFlowRuleForm = serde_json::from_str(json).unwrap();
        LeadFlowRulePayload::try_from(form)
    }

    #[test]
    fn full_rule_is_parsed() {
        let payload = parse(
            r#"{
                "name": "Austin buyers",
                "source": " Zillow ",
                "match_type": "any",
                "conditions": [
                    {"field": "city", "operator": "equals", "value": "Austin"},
                    {"field": "price", "operator": "greater_than", "value": "500000"}
                ],
                "assign_team_id": 4
            }"#,
        )
        .unwrap();

        assert_eq!(payload.match_type, MatchType::Any);
        assert_eq!(payload.source.as_deref(), Some("Zillow"));
        assert_eq!(payload.conditions[0].field, LeadField::City);
        assert_eq!(payload.target.assign_team_id, Some(TeamId::new(4).unwrap()));
        assert!(!payload.is_default);
    }

    #[test]
    fn match_type_defaults_to_all() {
        let payload = parse(r#"{"name": "Everything"}"#).unwrap();
        assert_eq!(payload.match_type, MatchType::All);
        assert!(payload.conditions.is_empty());
    }

    #[test]
    fn unknown_match_type_is_rejected() {
        assert!(parse(r#"{"name": "x", "match_type": "most"}"#).is_err());
    }

    #[test]
    fn comparison_without_value_is_rejected() {
        let result = parse(
            r#"{"name": "x", "conditions": [{"field": "city", "operator": "equals"}]}"#,
        );
        assert!(matches!(result, Err(FormError::InvalidValue(_))));
    }

    #[test]
    fn emptiness_checks_need_no_value() {
        let payload = parse(
            r#"{"name": "x", "conditions": [{"field": "email", "operator": "is_empty"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.conditions[0].operator, ConditionOperator::IsEmpty);
    }
}
