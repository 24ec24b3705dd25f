//! Lead flow rules route incoming leads to agents, lenders and ponds.
//!
//! Non-default rules are tried in `sort` order (ties by id) and the first one
//! whose conditions match the lead wins. When none matches, the default rule
//! applies. Paused rules are never considered, and a rule bound to a lead
//! source only sees leads from that source.

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::person::{NewPerson, PersonAssignment};
use crate::domain::types::{
    HubId, LeadFlowRuleId, PondId, RuleName, TeamId, TypeConstraintError, UserId,
};

/// How the conditions of a rule are combined.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    #[default]
    All,
    Any,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::All => "all",
            MatchType::Any => "any",
        }
    }
}

impl Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MatchType {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "all" => Ok(MatchType::All),
            "any" => Ok(MatchType::Any),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown match type `{other}`"
            ))),
        }
    }
}

/// Lead attribute a condition inspects.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    Name,
    Email,
    Phone,
    Source,
    Stage,
    City,
    Price,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Condition {
    pub field: LeadField,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: String,
}

fn lead_value(lead: &NewPerson, field: LeadField) -> Option<String> {
    match field {
        LeadField::Name => Some(lead.name.as_str().to_string()),
        LeadField::Email => lead.email.as_ref().map(|e| e.as_str().to_string()),
        LeadField::Phone => lead.phone.as_ref().map(|p| p.as_str().to_string()),
        LeadField::Source => lead.source.clone(),
        LeadField::Stage => lead.stage.clone(),
        LeadField::City => lead.city.clone(),
        LeadField::Price => lead.price.map(|p| p.get().to_string()),
    }
}

/// Text form used by every comparison: trimmed and lowercased.
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Condition {
    pub fn new(field: LeadField, operator: ConditionOperator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }

    /// Evaluates the condition against a lead.
    ///
    /// Text comparisons ignore case and surrounding whitespace. Numeric
    /// comparisons never match when either side is not a number.
    pub fn matches(&self, lead: &NewPerson) -> bool {
        let actual = lead_value(lead, self.field)
            .map(|v| normalize(&v))
            .filter(|v| !v.is_empty());
        let expected = normalize(&self.value);

        match self.operator {
            ConditionOperator::IsEmpty => actual.is_none(),
            ConditionOperator::IsNotEmpty => actual.is_some(),
            ConditionOperator::Equals => actual.is_some_and(|a| a == expected),
            ConditionOperator::NotEquals => actual.is_none_or(|a| a != expected),
            ConditionOperator::Contains => actual.is_some_and(|a| a.contains(&expected)),
            ConditionOperator::NotContains => actual.is_none_or(|a| !a.contains(&expected)),
            ConditionOperator::StartsWith => actual.is_some_and(|a| a.starts_with(&expected)),
            ConditionOperator::GreaterThan => {
                match (actual.as_deref().and_then(parse_number), parse_number(&expected)) {
                    (Some(a), Some(e)) => a > e,
                    _ => false,
                }
            }
            ConditionOperator::LessThan => {
                match (actual.as_deref().and_then(parse_number), parse_number(&expected)) {
                    (Some(a), Some(e)) => a < e,
                    _ => false,
                }
            }
        }
    }
}

/// Where a matched lead goes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleTarget {
    pub assign_user_id: Option<UserId>,
    pub assign_lender_id: Option<UserId>,
    pub assign_pond_id: Option<PondId>,
    /// Team whose least-loaded member receives the lead when no user is set.
    pub assign_team_id: Option<TeamId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadFlowRule {
    pub id: LeadFlowRuleId,
    pub hub_id: HubId,
    pub name: RuleName,
    pub source: Option<String>,
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    pub is_default: bool,
    pub is_paused: bool,
    pub sort: i32,
    #[serde(flatten)]
    pub target: RuleTarget,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl LeadFlowRule {
    /// Whether the rule is bound to the lead's source (or to no source).
    pub fn applies_to_source(&self, lead: &NewPerson) -> bool {
        match &self.source {
            None => true,
            Some(source) => lead
                .source
                .as_deref()
                .is_some_and(|s| normalize(s) == normalize(source)),
        }
    }

    /// Whether the rule's conditions hold for the lead.
    ///
    /// A rule without conditions matches every lead.
    pub fn conditions_match(&self, lead: &NewPerson) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        match self.match_type {
            MatchType::All => self.conditions.iter().all(|c| c.matches(lead)),
            MatchType::Any => self.conditions.iter().any(|c| c.matches(lead)),
        }
    }

    pub fn matches(&self, lead: &NewPerson) -> bool {
        !self.is_paused && self.applies_to_source(lead) && self.conditions_match(lead)
    }
}

/// Picks the rule that routes `lead`, if any.
pub fn select_rule<'a>(rules: &'a [LeadFlowRule], lead: &NewPerson) -> Option<&'a LeadFlowRule> {
    let mut candidates = rules.iter().filter(|r| !r.is_default).collect::<Vec<_>>();
    candidates.sort_by_key(|r| (r.sort, r.id.get()));

    candidates
        .into_iter()
        .find(|rule| rule.matches(lead))
        .or_else(|| {
            rules
                .iter()
                .filter(|r| r.is_default && !r.is_paused && r.applies_to_source(lead))
                .min_by_key(|r| (r.sort, r.id.get()))
        })
}

/// Chooses the team member with the fewest assigned people.
///
/// `loads` pairs each member with its current number of assigned people.
/// Ties go to the lowest user id.
pub fn pick_team_member(loads: &[(UserId, i64)]) -> Option<UserId> {
    loads
        .iter()
        .min_by_key(|(user_id, load)| (*load, user_id.get()))
        .map(|(user_id, _)| *user_id)
}

/// Builds the assignment a matched rule produces.
///
/// `team_member` is the member chosen from the rule's team, used only when the
/// rule does not name an agent directly.
pub fn assignment_for(rule: &LeadFlowRule, team_member: Option<UserId>) -> PersonAssignment {
    PersonAssignment {
        assigned_user_id: rule.target.assign_user_id.or(team_member),
        assigned_lender_id: rule.target.assign_lender_id,
        pond_id: rule.target.assign_pond_id,
        lead_flow_rule_id: Some(rule.id),
    }
}

#[derive(Clone, Debug)]
pub struct NewLeadFlowRule {
    pub hub_id: HubId,
    pub name: RuleName,
    pub source: Option<String>,
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    pub is_default: bool,
    pub is_paused: bool,
    pub target: RuleTarget,
}

#[derive(Clone, Debug)]
pub struct UpdateLeadFlowRule {
    pub name: RuleName,
    pub source: Option<String>,
    pub match_type: MatchType,
    pub conditions: Vec<Condition>,
    pub is_default: bool,
    pub is_paused: bool,
    pub target: RuleTarget,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{Amount, PersonName};

    fn lead(source: Option<&str>, city: Option<&str>, price: Option<i64>) -> NewPerson {
        NewPerson::new(
            HubId::new(1).unwrap(),
            PersonName::new("Sam Buyer").unwrap(),
            None,
            None,
            source.map(str::to_string),
            None,
            city.map(str::to_string),
            price.map(|p| Amount::new(p).unwrap()),
        )
    }

    fn rule(id: i32, sort: i32, match_type: MatchType, conditions: Vec<Condition>) -> LeadFlowRule {
        let now = Utc::now().naive_utc();
        LeadFlowRule {
            id: LeadFlowRuleId::new(id).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            name: RuleName::new(format!("Rule {id}")).unwrap(),
            source: None,
            match_type,
            conditions,
            is_default: false,
            is_paused: false,
            sort,
            target: RuleTarget {
                assign_user_id: Some(UserId::new(id).unwrap()),
                ..RuleTarget::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    fn default_rule(id: i32) -> LeadFlowRule {
        LeadFlowRule {
            is_default: true,
            ..rule(id, 0, MatchType::All, vec![])
        }
    }

    fn city_is(city: &str) -> Condition {
        Condition::new(LeadField::City, ConditionOperator::Equals, city)
    }

    #[test]
    fn source_filter_folds_non_ascii_case() {
        let mut bound = rule(1, 0, MatchType::All, vec![]);
        bound.source = Some("ÉCOLE Realty".to_string());

        assert!(bound.matches(&lead(Some(" école realty "), None, None)));
        assert!(!bound.matches(&lead(Some("Zillow"), None, None)));
        assert!(!bound.matches(&lead(None, None, None)));
    }

    #[test]
    fn text_conditions_ignore_case_and_whitespace() {
        let l = lead(Some("Zillow"), Some("Austin"), None);
        assert!(city_is("  austin ").matches(&l));
        assert!(Condition::new(LeadField::Source, ConditionOperator::Contains, "ZILL").matches(&l));
        assert!(Condition::new(LeadField::City, ConditionOperator::StartsWith, "aus").matches(&l));
        assert!(!Condition::new(LeadField::City, ConditionOperator::NotEquals, "AUSTIN").matches(&l));
    }

    #[test]
    fn empty_checks_treat_missing_values_as_empty() {
        let l = lead(None, None, None);
        assert!(Condition::new(LeadField::City, ConditionOperator::IsEmpty, "").matches(&l));
        assert!(!Condition::new(LeadField::City, ConditionOperator::IsNotEmpty, "").matches(&l));
        assert!(Condition::new(LeadField::City, ConditionOperator::NotEquals, "Austin").matches(&l));
        assert!(!Condition::new(LeadField::City, ConditionOperator::Equals, "").matches(&l));
    }

    #[test]
    fn numeric_conditions_require_numbers_on_both_sides() {
        let l = lead(None, None, Some(500_000));
        assert!(Condition::new(LeadField::Price, ConditionOperator::GreaterThan, "400000").matches(&l));
        assert!(!Condition::new(LeadField::Price, ConditionOperator::LessThan, "400000").matches(&l));
        assert!(!Condition::new(LeadField::Price, ConditionOperator::GreaterThan, "lots").matches(&l));

        let no_price = lead(None, None, None);
        assert!(!Condition::new(LeadField::Price, ConditionOperator::LessThan, "1").matches(&no_price));
    }

    #[test]
    fn match_type_all_requires_every_condition() {
        let l = lead(Some("Zillow"), Some("Austin"), None);
        let r = rule(
            1,
            0,
            MatchType::All,
            vec![
                city_is("Austin"),
                Condition::new(LeadField::Source, ConditionOperator::Equals, "Realtor"),
            ],
        );
        assert!(!r.conditions_match(&l));

        let any = LeadFlowRule {
            match_type: MatchType::Any,
            ..r
        };
        assert!(any.conditions_match(&l));
    }

    #[test]
    fn first_matching_rule_by_sort_wins() {
        let l = lead(None, Some("Austin"), None);
        let rules = vec![
            rule(1, 5, MatchType::All, vec![city_is("Austin")]),
            rule(2, 1, MatchType::All, vec![city_is("Dallas")]),
            rule(3, 2, MatchType::All, vec![city_is("Austin")]),
            default_rule(4),
        ];

        let selected = select_rule(&rules, &l).unwrap();
        assert_eq!(selected.id.get(), 3);
    }

    #[test]
    fn sort_ties_are_broken_by_id() {
        let l = lead(None, Some("Austin"), None);
        let rules = vec![
            rule(9, 1, MatchType::All, vec![city_is("Austin")]),
            rule(4, 1, MatchType::All, vec![city_is("Austin")]),
        ];

        assert_eq!(select_rule(&rules, &l).unwrap().id.get(), 4);
    }

    #[test]
    fn falls_back_to_default_rule() {
        let l = lead(None, Some("Houston"), None);
        let rules = vec![rule(1, 0, MatchType::All, vec![city_is("Austin")]), default_rule(2)];

        let selected = select_rule(&rules, &l).unwrap();
        assert!(selected.is_default);
        assert_eq!(selected.id.get(), 2);
    }

    #[test]
    fn paused_rules_and_foreign_sources_are_skipped() {
        let l = lead(Some("Zillow"), Some("Austin"), None);
        let paused = LeadFlowRule {
            is_paused: true,
            ..rule(1, 0, MatchType::All, vec![city_is("Austin")])
        };
        let other_source = LeadFlowRule {
            source: Some("Realtor.com".to_string()),
            ..rule(2, 1, MatchType::All, vec![])
        };
        let same_source = LeadFlowRule {
            source: Some("zillow".to_string()),
            ..rule(3, 2, MatchType::All, vec![])
        };

        let rules = vec![paused, other_source, same_source];
        assert_eq!(select_rule(&rules, &l).unwrap().id.get(), 3);
    }

    #[test]
    fn no_rule_when_nothing_matches_and_no_default() {
        let l = lead(None, Some("Houston"), None);
        let rules = vec![rule(1, 0, MatchType::All, vec![city_is("Austin")])];
        assert!(select_rule(&rules, &l).is_none());
    }

    #[test]
    fn least_loaded_team_member_is_picked() {
        let a = UserId::new(7).unwrap();
        let b = UserId::new(3).unwrap();
        let c = UserId::new(5).unwrap();

        assert_eq!(pick_team_member(&[(a, 4), (b, 2), (c, 2)]), Some(b));
        assert_eq!(pick_team_member(&[]), None);
    }

    #[test]
    fn explicit_user_beats_team_member() {
        let r = rule(2, 0, MatchType::All, vec![]);
        let member = UserId::new(99).unwrap();

        let assignment = assignment_for(&r, Some(member));
        assert_eq!(assignment.assigned_user_id, Some(UserId::new(2).unwrap()));
        assert_eq!(assignment.lead_flow_rule_id, Some(r.id));

        let team_only = LeadFlowRule {
            target: RuleTarget::default(),
            ..r
        };
        assert_eq!(
            assignment_for(&team_only, Some(member)).assigned_user_id,
            Some(member)
        );
    }
}
