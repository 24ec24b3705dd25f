//! Lead intake: create a person and route it through the hub's rules.

use crate::auth::AuthenticatedUser;
use crate::domain::lead_flow_rule::{LeadFlowRule, assignment_for, select_rule};
use crate::domain::person::{NewPerson, Person};
use crate::domain::types::HubId;
use crate::dto::LeadPreview;
use crate::forms::people::{PersonForm, PersonPayload};
use crate::repository::{LeadFlowRuleReader, PersonWriter};
use crate::services::{ServiceResult, access_hub};

fn matching_rule<R>(repo: &R, hub_id: HubId, lead: &NewPerson) -> ServiceResult<Option<LeadFlowRule>>
where
    R: LeadFlowRuleReader + ?Sized,
{
    let rules = repo.list_lead_flow_rules(hub_id).map_err(|err| {
        log::error!("Failed to load lead flow rules: {err}");
        err
    })?;
    Ok(select_rule(&rules, lead).cloned())
}

/// Creates a person from an incoming lead and applies the first matching
/// lead flow rule.
pub fn create_lead<R>(repo: &R, user: &AuthenticatedUser, form: PersonForm) -> ServiceResult<Person>
where
    R: LeadFlowRuleReader + PersonWriter + ?Sized,
{
    let hub_id = access_hub(user)?;
    let lead = PersonPayload::try_from(form)?.into_new_person(hub_id);

    let Some(rule) = matching_rule(repo, hub_id, &lead)? else {
        log::info!("No lead flow rule matched lead {}", lead.public_id);
        return Ok(repo.create_routed_person(&lead, None)?);
    };

    let team_id = rule
        .target
        .assign_user_id
        .is_none()
        .then_some(rule.target.assign_team_id)
        .flatten();

    let assignment = assignment_for(&rule, None);
    let person = repo.create_routed_person(&lead.with_assignment(assignment), team_id)?;

    log::info!(
        "Lead {} routed by rule {} ({}) to user {:?}",
        person.id,
        rule.id,
        rule.name.as_str(),
        person.assigned_user_id.map(|id| id.get())
    );
    Ok(person)
}

/// Reports which rule would route the lead, without saving anything.
pub fn preview_lead<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PersonForm,
) -> ServiceResult<LeadPreview>
where
    R: LeadFlowRuleReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    let lead = PersonPayload::try_from(form)?.into_new_person(hub_id);

    Ok(LeadPreview {
        rule: matching_rule(repo, hub_id, &lead)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead_flow_rule::{
        Condition, ConditionOperator, LeadField, MatchType, RuleTarget,
    };
    use crate::domain::types::{LeadFlowRuleId, RuleName, TeamId, UserId};
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{HUB, member, outsider, person, timestamp};

    fn rule(id: i32, is_default: bool, target: RuleTarget, conditions: Vec<Condition>) -> LeadFlowRule {
        LeadFlowRule {
            id: LeadFlowRuleId::new(id).unwrap(),
            hub_id: HubId::new(HUB).unwrap(),
            name: RuleName::new(format!("Rule {id}")).unwrap(),
            source: None,
            match_type: MatchType::All,
            conditions,
            is_default,
            is_paused: false,
            sort: id,
            target,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn austin_form() -> PersonForm {
        PersonForm {
            name: "Jane".to_string(),
            city: Some("Austin".to_string()),
            ..Default::default()
        }
    }

    fn rules() -> Vec<LeadFlowRule> {
        vec![
            rule(
                1,
                false,
                RuleTarget {
                    assign_team_id: Some(TeamId::new(6).unwrap()),
                    ..Default::default()
                },
                vec![Condition::new(LeadField::City, ConditionOperator::Equals, "austin")],
            ),
            rule(
                2,
                true,
                RuleTarget {
                    assign_user_id: Some(UserId::new(9).unwrap()),
                    ..Default::default()
                },
                vec![],
            ),
        ]
    }

    #[test]
    fn intake_requires_access_role() {
        let repo = MockRepository::new();
        assert!(matches!(
            create_lead(&repo, &outsider(), austin_form()),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn matching_rule_routes_to_team() {
        let mut repo = MockRepository::new();
        repo.expect_list_lead_flow_rules().returning(|_| Ok(rules()));
        repo.expect_create_routed_person()
            .withf(|lead, team_id| {
                lead.assignment.lead_flow_rule_id.map(|id| id.get()) == Some(1)
                    && lead.assignment.assigned_user_id.is_none()
                    && team_id.map(|id| id.get()) == Some(6)
            })
            .returning(|_, _| Ok(person(1, Some(3))));

        let created = create_lead(&repo, &member(), austin_form()).unwrap();
        assert_eq!(created.assigned_user_id.map(|id| id.get()), Some(3));
    }

    #[test]
    fn default_rule_catches_the_rest() {
        let mut repo = MockRepository::new();
        repo.expect_list_lead_flow_rules().returning(|_| Ok(rules()));
        repo.expect_create_routed_person()
            .withf(|lead, team_id| {
                lead.assignment.assigned_user_id.map(|id| id.get()) == Some(9) && team_id.is_none()
            })
            .returning(|_, _| Ok(person(1, Some(9))));

        let form = PersonForm {
            name: "John".to_string(),
            city: Some("Dallas".to_string()),
            ..Default::default()
        };

        create_lead(&repo, &member(), form).unwrap();
    }

    #[test]
    fn lead_stays_unassigned_without_rules() {
        let mut repo = MockRepository::new();
        repo.expect_list_lead_flow_rules().returning(|_| Ok(vec![]));
        repo.expect_create_routed_person()
            .withf(|lead, team_id| lead.assignment.is_empty() && team_id.is_none())
            .returning(|_, _| Ok(person(1, None)));

        let created = create_lead(&repo, &member(), austin_form()).unwrap();
        assert!(created.assigned_user_id.is_none());
    }

    #[test]
    fn preview_does_not_persist() {
        let mut repo = MockRepository::new();
        repo.expect_list_lead_flow_rules().returning(|_| Ok(rules()));
        repo.expect_create_routed_person().never();

        let preview = preview_lead(&repo, &member(), austin_form()).unwrap();
        assert_eq!(preview.rule.map(|r| r.id.get()), Some(1));
    }
}
