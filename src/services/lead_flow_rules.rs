//! Administration of lead flow rules.

use crate::auth::AuthenticatedUser;
use crate::domain::lead_flow_rule::{LeadFlowRule, RuleTarget};
use crate::domain::types::{HubId, LeadFlowRuleId};
use crate::forms::lead_flow_rules::{LeadFlowRuleForm, LeadFlowRulePayload, ReorderForm};
use crate::repository::{GroupReader, LeadFlowRuleReader, LeadFlowRuleWriter, UserReader};
use crate::services::{ServiceError, ServiceResult, access_hub, admin_hub};

fn rule_id(id: i32) -> ServiceResult<LeadFlowRuleId> {
    LeadFlowRuleId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Rejects targets that point at users, ponds or teams of another hub.
fn check_target<R>(repo: &R, hub_id: HubId, target: &RuleTarget) -> ServiceResult<()>
where
    R: UserReader + GroupReader + ?Sized,
{
    if let Some(user_id) = target.assign_user_id
        && repo.get_user_by_id(user_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form("Unknown user".to_string()));
    }
    if let Some(lender_id) = target.assign_lender_id {
        match repo.get_user_by_id(lender_id, hub_id)? {
            Some(lender) if lender.is_lender => {}
            _ => return Err(ServiceError::Form("Unknown lender".to_string())),
        }
    }
    if let Some(pond_id) = target.assign_pond_id
        && repo.get_pond(pond_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form("Unknown pond".to_string()));
    }
    if let Some(team_id) = target.assign_team_id
        && repo.get_team(team_id, hub_id)?.is_none()
    {
        return Err(ServiceError::Form("Unknown team".to_string()));
    }
    Ok(())
}

pub fn list_rules<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<LeadFlowRule>>
where
    R: LeadFlowRuleReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    Ok(repo.list_lead_flow_rules(hub_id)?)
}

pub fn get_rule<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<LeadFlowRule>
where
    R: LeadFlowRuleReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    repo.get_lead_flow_rule_by_id(rule_id(id)?, hub_id)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a rule at the end of the evaluation order.
pub fn create_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: LeadFlowRuleForm,
) -> ServiceResult<LeadFlowRule>
where
    R: LeadFlowRuleWriter + UserReader + GroupReader + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let payload = LeadFlowRulePayload::try_from(form)?;
    check_target(repo, hub_id, &payload.target)?;

    let rule = repo.create_lead_flow_rule(&payload.into_new(hub_id))?;
    log::info!("Lead flow rule {} created in hub {hub_id}", rule.id);
    Ok(rule)
}

pub fn update_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: LeadFlowRuleForm,
) -> ServiceResult<LeadFlowRule>
where
    R: LeadFlowRuleWriter + UserReader + GroupReader + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let id = rule_id(id)?;
    let payload = LeadFlowRulePayload::try_from(form)?;
    check_target(repo, hub_id, &payload.target)?;

    Ok(repo.update_lead_flow_rule(id, hub_id, &payload.into_update())?)
}

pub fn delete_rule<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: LeadFlowRuleWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    repo.delete_lead_flow_rule(rule_id(id)?, hub_id)?;
    Ok(())
}

/// Moves a non-default rule to `position` in the evaluation order and
/// returns the reordered list.
pub fn reorder_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: ReorderForm,
) -> ServiceResult<Vec<LeadFlowRule>>
where
    R: LeadFlowRuleWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    Ok(repo.reorder_lead_flow_rule(rule_id(id)?, hub_id, form.position)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead_flow_rule::MatchType;
    use crate::domain::types::RuleName;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin, member, timestamp, user};

    fn stored(id: i32) -> LeadFlowRule {
        LeadFlowRule {
            id: LeadFlowRuleId::new(id).unwrap(),
            hub_id: HubId::new(HUB).unwrap(),
            name: RuleName::new("Rule").unwrap(),
            source: None,
            match_type: MatchType::All,
            conditions: vec![],
            is_default: false,
            is_paused: false,
            sort: 0,
            target: RuleTarget::default(),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn form(json: &str) -> LeadFlowRuleForm {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn members_cannot_create_rules() {
        let repo = MockRepository::new();
        assert!(matches!(
            create_rule(&repo, &member(), form(r#"{"name": "x"}"#)),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn target_user_must_exist() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|_, _| Ok(None));
        repo.expect_create_lead_flow_rule().never();

        let result = create_rule(&repo, &admin(), form(r#"{"name": "x", "assign_user_id": 5}"#));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn admin_creates_rule() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id, _| Ok(Some(user(id.get()))));
        repo.expect_create_lead_flow_rule()
            .withf(|rule| rule.is_default && rule.hub_id.get() == HUB)
            .returning(|_| Ok(stored(3)));

        let rule = create_rule(
            &repo,
            &admin(),
            form(r#"{"name": "Fallback", "is_default": true, "assign_user_id": 5}"#),
        )
        .unwrap();

        assert_eq!(rule.id.get(), 3);
    }

    #[test]
    fn missing_rule_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_lead_flow_rule_by_id()
            .returning(|_, _| Ok(None));

        assert!(matches!(
            get_rule(&repo, &member(), 4),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn reordering_unknown_rule_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_reorder_lead_flow_rule()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            reorder_rule(&repo, &admin(), 4, ReorderForm { position: 0 }),
            Err(ServiceError::NotFound)
        ));
    }
}
