use serde::Deserialize;
use validator::Validate;

use crate::domain::group::GroupInput;
use crate::domain::types::{GroupName, HubId, UserId};
use crate::forms::{FormError, id_list, optional_id};

/// Body used to create or update a pond or a team.
///
/// `lead_user_id` is the pond owner or the team leader.
#[derive(Debug, Deserialize, Validate)]
pub struct GroupForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub lead_user_id: Option<i32>,
    #[serde(default)]
    pub member_ids: Vec<i32>,
}

impl GroupForm {
    pub fn into_input(self, hub_id: HubId) -> Result<GroupInput, FormError> {
        self.validate()?;

        let mut member_ids = id_list(&self.member_ids, "member", UserId::new)?;
        member_ids.sort_by_key(|id| id.get());
        member_ids.dedup();

        Ok(GroupInput {
            hub_id,
            name: GroupName::new(self.name).map_err(|_| FormError::InvalidName)?,
            lead_user_id: optional_id(self.lead_user_id, "user", UserId::new)?,
            member_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_deduplicated() {
        let form: GroupForm =
            serde_json::from_str(r#"{"name": "North team", "member_ids": [4, 2, 4]}"#).unwrap();

        let input = form.into_input(HubId::new(1).unwrap()).unwrap();

        let ids: Vec<i32> = input.member_ids.iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(input.lead_user_id.is_none());
    }

    #[test]
    fn bad_member_id_is_rejected() {
        let form: GroupForm =
            serde_json::from_str(r#"{"name": "North", "member_ids": [0]}"#).unwrap();
        assert!(matches!(
            form.into_input(HubId::new(1).unwrap()),
            Err(FormError::InvalidId("member"))
        ));
    }
}
