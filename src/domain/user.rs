use serde::{Deserialize, Serialize};

use crate::domain::types::{HubId, UserEmail, UserId, UserName};

/// Agent or lender known to the hub.
///
/// `is_user` marks people who signed in at least once or were added by an
/// administrator; lenders are only assignable, they never own activities.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub hub_id: HubId,
    pub name: UserName,
    pub email: UserEmail,
    pub is_lender: bool,
    pub is_user: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub hub_id: HubId,
    pub name: UserName,
    pub email: UserEmail,
    pub is_lender: bool,
    pub is_user: bool,
}

impl NewUser {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        name: UserName,
        email: UserEmail,
        is_lender: bool,
        is_user: bool,
    ) -> Self {
        Self {
            hub_id,
            name,
            email,
            is_lender,
            is_user,
        }
    }
}
