use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{HubId, UserEmail, UserName};
use crate::domain::user::NewUser;
use crate::forms::FormError;

/// Body of `POST /users`: registers an agent or a lender.
#[derive(Debug, Deserialize, Validate)]
pub struct AddUserForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub is_lender: bool,
}

impl AddUserForm {
    pub fn into_domain(self, hub_id: HubId) -> Result<NewUser, FormError> {
        self.validate()?;
        Ok(NewUser::new(
            hub_id,
            UserName::new(self.name).map_err(|_| FormError::InvalidName)?,
            UserEmail::new(self.email).map_err(|_| FormError::InvalidEmail)?,
            self.is_lender,
            !self.is_lender,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lender_is_not_a_user() {
        let form = AddUserForm {
            name: "Bank".to_string(),
            email: "loans@bank.test".to_string(),
            is_lender: true,
        };

        let user = form.into_domain(HubId::new(1).unwrap()).unwrap();

        assert!(user.is_lender);
        assert!(!user.is_user);
    }

    #[test]
    fn invalid_email_fails_validation() {
        let form = AddUserForm {
            name: "Agent".to_string(),
            email: "nope".to_string(),
            is_lender: false,
        };
        assert!(form.into_domain(HubId::new(1).unwrap()).is_err());
    }
}
