//! Services for the hub's agents and lenders.

use crate::auth::AuthenticatedUser;
use crate::domain::user::User;
use crate::forms::users::AddUserForm;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceResult, access_hub, admin_hub};

/// Lists every user of the caller's hub, ordered by name.
pub fn list_users<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    let hub_id = access_hub(user)?;
    Ok(repo.list_users(hub_id)?)
}

/// Registers an agent or lender, updating the row when the email is known.
pub fn add_user<R>(repo: &R, user: &AuthenticatedUser, form: AddUserForm) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let hub_id = admin_hub(user)?;
    let new_user = form.into_domain(hub_id)?;

    let created = repo.create_or_update_user(&new_user)?;
    log::info!("User {} saved in hub {hub_id}", created.email.as_str());
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{admin, member, outsider, user};

    #[test]
    fn listing_requires_access_role() {
        let repo = MockRepository::new();
        assert!(matches!(
            list_users(&repo, &outsider()),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn members_can_list_users() {
        let mut repo = MockRepository::new();
        repo.expect_list_users()
            .withf(|hub_id| hub_id.get() == 42)
            .returning(|_| Ok(vec![user(1), user(2)]));

        let users = list_users(&repo, &member()).unwrap();

        assert_eq!(users.len(), 2);
    }

    #[test]
    fn adding_requires_admin() {
        let repo = MockRepository::new();
        let form = AddUserForm {
            name: "Agent".to_string(),
            email: "agent@example.com".to_string(),
            is_lender: false,
        };

        assert!(matches!(
            add_user(&repo, &member(), form),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn admin_adds_user() {
        let mut repo = MockRepository::new();
        repo.expect_create_or_update_user()
            .withf(|new_user| new_user.email.as_str() == "agent@example.com" && new_user.is_user)
            .returning(|_| Ok(user(9)));

        let form = AddUserForm {
            name: "Agent".to_string(),
            email: "Agent@Example.com".to_string(),
            is_lender: false,
        };

        let created = add_user(&repo, &admin(), form).unwrap();
        assert_eq!(created.id.get(), 9);
    }
}
