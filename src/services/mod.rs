//! Business workflows behind the HTTP handlers.
//!
//! Services are generic over the repository traits so they can be exercised
//! with the mock repository in tests.

use thiserror::Error;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{HubId, TypeConstraintError};
use crate::domain::user::User;
use crate::forms::FormError;
use crate::repository::UserWriter;
use crate::repository::errors::RepositoryError;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE, SERVICE_AGENT_ROLE};

pub mod activities;
pub mod deal_categories;
pub mod deals;
pub mod groups;
pub mod lead_flow_rules;
pub mod leads;
pub mod people;
pub mod reports;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthorized,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(message) => ServiceError::Form(message),
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Fails with [`ServiceError::Forbidden`] unless `user` carries `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Checks the access role and returns the caller's hub.
pub(crate) fn access_hub(user: &AuthenticatedUser) -> ServiceResult<HubId> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    Ok(HubId::new(user.hub_id)?)
}

/// Checks the admin role and returns the caller's hub.
pub(crate) fn admin_hub(user: &AuthenticatedUser) -> ServiceResult<HubId> {
    ensure_role(user, SERVICE_ADMIN_ROLE)?;
    Ok(HubId::new(user.hub_id)?)
}

/// Agents without the admin role only see the people assigned to them.
pub(crate) fn is_scoped_agent(user: &AuthenticatedUser) -> bool {
    user.has_role(SERVICE_AGENT_ROLE) && !user.has_role(SERVICE_ADMIN_ROLE)
}

/// Upserts the caller's own user row from the token claims.
pub fn current_user<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let new_user = crate::domain::user::NewUser::try_from(user)?;
    repo.create_or_update_user(&new_user).map_err(|err| {
        log::error!("Failed to upsert user {}: {err}", user.email);
        ServiceError::from(err)
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::auth::AuthenticatedUser;
    use crate::domain::person::Person;
    use crate::domain::types::{HubId, PersonId, PersonName, PublicId, UserEmail, UserId, UserName};
    use crate::domain::user::User;

    pub const HUB: i32 = 42;

    fn token_user(id: &str, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: id.to_string(),
            email: format!("user{id}@example.com"),
            hub_id: HUB,
            name: format!("User {id}"),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
        }
    }

    pub fn admin() -> AuthenticatedUser {
        token_user("1", &["crm", "crm_admin"])
    }

    pub fn agent() -> AuthenticatedUser {
        token_user("2", &["crm", "crm_agent"])
    }

    pub fn member() -> AuthenticatedUser {
        token_user("3", &["crm"])
    }

    pub fn outsider() -> AuthenticatedUser {
        token_user("4", &[])
    }

    pub fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn user(id: i32) -> User {
        User {
            id: UserId::new(id).unwrap(),
            hub_id: HubId::new(HUB).unwrap(),
            name: UserName::new(format!("User {id}")).unwrap(),
            email: UserEmail::new(format!("user{id}@example.com")).unwrap(),
            is_lender: false,
            is_user: true,
        }
    }

    pub fn person(id: i32, assigned_user_id: Option<i32>) -> Person {
        Person {
            id: PersonId::new(id).unwrap(),
            public_id: PublicId::new(),
            hub_id: HubId::new(HUB).unwrap(),
            name: PersonName::new(format!("Person {id}")).unwrap(),
            email: None,
            phone: None,
            source: None,
            stage: None,
            city: None,
            price: None,
            assigned_user_id: assigned_user_id.map(|id| UserId::new(id).unwrap()),
            assigned_lender_id: None,
            pond_id: None,
            lead_flow_rule_id: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }
}
