//! Diesel models representing agents and lenders.

use diesel::prelude::*;

use crate::domain::types::{HubId, TypeConstraintError, UserEmail, UserId, UserName};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub email: String,
    pub is_lender: bool,
    pub is_user: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub email: &'a str,
    pub is_lender: bool,
    pub is_user: bool,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::try_from(user.id)?,
            hub_id: HubId::try_from(user.hub_id)?,
            name: UserName::new(user.name)?,
            email: UserEmail::new(user.email)?,
            is_lender: user.is_lender,
            is_user: user.is_user,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            hub_id: user.hub_id.get(),
            name: user.name.as_str(),
            email: user.email.as_str(),
            is_lender: user.is_lender,
            is_user: user.is_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_domain_new_user() {
        let domain = DomainNewUser::new(
            HubId::new(1).expect("valid hub id"),
            UserName::new("Alice").expect("valid name"),
            UserEmail::new("Alice@Example.com").expect("valid email"),
            true,
            false,
        );
        let new: NewUser = (&domain).into();
        assert_eq!(new.hub_id, 1);
        assert_eq!(new.name, "Alice");
        assert_eq!(new.email, "alice@example.com");
        assert!(new.is_lender);
        assert!(!new.is_user);
    }

    #[test]
    fn invalid_row_is_rejected() {
        let db = User {
            id: 0,
            hub_id: 2,
            name: "Bob".into(),
            email: "b@c.d".into(),
            is_lender: false,
            is_user: true,
        };
        assert_eq!(
            DomainUser::try_from(db),
            Err(TypeConstraintError::NonPositiveId)
        );
    }
}
