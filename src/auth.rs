//! Bearer-token authentication and role checks.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::types::{HubId, TypeConstraintError, UserEmail, UserName};
use crate::domain::user::NewUser;
use crate::models::config::ServerConfig;
use crate::routes::ApiError;

/// Claims carried by the access token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub hub_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        check_role(role, &self.roles)
    }

    /// Decodes and verifies an HS256 token signed with `secret`.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

impl TryFrom<&AuthenticatedUser> for NewUser {
    type Error = TypeConstraintError;

    fn try_from(user: &AuthenticatedUser) -> Result<Self, Self::Error> {
        let hub_id = HubId::new(user.hub_id)?;
        let email = UserEmail::new(&user.email)?;
        let name = if user.name.trim().is_empty() {
            UserName::new(email.as_str())?
        } else {
            UserName::new(&user.name)?
        };
        Ok(NewUser::new(hub_id, name, email, false, true))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("Server configuration is not registered");
            return ready(Err(ApiError::Internal));
        };

        let Some(token) = bearer_token(req) else {
            return ready(Err(ApiError::Unauthorized));
        };

        ready(
            AuthenticatedUser::from_token(token, &config.secret).map_err(|err| {
                log::warn!("Rejected bearer token: {err}");
                ApiError::Unauthorized
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn claims(exp: usize) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "7".to_string(),
            email: "Agent@Example.com".to_string(),
            hub_id: 3,
            name: "Agent".to_string(),
            roles: vec!["crm".to_string(), "crm_agent".to_string()],
            exp,
        }
    }

    fn sign(user: &AuthenticatedUser, secret: &str) -> String {
        encode(
            &Header::default(),
            user,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips_claims() {
        let user = claims(4_000_000_000);
        let token = sign(&user, "secret");

        let decoded = AuthenticatedUser::from_token(&token, "secret").unwrap();

        assert_eq!(decoded, user);
        assert!(decoded.has_role("crm_agent"));
        assert!(!decoded.has_role("crm_admin"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign(&claims(4_000_000_000), "secret");
        assert!(AuthenticatedUser::from_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign(&claims(1), "secret");
        assert!(AuthenticatedUser::from_token(&token, "secret").is_err());
    }

    #[test]
    fn claims_become_user_row() {
        let user = NewUser::try_from(&claims(0)).unwrap();
        assert_eq!(user.email.as_str(), "agent@example.com");
        assert_eq!(user.hub_id.get(), 3);
        assert!(user.is_user);
    }
}
