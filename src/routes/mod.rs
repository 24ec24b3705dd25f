//! JSON handlers mounted under `/api/v1`.
//!
//! Handlers stay thin: they extract the caller and the request data, call a
//! service and turn its result into a response. Every failure is rendered by
//! [`ApiError`] as `{ "error": message }`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, error, web};
use serde_json::json;
use thiserror::Error;

use crate::services::ServiceError;

pub mod activities;
pub mod deal_categories;
pub mod deals;
pub mod groups;
pub mod lead_flow_rules;
pub mod people;
pub mod reports;
pub mod users;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => ApiError::Unauthorized,
            ServiceError::Forbidden => ApiError::Forbidden,
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Form(message) => ApiError::Unprocessable(message),
            ServiceError::TypeConstraint(err) => ApiError::Unprocessable(err.to_string()),
            ServiceError::Conflict(message) => ApiError::Conflict(message),
            ServiceError::Internal(message) => {
                log::error!("Request failed: {message}");
                ApiError::Internal
            }
        }
    }
}

pub type ApiResult = Result<HttpResponse, ApiError>;

/// Registers the extractor configs and every handler of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Unprocessable(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Unprocessable(err.to_string()).into()
    }))
    .app_data(
        web::PathConfig::default().error_handler(|_err, _req| error::Error::from(ApiError::NotFound)),
    )
    .service(
        web::scope("/api/v1")
            .service(users::list_users)
            .service(users::add_user)
            .service(people::list_people)
            .service(people::create_person)
            .service(people::bulk_delete_people)
            .service(people::import_people)
            .service(people::show_person)
            .service(people::update_person)
            .service(people::delete_person)
            .service(people::assign_person)
            .service(people::create_lead)
            .service(lead_flow_rules::preview_lead)
            .service(lead_flow_rules::list_rules)
            .service(lead_flow_rules::create_rule)
            .service(lead_flow_rules::show_rule)
            .service(lead_flow_rules::update_rule)
            .service(lead_flow_rules::delete_rule)
            .service(lead_flow_rules::reorder_rule)
            .service(deals::list_deals)
            .service(deals::create_deal)
            .service(deals::bulk_delete_deals)
            .service(deals::show_deal)
            .service(deals::update_deal)
            .service(deals::delete_deal)
            .service(deal_categories::list_stages)
            .service(deal_categories::create_stage)
            .service(deal_categories::rename_stage)
            .service(deal_categories::delete_stage)
            .service(deal_categories::reorder_stage)
            .service(deal_categories::list_types)
            .service(deal_categories::create_type)
            .service(deal_categories::rename_type)
            .service(deal_categories::delete_type)
            .service(deal_categories::reorder_type)
            .service(activities::list_calls)
            .service(activities::create_call)
            .service(activities::delete_call)
            .service(activities::list_emails)
            .service(activities::create_email)
            .service(activities::delete_email)
            .service(activities::list_appointments)
            .service(activities::create_appointment)
            .service(activities::update_appointment)
            .service(activities::delete_appointment)
            .service(groups::list_ponds)
            .service(groups::create_pond)
            .service(groups::show_pond)
            .service(groups::update_pond)
            .service(groups::delete_pond)
            .service(groups::list_teams)
            .service(groups::create_team)
            .service(groups::show_team)
            .service(groups::update_team)
            .service(groups::delete_team)
            .service(reports::activity_report)
            .service(reports::pipeline_report),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;
    use crate::forms::FormError;

    #[actix_web::test]
    async fn form_errors_render_as_unprocessable() {
        let err = ApiError::from(ServiceError::from(FormError::InvalidName));
        let response = err.error_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"invalid name"}"#);
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = ApiError::from(ServiceError::Internal("disk I/O error".to_string()));
        assert_eq!(err.to_string(), "internal server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn conflicts_keep_their_message() {
        let err = ApiError::from(ServiceError::Conflict("stage in use".to_string()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "stage in use");
    }
}
