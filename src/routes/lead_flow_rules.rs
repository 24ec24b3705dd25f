use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::lead_flow_rules::{LeadFlowRuleForm, ReorderForm};
use crate::forms::people::PersonForm;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::{lead_flow_rules as rules_service, leads as leads_service};

#[post("/lead-flow-rules/preview")]
pub async fn preview_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PersonForm>,
) -> ApiResult {
    let preview = leads_service::preview_lead(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Ok().json(preview))
}

#[get("/lead-flow-rules")]
pub async fn list_rules(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let rules = rules_service::list_rules(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(rules))
}

#[post("/lead-flow-rules")]
pub async fn create_rule(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<LeadFlowRuleForm>,
) -> ApiResult {
    let rule = rules_service::create_rule(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(rule))
}

#[get("/lead-flow-rules/{rule_id}")]
pub async fn show_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let rule = rules_service::get_rule(repo.get_ref(), &user, rule_id.into_inner())?;
    Ok(HttpResponse::Ok().json(rule))
}

#[put("/lead-flow-rules/{rule_id}")]
pub async fn update_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<LeadFlowRuleForm>,
) -> ApiResult {
    let rule = rules_service::update_rule(repo.get_ref(), &user, rule_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(rule))
}

#[delete("/lead-flow-rules/{rule_id}")]
pub async fn delete_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    rules_service::delete_rule(repo.get_ref(), &user, rule_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/lead-flow-rules/{rule_id}/reorder")]
pub async fn reorder_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReorderForm>,
) -> ApiResult {
    let rules = rules_service::reorder_rule(repo.get_ref(), &user, rule_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(rules))
}
