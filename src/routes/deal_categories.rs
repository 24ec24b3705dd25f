use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::deal_categories::CategoryForm;
use crate::forms::lead_flow_rules::ReorderForm;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::deal_categories as categories_service;

#[get("/deal-stages")]
pub async fn list_stages(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let stages = categories_service::list_stages(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(stages))
}

#[post("/deal-stages")]
pub async fn create_stage(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> ApiResult {
    let stage = categories_service::create_stage(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(stage))
}

#[put("/deal-stages/{stage_id}")]
pub async fn rename_stage(
    stage_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> ApiResult {
    let stage =
        categories_service::rename_stage(repo.get_ref(), &user, stage_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(stage))
}

#[delete("/deal-stages/{stage_id}")]
pub async fn delete_stage(
    stage_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    categories_service::delete_stage(repo.get_ref(), &user, stage_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/deal-stages/{stage_id}/reorder")]
pub async fn reorder_stage(
    stage_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReorderForm>,
) -> ApiResult {
    let stages =
        categories_service::reorder_stage(repo.get_ref(), &user, stage_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(stages))
}

#[get("/deal-types")]
pub async fn list_types(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let types = categories_service::list_types(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(types))
}

#[post("/deal-types")]
pub async fn create_type(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> ApiResult {
    let deal_type = categories_service::create_type(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(deal_type))
}

#[put("/deal-types/{type_id}")]
pub async fn rename_type(
    type_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> ApiResult {
    let deal_type =
        categories_service::rename_type(repo.get_ref(), &user, type_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(deal_type))
}

#[delete("/deal-types/{type_id}")]
pub async fn delete_type(
    type_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    categories_service::delete_type(repo.get_ref(), &user, type_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/deal-types/{type_id}/reorder")]
pub async fn reorder_type(
    type_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReorderForm>,
) -> ApiResult {
    let types =
        categories_service::reorder_type(repo.get_ref(), &user, type_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(types))
}
