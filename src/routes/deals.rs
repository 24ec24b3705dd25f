use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::Affected;
use crate::forms::bulk::BulkForm;
use crate::forms::deals::{DealForm, DealsQuery};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::deals as deals_service;

#[get("/deals")]
pub async fn list_deals(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<DealsQuery>,
    server_config: web::Data<ServerConfig>,
) -> ApiResult {
    let mut params = params.into_inner();
    params.per_page.get_or_insert(server_config.default_page_size);

    let page = deals_service::list_deals(repo.get_ref(), &user, params)?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/deals")]
pub async fn create_deal(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<DealForm>,
) -> ApiResult {
    let deal = deals_service::create_deal(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(deal))
}

#[post("/deals/bulk-delete")]
pub async fn bulk_delete_deals(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BulkForm>,
) -> ApiResult {
    let affected = deals_service::delete_deals(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Ok().json(Affected { affected }))
}

#[get("/deals/{deal_id}")]
pub async fn show_deal(
    deal_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let deal = deals_service::get_deal(repo.get_ref(), &user, deal_id.into_inner())?;
    Ok(HttpResponse::Ok().json(deal))
}

#[put("/deals/{deal_id}")]
pub async fn update_deal(
    deal_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<DealForm>,
) -> ApiResult {
    let deal = deals_service::update_deal(repo.get_ref(), &user, deal_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(deal))
}

#[delete("/deals/{deal_id}")]
pub async fn delete_deal(
    deal_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    deals_service::delete_deal(repo.get_ref(), &user, deal_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
