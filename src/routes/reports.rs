use actix_web::{HttpResponse, get, web};

use crate::auth::AuthenticatedUser;
use crate::forms::reports::ActivityReportQuery;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::reports as reports_service;

#[get("/reports/activity")]
pub async fn activity_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<ActivityReportQuery>,
) -> ApiResult {
    let report = reports_service::activity_report(repo.get_ref(), &user, params.into_inner())?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/reports/pipeline")]
pub async fn pipeline_report(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let rows = reports_service::pipeline_report(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(rows))
}
