use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::groups::GroupForm;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::groups as groups_service;

#[get("/ponds")]
pub async fn list_ponds(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let ponds = groups_service::list_ponds(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(ponds))
}

#[post("/ponds")]
pub async fn create_pond(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<GroupForm>,
) -> ApiResult {
    let pond = groups_service::create_pond(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(pond))
}

#[get("/ponds/{pond_id}")]
pub async fn show_pond(
    pond_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let pond = groups_service::get_pond(repo.get_ref(), &user, pond_id.into_inner())?;
    Ok(HttpResponse::Ok().json(pond))
}

#[put("/ponds/{pond_id}")]
pub async fn update_pond(
    pond_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<GroupForm>,
) -> ApiResult {
    let pond = groups_service::update_pond(repo.get_ref(), &user, pond_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(pond))
}

#[delete("/ponds/{pond_id}")]
pub async fn delete_pond(
    pond_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    groups_service::delete_pond(repo.get_ref(), &user, pond_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/teams")]
pub async fn list_teams(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let teams = groups_service::list_teams(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(teams))
}

#[post("/teams")]
pub async fn create_team(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<GroupForm>,
) -> ApiResult {
    let team = groups_service::create_team(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(team))
}

#[get("/teams/{team_id}")]
pub async fn show_team(
    team_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let team = groups_service::get_team(repo.get_ref(), &user, team_id.into_inner())?;
    Ok(HttpResponse::Ok().json(team))
}

#[put("/teams/{team_id}")]
pub async fn update_team(
    team_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<GroupForm>,
) -> ApiResult {
    let team = groups_service::update_team(repo.get_ref(), &user, team_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(team))
}

#[delete("/teams/{team_id}")]
pub async fn delete_team(
    team_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    groups_service::delete_team(repo.get_ref(), &user, team_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
