use actix_web::{HttpResponse, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::users::AddUserForm;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::users as users_service;

#[get("/users")]
pub async fn list_users(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> ApiResult {
    let users = users_service::list_users(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(users))
}

#[post("/users")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddUserForm>,
) -> ApiResult {
    let added = users_service::add_user(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(added))
}
