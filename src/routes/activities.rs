//! Activity timelines nested under `/people/{person_id}`.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::activities::{ActivityQuery, AppointmentForm, CallForm, EmailForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::activities as activities_service;

#[get("/people/{person_id}/calls")]
pub async fn list_calls(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<ActivityQuery>,
    server_config: web::Data<ServerConfig>,
) -> ApiResult {
    let mut params = params.into_inner();
    params.per_page.get_or_insert(server_config.default_page_size);

    let page =
        activities_service::list_calls(repo.get_ref(), &user, person_id.into_inner(), params)?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/people/{person_id}/calls")]
pub async fn create_call(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CallForm>,
) -> ApiResult {
    let call =
        activities_service::create_call(repo.get_ref(), &user, person_id.into_inner(), form)?;
    Ok(HttpResponse::Created().json(call))
}

#[delete("/people/{person_id}/calls/{call_id}")]
pub async fn delete_call(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let (person_id, call_id) = path.into_inner();
    activities_service::delete_call(repo.get_ref(), &user, person_id, call_id)?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/people/{person_id}/emails")]
pub async fn list_emails(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<ActivityQuery>,
    server_config: web::Data<ServerConfig>,
) -> ApiResult {
    let mut params = params.into_inner();
    params.per_page.get_or_insert(server_config.default_page_size);

    let page =
        activities_service::list_emails(repo.get_ref(), &user, person_id.into_inner(), params)?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/people/{person_id}/emails")]
pub async fn create_email(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<EmailForm>,
) -> ApiResult {
    let email =
        activities_service::create_email(repo.get_ref(), &user, person_id.into_inner(), form)?;
    Ok(HttpResponse::Created().json(email))
}

#[delete("/people/{person_id}/emails/{email_id}")]
pub async fn delete_email(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let (person_id, email_id) = path.into_inner();
    activities_service::delete_email(repo.get_ref(), &user, person_id, email_id)?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/people/{person_id}/appointments")]
pub async fn list_appointments(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<ActivityQuery>,
    server_config: web::Data<ServerConfig>,
) -> ApiResult {
    let mut params = params.into_inner();
    params.per_page.get_or_insert(server_config.default_page_size);

    let page =
        activities_service::list_appointments(repo.get_ref(), &user, person_id.into_inner(), params)?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/people/{person_id}/appointments")]
pub async fn create_appointment(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AppointmentForm>,
) -> ApiResult {
    let appointment = activities_service::create_appointment(
        repo.get_ref(),
        &user,
        person_id.into_inner(),
        form,
    )?;
    Ok(HttpResponse::Created().json(appointment))
}

#[put("/people/{person_id}/appointments/{appointment_id}")]
pub async fn update_appointment(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AppointmentForm>,
) -> ApiResult {
    let (person_id, appointment_id) = path.into_inner();
    let appointment = activities_service::update_appointment(
        repo.get_ref(),
        &user,
        person_id,
        appointment_id,
        form,
    )?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[delete("/people/{person_id}/appointments/{appointment_id}")]
pub async fn delete_appointment(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let (person_id, appointment_id) = path.into_inner();
    activities_service::delete_appointment(repo.get_ref(), &user, person_id, appointment_id)?;
    Ok(HttpResponse::NoContent().finish())
}
