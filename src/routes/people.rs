use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::dto::Affected;
use crate::forms::bulk::BulkForm;
use crate::forms::people::{AssignPersonForm, PeopleQuery, PersonForm, UploadPeopleForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::ApiResult;
use crate::services::{leads as leads_service, people as people_service};

#[get("/people")]
pub async fn list_people(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<PeopleQuery>,
    server_config: web::Data<ServerConfig>,
) -> ApiResult {
    let mut params = params.into_inner();
    params.per_page.get_or_insert(server_config.default_page_size);

    let page = people_service::list_people(repo.get_ref(), &user, params)?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/people")]
pub async fn create_person(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PersonForm>,
) -> ApiResult {
    let person = people_service::create_person(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(person))
}

#[post("/people/bulk-delete")]
pub async fn bulk_delete_people(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BulkForm>,
) -> ApiResult {
    let affected = people_service::delete_people(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Ok().json(Affected { affected }))
}

#[post("/people/import")]
pub async fn import_people(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadPeopleForm>,
) -> ApiResult {
    let affected = people_service::import_people(repo.get_ref(), &user, &mut form)?;
    Ok(HttpResponse::Created().json(Affected { affected }))
}

#[get("/people/{person_id}")]
pub async fn show_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    let person = people_service::get_person(repo.get_ref(), &user, person_id.into_inner())?;
    Ok(HttpResponse::Ok().json(person))
}

#[put("/people/{person_id}")]
pub async fn update_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PersonForm>,
) -> ApiResult {
    let person =
        people_service::update_person(repo.get_ref(), &user, person_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(person))
}

#[delete("/people/{person_id}")]
pub async fn delete_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> ApiResult {
    people_service::delete_person(repo.get_ref(), &user, person_id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/people/{person_id}/assign")]
pub async fn assign_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AssignPersonForm>,
) -> ApiResult {
    let person =
        people_service::assign_person(repo.get_ref(), &user, person_id.into_inner(), form)?;
    Ok(HttpResponse::Ok().json(person))
}

/// Lead intake: the person is created and routed by the hub's rules.
#[post("/leads")]
pub async fn create_lead(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<PersonForm>,
) -> ApiResult {
    let person = leads_service::create_lead(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(person))
}
