use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

use crate::middlewares::current_user;
use crate::models::*;
use crate::services::ProspectService;

#[utoipa::path(
    get,
    path = "/api/v1/prospects",
    tag = "prospects",
    params(ProspectQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prospects visible to the caller, newest first", body = ProspectPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_prospects(
    prospect_service: web::Data<ProspectService>,
    req: HttpRequest,
    query: web::Query<ProspectQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match prospect_service.list(&user, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/prospects/{id}",
    tag = "prospects",
    params(("id" = Uuid, Path, description = "Prospect id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prospect", body = ProspectRecord),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn get_prospect(
    prospect_service: web::Data<ProspectService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match prospect_service.get(&user, path.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(record))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/prospects",
    tag = "prospects",
    request_body = ProspectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Prospect created", body = ProspectRecord),
        (status = 400, description = "First invalid or missing field")
    )
)]
pub async fn create_prospect(
    prospect_service: web::Data<ProspectService>,
    req: HttpRequest,
    request: web::Json<ProspectRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match prospect_service.create(&user, request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Created().json(ApiResponse::success(record))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/prospects/{id}",
    tag = "prospects",
    params(("id" = Uuid, Path, description = "Prospect id")),
    request_body = ProspectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prospect replaced", body = ProspectRecord),
        (status = 400, description = "First invalid or missing field"),
        (status = 403, description = "Reassignment is admin only"),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn update_prospect(
    prospect_service: web::Data<ProspectService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<ProspectRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match prospect_service
        .update(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(record))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/prospects/{id}",
    tag = "prospects",
    params(("id" = Uuid, Path, description = "Prospect id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prospect deleted"),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn delete_prospect(
    prospect_service: web::Data<ProspectService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match prospect_service.delete(&user, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Prospect deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prospect_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prospects")
            .route("", web::get().to(list_prospects))
            .route("", web::post().to(create_prospect))
            .route("/{id}", web::get().to(get_prospect))
            .route("/{id}", web::put().to(update_prospect))
            .route("/{id}", web::delete().to(delete_prospect)),
    );
}
