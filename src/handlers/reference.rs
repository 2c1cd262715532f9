use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middlewares::current_user;
use crate::models::*;
use crate::services::ReferenceService;

fn table_from_slug(slug: &str) -> AppResult<ReferenceTable> {
    ReferenceTable::from_slug(slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown reference table: {slug}")))
}

#[utoipa::path(
    get,
    path = "/api/v1/reference/facility-types",
    tag = "reference",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Facility types with labels", body = [EnumOption]))
)]
pub async fn facility_types() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(ReferenceService::facility_types())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reference/statuses",
    tag = "reference",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Prospect statuses with labels", body = [EnumOption]))
)]
pub async fn statuses() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(ReferenceService::statuses())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reference/{table}",
    tag = "reference",
    params(("table" = String, Path, description = "lead-sources | ad-codes | services | rejection-reasons")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Rows in stored order", body = [ReferenceItem]),
        (status = 404, description = "Unknown table")
    )
)]
pub async fn list_items(
    reference_service: web::Data<ReferenceService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match table_from_slug(&path) {
        Ok(table) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            reference_service.list(table).await,
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/reference/{table}",
    tag = "reference",
    params(("table" = String, Path, description = "lead-sources | ad-codes | services | rejection-reasons")),
    request_body = ReferenceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Row created", body = ReferenceItem),
        (status = 400, description = "Blank or duplicate name"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_item(
    reference_service: web::Data<ReferenceService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<ReferenceRequest>,
) -> Result<HttpResponse> {
    let (user, table) = match current_user(&req).and_then(|u| Ok((u, table_from_slug(&path)?))) {
        Ok(found) => found,
        Err(e) => return Ok(e.error_response()),
    };
    match reference_service
        .create(&user, table, request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Created().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/reference/{table}/{id}",
    tag = "reference",
    params(
        ("table" = String, Path, description = "lead-sources | ad-codes | services | rejection-reasons"),
        ("id" = Uuid, Path, description = "Row id")
    ),
    request_body = ReferenceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Row renamed", body = ReferenceItem),
        (status = 400, description = "Blank or duplicate name"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Row not found")
    )
)]
pub async fn update_item(
    reference_service: web::Data<ReferenceService>,
    req: HttpRequest,
    path: web::Path<(String, Uuid)>,
    request: web::Json<ReferenceRequest>,
) -> Result<HttpResponse> {
    let (slug, id) = path.into_inner();
    let (user, table) = match current_user(&req).and_then(|u| Ok((u, table_from_slug(&slug)?))) {
        Ok(found) => found,
        Err(e) => return Ok(e.error_response()),
    };
    match reference_service
        .update(&user, table, id, request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/reference/{table}/{id}",
    tag = "reference",
    params(
        ("table" = String, Path, description = "lead-sources | ad-codes | services | rejection-reasons"),
        ("id" = Uuid, Path, description = "Row id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Row deleted"),
        (status = 400, description = "Row still used by prospects"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Row not found")
    )
)]
pub async fn delete_item(
    reference_service: web::Data<ReferenceService>,
    req: HttpRequest,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (slug, id) = path.into_inner();
    let (user, table) = match current_user(&req).and_then(|u| Ok((u, table_from_slug(&slug)?))) {
        Ok(found) => found,
        Err(e) => return Ok(e.error_response()),
    };
    match reference_service.delete(&user, table, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": format!("{} deleted", table.label())
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn reference_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reference")
            .route("/facility-types", web::get().to(facility_types))
            .route("/statuses", web::get().to(statuses))
            .route("/{table}", web::get().to(list_items))
            .route("/{table}", web::post().to(create_item))
            .route("/{table}/{id}", web::put().to(update_item))
            .route("/{table}/{id}", web::delete().to(delete_item)),
    );
}
