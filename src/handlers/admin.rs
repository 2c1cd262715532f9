use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::current_user;
use crate::models::*;
use crate::services::ReportService;

#[utoipa::path(
    post,
    path = "/api/v1/admin/refresh",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Store reloaded", body = RefreshResponse),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Reload failed, previous data kept")
    )
)]
pub async fn refresh_store(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.refresh(&user).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            result,
            "Data reloaded".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "admin",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": { "status": "ok" }
    })))
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").route("/refresh", web::post().to(refresh_store)));
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
