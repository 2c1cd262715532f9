use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::external::{GeoService, Region};
use crate::models::*;

#[utoipa::path(
    get,
    path = "/api/v1/geo/provinces",
    tag = "geo",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Indonesian provinces", body = [Region]),
        (status = 502, description = "Region API unavailable")
    )
)]
pub async fn provinces(geo_service: web::Data<GeoService>) -> Result<HttpResponse> {
    match geo_service.provinces().await {
        Ok(regions) => Ok(HttpResponse::Ok().json(ApiResponse::success(regions))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/geo/provinces/{id}/regencies",
    tag = "geo",
    params(("id" = String, Path, description = "Numeric province id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Regencies and cities of the province", body = [Region]),
        (status = 400, description = "Province id is not numeric"),
        (status = 502, description = "Region API unavailable")
    )
)]
pub async fn regencies(
    geo_service: web::Data<GeoService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match geo_service.regencies(&path).await {
        Ok(regions) => Ok(HttpResponse::Ok().json(ApiResponse::success(regions))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn geo_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/geo")
            .route("/provinces", web::get().to(provinces))
            .route("/provinces/{id}/regencies", web::get().to(regencies)),
    );
}
