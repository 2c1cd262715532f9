use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::middlewares::current_user;
use crate::models::*;
use crate::reports::Overview;
use crate::services::ReportService;

#[utoipa::path(
    get,
    path = "/api/v1/reports/overview",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Totals, per-status counts and overall conversion", body = Overview))
)]
pub async fn overview(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.overview(&user, &query).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/sources",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Paid sources, then the Organic roll-up", body = ReportResponse))
)]
pub async fn sources(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.sources(&user, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/ad-codes",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Ad codes with ad-id breakdown", body = ReportResponse))
)]
pub async fn ad_codes(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.ad_codes(&user, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/services",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Breakdown by service", body = ReportResponse))
)]
pub async fn services(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.services(&user, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/cities",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Breakdown by city", body = ReportResponse))
)]
pub async fn cities(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.cities(&user, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/cs-performance",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Breakdown by person in charge", body = ReportResponse))
)]
pub async fn cs_performance(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.cs_performance(&user, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/day-activity",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Seven rows, Sunday first", body = ReportResponse))
)]
pub async fn day_activity(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.day_activity(&user, &query).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/heatmap",
    tag = "reports",
    params(ReportQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "168 weekday/hour cells", body = HeatmapResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn heatmap(
    report_service: web::Data<ReportService>,
    req: HttpRequest,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match report_service.heatmap(&user, &query).await {
        Ok(map) => Ok(HttpResponse::Ok().json(ApiResponse::success(map))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/overview", web::get().to(overview))
            .route("/sources", web::get().to(sources))
            .route("/ad-codes", web::get().to(ad_codes))
            .route("/services", web::get().to(services))
            .route("/cities", web::get().to(cities))
            .route("/cs-performance", web::get().to(cs_performance))
            .route("/day-activity", web::get().to(day_activity))
            .route("/heatmap", web::get().to(heatmap)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::middlewares::AuthMiddleware;
    use crate::services::ReportSettings;
    use crate::store::RecordStore;
    use crate::test_utils::*;
    use crate::utils::JwtService;
    use actix_web::{App, http::StatusCode, test};

    fn token(jwt: &JwtService, role: UserRole) -> String {
        let user = CurrentUser {
            id: uuid::Uuid::new_v4(),
            full_name: "Tester".to_string(),
            role,
        };
        jwt.generate_access_token(&user).unwrap()
    }

    #[actix_web::test]
    async fn test_heatmap_access_by_role() {
        let db = setup_test_db().await.unwrap();
        let jwt = JwtService::new("test-secret", 900, 86400);
        let service = ReportService::new(RecordStore::new(db), ReportSettings::default());
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt.clone()))
                .app_data(web::Data::new(service))
                .service(web::scope("/api/v1").configure(report_config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/reports/heatmap?period=this_month")
            .insert_header(("Authorization", format!("Bearer {}", token(&jwt, UserRole::CsSupport))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

        let req = test::TestRequest::get()
            .uri("/api/v1/reports/heatmap")
            .insert_header(("Authorization", format!("Bearer {}", token(&jwt, UserRole::Admin))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["heatmap"]["cells"].as_array().unwrap().len(), 168);

        // cs_support still gets the other reports
        let req = test::TestRequest::get()
            .uri("/api/v1/reports/day-activity")
            .insert_header(("Authorization", format!("Bearer {}", token(&jwt, UserRole::CsSupport))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_missing_token_rejected() {
        let db = setup_test_db().await.unwrap();
        let jwt = JwtService::new("test-secret", 900, 86400);
        let service = ReportService::new(RecordStore::new(db), ReportSettings::default());
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt))
                .app_data(web::Data::new(service))
                .service(web::scope("/api/v1").configure(report_config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/reports/overview")
            .to_request();
        let err = test::try_call_service(&app, req).await.err().unwrap();
        assert_eq!(
            err.as_response_error().error_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
