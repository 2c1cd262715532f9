use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{FacilityType, ProspectStatus, UserRole};
use crate::external::Region;
use crate::handlers;
use crate::models::*;
use crate::reports::{
    ConversionBand, DateBasis, Heatmap, HeatmapCell, Overview, Period, ReportRow, StatusCount,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::user::me,
        handlers::user::list_users,
        handlers::user::create_user,
        handlers::prospect::list_prospects,
        handlers::prospect::get_prospect,
        handlers::prospect::create_prospect,
        handlers::prospect::update_prospect,
        handlers::prospect::delete_prospect,
        handlers::reference::facility_types,
        handlers::reference::statuses,
        handlers::reference::list_items,
        handlers::reference::create_item,
        handlers::reference::update_item,
        handlers::reference::delete_item,
        handlers::report::overview,
        handlers::report::sources,
        handlers::report::ad_codes,
        handlers::report::services,
        handlers::report::cities,
        handlers::report::cs_performance,
        handlers::report::day_activity,
        handlers::report::heatmap,
        handlers::geo::provinces,
        handlers::geo::regencies,
        handlers::admin::refresh_store,
        handlers::admin::health,
    ),
    components(
        schemas(
            UserRole,
            UserProfile,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            CreateUserRequest,
            FacilityType,
            ProspectStatus,
            UserRef,
            ProspectRecord,
            ProspectRequest,
            ProspectPage,
            ReferenceTable,
            ReferenceItem,
            ReferenceRequest,
            EnumOption,
            Period,
            DateBasis,
            ConversionBand,
            ReportRow,
            ReportResponse,
            StatusCount,
            Overview,
            HeatmapCell,
            Heatmap,
            HeatmapResponse,
            RefreshResponse,
            Region,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and token refresh"),
        (name = "users", description = "Dashboard users"),
        (name = "prospects", description = "Prospect records"),
        (name = "reference", description = "Master data and fixed enumerations"),
        (name = "reports", description = "Dashboard aggregations"),
        (name = "geo", description = "Indonesian province and regency lookup"),
        (name = "admin", description = "Maintenance"),
    ),
    info(
        title = "Leads Dashboard API",
        version = "1.0.0",
        description = "Prospect tracking and lead-conversion reporting"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_report_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/reports/heatmap"));
        assert!(doc.paths.paths.contains_key("/api/v1/prospects/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
