//! Route definitions and server setup

use std::time::Duration;

use axum::{Router, middleware, routing::get};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::Config;
use crate::presentation::{
    controllers::{
        AppState, get_cve, get_cve_details_page, get_cwe, get_cwe_all, get_cwe_details_page,
        get_cwe_top25, get_db_info, get_last_cves, get_vendor_product, health_check,
        list_vendor_products, list_vendors,
    },
    middleware::security_headers_middleware,
    models::*,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::get_cve,
        crate::presentation::controllers::get_last_cves,
        crate::presentation::controllers::get_cve_details_page,
        crate::presentation::controllers::get_cwe_top25,
        crate::presentation::controllers::get_cwe_all,
        crate::presentation::controllers::get_cwe_details_page,
        crate::presentation::controllers::get_cwe,
        crate::presentation::controllers::list_vendors,
        crate::presentation::controllers::list_vendor_products,
        crate::presentation::controllers::get_vendor_product,
        crate::presentation::controllers::get_db_info,
        crate::presentation::controllers::health_check
    ),
    components(schemas(
        CveDetailResponse,
        CweDetailDto,
        CweRankedDto,
        Top25Response,
        CweIndexEntryDto,
        CweAllResponse,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "cve", description = "CVE lookup endpoints backed by NVD, CVE-search and mirrored feeds"),
        (name = "cwe", description = "CWE lookup endpoints backed by MITRE and mirrored feeds"),
        (name = "vendors", description = "Vendor and product catalog endpoints backed by CVE-search"),
        (name = "health", description = "System health endpoints")
    ),
    info(
        title = "Vulnfeed API",
        version = "0.1.0",
        description = "Aggregates public CVE and CWE data from CVE-search, NIST NVD and MITRE."
    )
)]
pub struct ApiDoc;

/// Create the application router with the middleware stack
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    // Static segments are registered alongside the captures; axum gives the
    // literal routes (/cwe/top25, /cwe/all, /cve/last) priority.
    let mut router = Router::new()
        .route("/cve/last", get(get_last_cves))
        .route("/cve/details/{page}", get(get_cve_details_page))
        .route("/cve/{cve_id}", get(get_cve))
        .route("/cwe/top25", get(get_cwe_top25))
        .route("/cwe/all", get(get_cwe_all))
        .route("/cwe/details/{page}", get(get_cwe_details_page))
        .route("/cwe/{id_cwe}", get(get_cwe))
        .route("/vendors", get(list_vendors))
        .route("/vendors/{vendor}", get(list_vendor_products))
        .route("/vendors/{vendor}/{product}", get(get_vendor_product))
        .route("/db-info", get(get_db_info))
        .route("/health", get(health_check));

    // Avoid leaking interactive docs in hardened deployments.
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let cors_layer = build_cors_layer(config);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )));

    if config.server.security.enable_security_headers {
        router = router.layer(middleware::from_fn(security_headers_middleware));
    }

    router.layer(service_builder).with_state(app_state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [axum::http::Method::GET, axum::http::Method::OPTIONS];
    let headers = [
        axum::http::header::CONTENT_TYPE,
        axum::http::header::ACCEPT,
        axum::http::header::USER_AGENT,
        axum::http::header::ORIGIN,
    ];

    if config.server.allowed_origins.len() == 1 && config.server.allowed_origins[0] == "*" {
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    } else {
        let mut layer = CorsLayer::new();
        for origin in &config.server.allowed_origins {
            match axum::http::HeaderValue::from_str(origin) {
                Ok(origin_header) => {
                    layer = layer.allow_origin(origin_header);
                }
                Err(_) => {
                    tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                }
            }
        }
        layer
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(Duration::from_secs(3600))
    }
}
