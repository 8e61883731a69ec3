//! Request handlers
//!
//! Every handler invokes exactly one retrieval operation and translates the
//! outcome into an HTTP response: missing upstream data becomes 400 naming
//! the identifier, credential absence becomes 400 pointing at the settings
//! location, and any other retrieval failure becomes 404 carrying the error's
//! string representation in `details`.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::{
    ApplicationError, BrowseFeedsUseCase, GetCveDetailsUseCase, GetCweDetailsUseCase,
    GetCweTop25UseCase, QueryCveCatalogUseCase,
};
use crate::config::Config;
use crate::domain::{CveId, CweId};
use crate::presentation::extractors::HostAddress;
use crate::presentation::models::{
    CveDetailResponse, CweAllResponse, CweDetailDto, CweIndexEntryDto, CweRankedDto,
    ErrorResponse, HealthResponse, Top25Response,
};

const INVALID_PAGE_MESSAGE: &str = "Unsupported type of user input data.";

/// Shared handler state; read-only collaborators behind `Arc`
#[derive(Clone)]
pub struct AppState {
    pub cve_details: Arc<GetCveDetailsUseCase>,
    pub cwe_details: Arc<GetCweDetailsUseCase>,
    pub cwe_top25: Arc<GetCweTop25UseCase>,
    pub feeds: Arc<BrowseFeedsUseCase>,
    pub catalog: Arc<QueryCveCatalogUseCase>,
    pub config: Arc<Config>,
    pub startup_time: Instant,
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    let body = ErrorResponse {
        error: error.into(),
        details: details.into(),
    };
    tracing::warn!(http_status = %status, error = %body.error, details = %body.details,
        "Retrieval error mapped to HTTP response");
    (status, Json(body)).into_response()
}

/// Details string for a credential-absence failure
fn settings_hint(err: &ApplicationError) -> String {
    match err {
        ApplicationError::CredentialsMissing { settings_path, .. } => {
            format!("Please check settings in {}", settings_path.display())
        }
        other => other.to_string(),
    }
}

/// GET /cve/{cve_id} - Detailed CVE data from the NVD page
#[utoipa::path(
    get,
    path = "/cve/{cve_id}",
    params(("cve_id" = String, Path, description = "CVE identifier, e.g. CVE-2010-3333")),
    responses(
        (status = 200, description = "CVE found", body = CveDetailResponse),
        (status = 400, description = "Unknown or malformed identifier", body = ErrorResponse),
        (status = 404, description = "Retrieval failed", body = ErrorResponse)
    ),
    tag = "cve"
)]
pub async fn get_cve(
    State(state): State<AppState>,
    HostAddress(host): HostAddress,
    Path(cve_id): Path<String>,
) -> Response {
    let id = match CveId::parse(&cve_id) {
        Ok(id) => id,
        Err(err) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Unable to get information about CVE={cve_id}"),
                err.to_string(),
            );
        }
    };

    match state.cve_details.execute(&id).await {
        Ok(record) => Json(CveDetailResponse::from_record(record, &host)).into_response(),
        Err(ApplicationError::NotFound { resource }) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Unable to get information about CVE={resource} - probably this CVE doesn't exist."),
            "Please check the identifier on https://nvd.nist.gov/.",
        ),
        Err(err) => error_response(
            StatusCode::NOT_FOUND,
            format!("Unable to get information about CVE={id}"),
            err.to_string(),
        ),
    }
}

/// GET /cve/last - The 30 most recent CVEs from the CVE-search database
#[utoipa::path(
    get,
    path = "/cve/last",
    responses(
        (status = 200, description = "Recent CVE list"),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 404, description = "Retrieval failed", body = ErrorResponse)
    ),
    tag = "cve"
)]
pub async fn get_last_cves(State(state): State<AppState>) -> Response {
    match state.catalog.last_cves().await {
        Ok(body) => Json(body).into_response(),
        Err(err @ ApplicationError::CredentialsMissing { .. }) => error_response(
            StatusCode::BAD_REQUEST,
            "Unable to get latest CVE list.",
            settings_hint(&err),
        ),
        Err(err) => error_response(
            StatusCode::NOT_FOUND,
            "Unable to get latest CVE list.",
            err.to_string(),
        ),
    }
}

/// GET /cve/details/{page} - One page of mirrored detailed CVE data
#[utoipa::path(
    get,
    path = "/cve/details/{page}",
    params(("page" = String, Path, description = "Page number, starting at 1")),
    responses(
        (status = 200, description = "Feed page"),
        (status = 400, description = "Invalid page value", body = ErrorResponse),
        (status = 404, description = "Feed data missing", body = ErrorResponse)
    ),
    tag = "cve"
)]
pub async fn get_cve_details_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Response {
    let Some(page) = parse_page(&page) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            INVALID_PAGE_MESSAGE,
            format!("page must be a positive integer, got {page:?}"),
        );
    };

    match state.feeds.cve_details_page(page).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(
            StatusCode::NOT_FOUND,
            "Unable to get CVE details data - check the files in the cve_details feed folder",
            err.to_string(),
        ),
    }
}

/// GET /cwe/top25 - The Top 25 most dangerous weaknesses from MITRE
#[utoipa::path(
    get,
    path = "/cwe/top25",
    responses(
        (status = 200, description = "Ranked list", body = Top25Response),
        (status = 404, description = "Retrieval failed", body = ErrorResponse)
    ),
    tag = "cwe"
)]
pub async fn get_cwe_top25(
    State(state): State<AppState>,
    HostAddress(host): HostAddress,
) -> Response {
    match state.cwe_top25.execute().await {
        Ok(entries) => Json(Top25Response {
            response: entries
                .into_iter()
                .map(|entry| CweRankedDto::from_entry(entry, &host))
                .collect(),
        })
        .into_response(),
        Err(err) => error_response(
            StatusCode::NOT_FOUND,
            format!(
                "Unable to get TOP 25 CWE from {}",
                state.config.sources.mitre.top25_url
            ),
            err.to_string(),
        ),
    }
}

/// GET /cwe/all - The full CWE index from the mirrored feed
#[utoipa::path(
    get,
    path = "/cwe/all",
    responses(
        (status = 200, description = "CWE index", body = CweAllResponse),
        (status = 404, description = "Feed data missing", body = ErrorResponse)
    ),
    tag = "cwe"
)]
pub async fn get_cwe_all(
    State(state): State<AppState>,
    HostAddress(host): HostAddress,
) -> Response {
    match state.feeds.all_cwes().await {
        Ok(entries) => {
            let results: Vec<CweIndexEntryDto> = entries
                .into_iter()
                .map(|entry| CweIndexEntryDto::from_entry(entry, &host))
                .collect();
            Json(CweAllResponse {
                count: results.len(),
                results,
            })
            .into_response()
        }
        Err(err) => error_response(
            StatusCode::NOT_FOUND,
            "Unable to get all Common Weakness Enumeration data.",
            err.to_string(),
        ),
    }
}

/// GET /cwe/details/{page} - One page of mirrored detailed CWE data
#[utoipa::path(
    get,
    path = "/cwe/details/{page}",
    params(("page" = String, Path, description = "Page number, starting at 1")),
    responses(
        (status = 200, description = "Feed page"),
        (status = 400, description = "Invalid page value", body = ErrorResponse),
        (status = 404, description = "Feed data missing", body = ErrorResponse)
    ),
    tag = "cwe"
)]
pub async fn get_cwe_details_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Response {
    let Some(page) = parse_page(&page) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            INVALID_PAGE_MESSAGE,
            format!("page must be a positive integer, got {page:?}"),
        );
    };

    match state.feeds.cwe_details_page(page).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(
            StatusCode::NOT_FOUND,
            "Unable to get all CWE details data - check the files in the cwe_details feed folder",
            err.to_string(),
        ),
    }
}

/// GET /cwe/{id_cwe} - Detailed CWE data from the MITRE definition page
#[utoipa::path(
    get,
    path = "/cwe/{id_cwe}",
    params(("id_cwe" = String, Path, description = "CWE identifier, e.g. 79 or CWE-79")),
    responses(
        (status = 200, description = "CWE found", body = CweDetailDto),
        (status = 400, description = "Unknown or malformed identifier", body = ErrorResponse),
        (status = 404, description = "Retrieval failed", body = ErrorResponse)
    ),
    tag = "cwe"
)]
pub async fn get_cwe(
    State(state): State<AppState>,
    HostAddress(host): HostAddress,
    Path(id_cwe): Path<String>,
) -> Response {
    let id = match CweId::parse(&id_cwe) {
        Ok(id) => id,
        Err(err) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Unable to get information about CWE={id_cwe}."),
                err.to_string(),
            );
        }
    };

    match state.cwe_details.execute(&id).await {
        Ok(record) => Json(CweDetailDto::from_record(record, &host)).into_response(),
        Err(ApplicationError::NotFound { .. }) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Unable to get information about CWE={id_cwe}."),
            format!("Please check if CWE with id={id_cwe} exists on https://cwe.mitre.org/."),
        ),
        Err(err) => error_response(StatusCode::NOT_FOUND, "Unable to get data.", err.to_string()),
    }
}

/// GET /vendors - Vendors with known CVEs from the CVE-search database
#[utoipa::path(
    get,
    path = "/vendors",
    responses(
        (status = 200, description = "Vendor list"),
        (status = 400, description = "Missing credentials or retrieval failure", body = ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(State(state): State<AppState>) -> Response {
    match state.catalog.vendors().await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(
            StatusCode::BAD_REQUEST,
            "Unable to get vendor list.",
            settings_hint(&err),
        ),
    }
}

/// GET /vendors/{vendor} - Products of one vendor
#[utoipa::path(
    get,
    path = "/vendors/{vendor}",
    params(("vendor" = String, Path, description = "Vendor name, e.g. microsoft")),
    responses(
        (status = 200, description = "Product list"),
        (status = 400, description = "Missing credentials or retrieval failure", body = ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn list_vendor_products(
    State(state): State<AppState>,
    Path(vendor): Path<String>,
) -> Response {
    match state.catalog.vendor_products(&vendor).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Unable to get products for vendor={vendor}."),
            settings_hint(&err),
        ),
    }
}

/// GET /vendors/{vendor}/{product} - CVEs for one vendor/product pair
#[utoipa::path(
    get,
    path = "/vendors/{vendor}/{product}",
    params(
        ("vendor" = String, Path, description = "Vendor name"),
        ("product" = String, Path, description = "Product name")
    ),
    responses(
        (status = 200, description = "CVE list for the pair"),
        (status = 400, description = "Missing credentials or retrieval failure", body = ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor_product(
    State(state): State<AppState>,
    Path((vendor, product)): Path<(String, String)>,
) -> Response {
    match state.catalog.vendor_product(&vendor, &product).await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Unable to get data for vendor={vendor} product={product}."),
            settings_hint(&err),
        ),
    }
}

/// GET /db-info - CVE-search database metadata
#[utoipa::path(
    get,
    path = "/db-info",
    responses(
        (status = 200, description = "Database metadata"),
        (status = 400, description = "Missing credentials or retrieval failure", body = ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_db_info(State(state): State<AppState>) -> Response {
    match state.catalog.db_info().await {
        Ok(body) => Json(body).into_response(),
        Err(err) => error_response(
            StatusCode::BAD_REQUEST,
            "Unable to get database metadata.",
            settings_hint(&err),
        ),
    }
}

/// GET /health - Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.startup_time.elapsed().as_secs(),
    })
}

/// Page parameters must be positive integers; everything else is rejected
/// with the canonical invalid-input message.
fn parse_page(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|page| *page > 0)
}
