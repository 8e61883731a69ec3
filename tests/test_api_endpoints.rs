//! API endpoint integration tests
//!
//! Drives the full router through `tower::ServiceExt::oneshot` with mocked
//! retrieval backends, exercising the HTTP error contract end to end.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use vulnfeed::Config;
use vulnfeed::application::{
    ApplicationError, BrowseFeedsUseCase, GetCveDetailsUseCase, GetCweDetailsUseCase,
    GetCweTop25UseCase, QueryCveCatalogUseCase,
};
use vulnfeed::domain::{CveId, CveRecord, CweFeedEntry, CweId, CweRankedEntry, CweRecord};
use vulnfeed::infrastructure::api_clients::traits::{CveCatalog, CveDetailSource, CweSource};
use vulnfeed::infrastructure::feeds::FeedRepository;
use vulnfeed::presentation::{AppState, create_router};

#[derive(Clone, Copy)]
enum Mode {
    Ok,
    NotFound,
    Upstream,
    CredentialsMissing,
}

struct MockDetails {
    mode: Mode,
}

fn sample_record(id: &CveId) -> CveRecord {
    CveRecord {
        id: id.to_string(),
        description: Some("Stack-based buffer overflow in Microsoft Office.".to_string()),
        cvss_score: Some(9.3),
        published: Some("11/09/2010".to_string()),
        modified: Some("07/26/2021".to_string()),
        vendors: vec!["microsoft".to_string()],
        products: vec!["office".to_string(), "open_xml_file_format_converter".to_string()],
        references: vec!["https://www.exploit-db.com/exploits/17474".to_string()],
        cwe_id: Some("CWE-787".to_string()),
        cwe: None,
    }
}

#[async_trait]
impl CveDetailSource for MockDetails {
    async fn fetch_cve(&self, id: &CveId) -> Result<CveRecord, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(sample_record(id)),
            Mode::NotFound => Err(ApplicationError::NotFound {
                resource: id.to_string(),
            }),
            _ => Err(ApplicationError::upstream("NIST NVD", "connection refused")),
        }
    }
}

struct MockCwe {
    mode: Mode,
}

#[async_trait]
impl CweSource for MockCwe {
    async fn fetch_cwe(&self, id: &CweId) -> Result<CweRecord, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(CweRecord {
                id: id.to_string(),
                name: "Out-of-bounds Write".to_string(),
                description: "The software writes data past the end of the buffer.".to_string(),
                source_url: format!(
                    "https://cwe.mitre.org/data/definitions/{}.html",
                    id.number()
                ),
                fetched_at: Utc::now(),
            }),
            Mode::NotFound => Err(ApplicationError::NotFound {
                resource: id.to_string(),
            }),
            _ => Err(ApplicationError::upstream("MITRE CWE", "connection refused")),
        }
    }

    async fn top_25(&self) -> Result<Vec<CweRankedEntry>, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(vec![
                CweRankedEntry {
                    rank: 1,
                    id: "CWE-787".to_string(),
                    name: "Out-of-bounds Write".to_string(),
                    score: Some(65.93),
                },
                CweRankedEntry {
                    rank: 2,
                    id: "CWE-79".to_string(),
                    name: "Cross-site Scripting".to_string(),
                    score: Some(46.84),
                },
            ]),
            _ => Err(ApplicationError::upstream("MITRE CWE", "connection refused")),
        }
    }
}

struct MockCatalog {
    mode: Mode,
}

impl MockCatalog {
    fn result(&self, body: Value) -> Result<Value, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(body),
            Mode::CredentialsMissing => Err(ApplicationError::CredentialsMissing {
                service: "cve_search".to_string(),
                settings_path: PathBuf::from("config/credentials.json"),
            }),
            _ => Err(ApplicationError::upstream("CVE-search", "connection refused")),
        }
    }
}

#[async_trait]
impl CveCatalog for MockCatalog {
    async fn search_by_cve(&self, id: &CveId) -> Result<CveRecord, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(sample_record(id)),
            _ => Err(ApplicationError::upstream("CVE-search", "connection refused")),
        }
    }

    async fn last_cves(&self) -> Result<Value, ApplicationError> {
        self.result(json!([{"id": "CVE-2021-0001"}, {"id": "CVE-2021-0002"}]))
    }

    async fn vendors(&self) -> Result<Value, ApplicationError> {
        self.result(json!({"vendor": ["microsoft", "redhat"]}))
    }

    async fn vendor_products(&self, vendor: &str) -> Result<Value, ApplicationError> {
        self.result(json!({"vendor": vendor, "product": ["office"]}))
    }

    async fn vendor_product(&self, vendor: &str, product: &str) -> Result<Value, ApplicationError> {
        self.result(json!({"vendor": vendor, "product": product, "results": []}))
    }

    async fn db_info(&self) -> Result<Value, ApplicationError> {
        self.result(json!({"cves": {"size": 150000}}))
    }
}

struct MockFeeds {
    mode: Mode,
}

#[async_trait]
impl FeedRepository for MockFeeds {
    async fn all_cwes(&self) -> Result<Vec<CweFeedEntry>, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(vec![
                CweFeedEntry {
                    id: "CWE-79".to_string(),
                    name: Some("Cross-site Scripting".to_string()),
                    description: None,
                },
                CweFeedEntry {
                    id: "CWE-89".to_string(),
                    name: Some("SQL Injection".to_string()),
                    description: None,
                },
            ]),
            _ => Err(ApplicationError::Feed {
                path: PathBuf::from("feeds/cwe_ids/cwe_all.json"),
                detail: "No such file or directory".to_string(),
            }),
        }
    }

    async fn cve_details_page(&self, page: u32) -> Result<Value, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(json!([{"id": "CVE-2020-0601", "page": page}])),
            _ => Err(ApplicationError::Feed {
                path: PathBuf::from(format!("feeds/cve_details/{page}.json")),
                detail: "No such file or directory".to_string(),
            }),
        }
    }

    async fn cwe_details_page(&self, page: u32) -> Result<Value, ApplicationError> {
        match self.mode {
            Mode::Ok => Ok(json!([{"id": "CWE-79", "page": page}])),
            _ => Err(ApplicationError::Feed {
                path: PathBuf::from(format!("feeds/cwe_details/{page}.json")),
                detail: "No such file or directory".to_string(),
            }),
        }
    }
}

struct TestApp {
    details: Mode,
    cwe: Mode,
    catalog: Mode,
    feeds: Mode,
    config: Config,
}

impl TestApp {
    fn new() -> Self {
        Self {
            details: Mode::Ok,
            cwe: Mode::Ok,
            catalog: Mode::Ok,
            feeds: Mode::Ok,
            config: Config::default(),
        }
    }

    fn details(mut self, mode: Mode) -> Self {
        self.details = mode;
        self
    }

    fn cwe(mut self, mode: Mode) -> Self {
        self.cwe = mode;
        self
    }

    fn catalog(mut self, mode: Mode) -> Self {
        self.catalog = mode;
        self
    }

    fn feeds(mut self, mode: Mode) -> Self {
        self.feeds = mode;
        self
    }

    fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    fn build(self) -> Router {
        let details = Arc::new(MockDetails { mode: self.details });
        let cwe = Arc::new(MockCwe { mode: self.cwe });
        let catalog = Arc::new(MockCatalog { mode: self.catalog });
        let feeds = Arc::new(MockFeeds { mode: self.feeds });

        let state = AppState {
            cve_details: Arc::new(GetCveDetailsUseCase::new(details, cwe.clone())),
            cwe_details: Arc::new(GetCweDetailsUseCase::new(cwe.clone())),
            cwe_top25: Arc::new(GetCweTop25UseCase::new(cwe)),
            feeds: Arc::new(BrowseFeedsUseCase::new(feeds)),
            catalog: Arc::new(QueryCveCatalogUseCase::new(catalog)),
            config: Arc::new(self.config.clone()),
            startup_time: Instant::now(),
        };
        create_router(state, &self.config)
    }
}

async fn get(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn cve_lookup_returns_the_aggregated_record() {
    let response = get(TestApp::new().build(), "/cve/CVE-2010-3333").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], "CVE-2010-3333");
    assert_eq!(body["cvss_score"], 9.3);
    assert!(!body["products"].as_array().unwrap().is_empty());
    assert_eq!(body["vendors"][0], "microsoft");
    // The CWE-787 reference is resolved into a full weakness record
    assert_eq!(body["cwe"]["id"], "CWE-787");
    assert_eq!(body["cwe"]["name"], "Out-of-bounds Write");
}

#[tokio::test]
async fn cve_identifiers_are_normalized_to_uppercase() {
    let response = get(TestApp::new().build(), "/cve/cve-2010-3333").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], "CVE-2010-3333");
}

#[tokio::test]
async fn unknown_cve_maps_to_400_naming_the_identifier() {
    let router = TestApp::new().details(Mode::NotFound).build();
    let response = get(router, "/cve/CVE-2999-9999").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("CVE=CVE-2999-9999"), "got: {error}");
    assert!(error.contains("doesn't exist"), "got: {error}");
}

#[tokio::test]
async fn malformed_cve_identifier_is_rejected() {
    let response = get(TestApp::new().build(), "/cve/not-a-cve").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("CVE=not-a-cve"));
}

#[tokio::test]
async fn upstream_failure_maps_to_404_with_the_error_in_details() {
    let router = TestApp::new().details(Mode::Upstream).build();
    let response = get(router, "/cve/CVE-2010-3333").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("NIST NVD request failed"), "got: {details}");
    assert!(details.contains("connection refused"), "got: {details}");
}

#[tokio::test]
async fn failed_cwe_enrichment_degrades_the_record() {
    let router = TestApp::new().cwe(Mode::Upstream).build();
    let response = get(router, "/cve/CVE-2010-3333").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["cwe_id"], "CWE-787");
    assert!(body["cwe"].is_null());
}

#[tokio::test]
async fn missing_credentials_surface_the_settings_location() {
    let router = TestApp::new().catalog(Mode::CredentialsMissing).build();
    let response = get(router, "/cve/last").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("Please check settings in"), "got: {details}");
    assert!(details.contains("credentials.json"), "got: {details}");
}

#[tokio::test]
async fn last_cves_takes_priority_over_the_cve_capture() {
    let response = get(TestApp::new().build(), "/cve/last").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body[0]["id"], "CVE-2021-0001");
}

#[tokio::test]
async fn invalid_feed_page_gets_the_canonical_message() {
    for uri in ["/cve/details/abc", "/cve/details/0", "/cwe/details/-1", "/cwe/details/1.5"] {
        let response = get(TestApp::new().build(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");

        let body = body_json(response).await;
        assert_eq!(body["error"], "Unsupported type of user input data.", "uri: {uri}");
    }
}

#[tokio::test]
async fn valid_feed_page_passes_the_file_through() {
    let response = get(TestApp::new().build(), "/cve/details/3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body[0]["page"], 3);
}

#[tokio::test]
async fn missing_feed_page_maps_to_404_naming_the_file() {
    let router = TestApp::new().feeds(Mode::Upstream).build();
    let response = get(router, "/cwe/details/7").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("cwe_details"), "got: {details}");
    assert!(details.contains("7.json"), "got: {details}");
}

#[tokio::test]
async fn top25_is_wrapped_and_linked() {
    let response = get(TestApp::new().build(), "/cwe/top25").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let entries = body["response"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["id"], "CWE-787");
    assert!(
        entries[0]["detail_url"]
            .as_str()
            .unwrap()
            .ends_with("/cwe/787")
    );
}

#[tokio::test]
async fn cwe_all_reports_the_entry_count() {
    let response = get(TestApp::new().build(), "/cwe/all").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["results"][0]["id"], "CWE-79");
}

#[tokio::test]
async fn cwe_lookup_accepts_bare_and_prefixed_ids() {
    for uri in ["/cwe/79", "/cwe/CWE-79"] {
        let response = get(TestApp::new().build(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "uri: {uri}");

        let body = body_json(response).await;
        assert_eq!(body["id"], "CWE-79", "uri: {uri}");
    }
}

#[tokio::test]
async fn unknown_cwe_maps_to_400_with_a_mitre_hint() {
    let router = TestApp::new().cwe(Mode::NotFound).build();
    let response = get(router, "/cwe/999999").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(
        body["details"]
            .as_str()
            .unwrap()
            .contains("https://cwe.mitre.org/")
    );
}

#[tokio::test]
async fn vendor_endpoints_map_every_failure_to_400() {
    for uri in ["/vendors", "/vendors/microsoft", "/vendors/microsoft/office", "/db-info"] {
        let router = TestApp::new().catalog(Mode::Upstream).build();
        let response = get(router, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Unable to get"), "uri: {uri}");
    }
}

#[tokio::test]
async fn vendor_listing_without_credentials_references_the_settings() {
    let router = TestApp::new().catalog(Mode::CredentialsMissing).build();
    let response = get(router, "/vendors").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Unable to get vendor list.");
    assert!(
        body["details"]
            .as_str()
            .unwrap()
            .contains("Please check settings in")
    );
}

#[tokio::test]
async fn vendor_listing_passes_the_upstream_body_through() {
    let response = get(TestApp::new().build(), "/vendors").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!({"vendor": ["microsoft", "redhat"]}));
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let response = get(TestApp::new().build(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn docs_can_be_disabled() {
    let mut config = Config::default();
    config.server.enable_docs = false;
    let router = TestApp::new().config(config).build();
    let response = get(router, "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(TestApp::new().build(), "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn security_headers_are_attached() {
    let response = get(TestApp::new().build(), "/health").await;
    assert_eq!(
        response.headers().get("x-frame-options").unwrap(),
        "DENY"
    );
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}
