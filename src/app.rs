//! Application setup and wiring

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use reqwest::Client;

use crate::application::{
    BrowseFeedsUseCase, GetCveDetailsUseCase, GetCweDetailsUseCase, GetCweTop25UseCase,
    QueryCveCatalogUseCase,
};
use crate::config::Config;
use crate::infrastructure::api_clients::CveSearchClient;
use crate::infrastructure::credentials::CredentialStore;
use crate::infrastructure::feeds::FeedStore;
use crate::infrastructure::scrapers::{MitreCweScraper, NistCveScraper};
use crate::presentation::{AppState, create_router};

/// Build the application router from configuration.
///
/// All collaborators are constructed once and shared read-only behind `Arc`;
/// no state crosses request boundaries.
pub fn create_app(config: Config) -> Result<Router, reqwest::Error> {
    let http_client = Client::builder()
        .timeout(Duration::from_secs(config.sources.timeout_seconds))
        .user_agent(concat!("vulnfeed/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let credentials = Arc::new(CredentialStore::new(config.credentials.path.clone()));

    let nist = Arc::new(NistCveScraper::new(http_client.clone(), &config.sources.nist));
    let mitre = Arc::new(MitreCweScraper::new(
        http_client.clone(),
        &config.sources.mitre,
    ));
    let cve_search = Arc::new(CveSearchClient::new(http_client, credentials));
    let feed_store = Arc::new(FeedStore::new(config.feeds.directory.clone()));

    let state = AppState {
        cve_details: Arc::new(GetCveDetailsUseCase::new(nist, mitre.clone())),
        cwe_details: Arc::new(GetCweDetailsUseCase::new(mitre.clone())),
        cwe_top25: Arc::new(GetCweTop25UseCase::new(mitre)),
        feeds: Arc::new(BrowseFeedsUseCase::new(feed_store)),
        catalog: Arc::new(QueryCveCatalogUseCase::new(cve_search)),
        config: Arc::new(config.clone()),
        startup_time: Instant::now(),
    };

    Ok(create_router(state, &config))
}
