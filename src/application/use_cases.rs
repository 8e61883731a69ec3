//! Retrieval use cases
//!
//! Each use case wires exactly one retrieval path; handlers own the HTTP
//! translation. None of them retries or caches — every execution performs a
//! fresh fetch.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::{CveId, CveRecord, CweFeedEntry, CweId, CweRankedEntry, CweRecord};
use crate::infrastructure::api_clients::traits::{CveCatalog, CveDetailSource, CweSource};
use crate::infrastructure::feeds::FeedRepository;

/// Detailed single-CVE lookup via the NVD page scraper, enriched with the
/// MITRE record for the associated weakness
pub struct GetCveDetailsUseCase {
    details: Arc<dyn CveDetailSource>,
    cwe_source: Arc<dyn CweSource>,
}

impl GetCveDetailsUseCase {
    pub fn new(details: Arc<dyn CveDetailSource>, cwe_source: Arc<dyn CweSource>) -> Self {
        Self {
            details,
            cwe_source,
        }
    }

    pub async fn execute(&self, id: &CveId) -> Result<CveRecord, ApplicationError> {
        let mut record = self.details.fetch_cve(id).await?;

        // Resolve the weakness when NVD points at a real CWE. Placeholder ids
        // (NVD-CWE-noinfo, NVD-CWE-Other) fail CweId parsing and stay as-is;
        // a failed MITRE lookup degrades the record instead of the request.
        if let Some(cwe_id) = record.cwe_id.as_deref() {
            if let Ok(parsed) = CweId::parse(cwe_id) {
                match self.cwe_source.fetch_cwe(&parsed).await {
                    Ok(cwe) => record.cwe = Some(cwe),
                    Err(err) => {
                        tracing::warn!(cve = %id, cwe = %parsed, error = %err,
                            "Could not resolve associated CWE");
                    }
                }
            }
        }

        Ok(record)
    }
}

/// Single-CWE lookup via the MITRE definition page
pub struct GetCweDetailsUseCase {
    source: Arc<dyn CweSource>,
}

impl GetCweDetailsUseCase {
    pub fn new(source: Arc<dyn CweSource>) -> Self {
        Self { source }
    }

    pub async fn execute(&self, id: &CweId) -> Result<CweRecord, ApplicationError> {
        self.source.fetch_cwe(id).await
    }
}

/// Top 25 most dangerous weaknesses from the MITRE archive page
pub struct GetCweTop25UseCase {
    source: Arc<dyn CweSource>,
}

impl GetCweTop25UseCase {
    pub fn new(source: Arc<dyn CweSource>) -> Self {
        Self { source }
    }

    pub async fn execute(&self) -> Result<Vec<CweRankedEntry>, ApplicationError> {
        self.source.top_25().await
    }
}

/// Paged access to the locally mirrored feed files
pub struct BrowseFeedsUseCase {
    feeds: Arc<dyn FeedRepository>,
}

impl BrowseFeedsUseCase {
    pub fn new(feeds: Arc<dyn FeedRepository>) -> Self {
        Self { feeds }
    }

    pub async fn all_cwes(&self) -> Result<Vec<CweFeedEntry>, ApplicationError> {
        self.feeds.all_cwes().await
    }

    pub async fn cve_details_page(
        &self,
        page: u32,
    ) -> Result<serde_json::Value, ApplicationError> {
        self.feeds.cve_details_page(page).await
    }

    pub async fn cwe_details_page(
        &self,
        page: u32,
    ) -> Result<serde_json::Value, ApplicationError> {
        self.feeds.cwe_details_page(page).await
    }
}

/// Catalog queries against the CVE-search database
pub struct QueryCveCatalogUseCase {
    catalog: Arc<dyn CveCatalog>,
}

impl QueryCveCatalogUseCase {
    pub fn new(catalog: Arc<dyn CveCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn search_by_cve(&self, id: &CveId) -> Result<CveRecord, ApplicationError> {
        self.catalog.search_by_cve(id).await
    }

    pub async fn last_cves(&self) -> Result<serde_json::Value, ApplicationError> {
        self.catalog.last_cves().await
    }

    pub async fn vendors(&self) -> Result<serde_json::Value, ApplicationError> {
        self.catalog.vendors().await
    }

    pub async fn vendor_products(
        &self,
        vendor: &str,
    ) -> Result<serde_json::Value, ApplicationError> {
        self.catalog.vendor_products(vendor).await
    }

    pub async fn vendor_product(
        &self,
        vendor: &str,
        product: &str,
    ) -> Result<serde_json::Value, ApplicationError> {
        self.catalog.vendor_product(vendor, product).await
    }

    pub async fn db_info(&self) -> Result<serde_json::Value, ApplicationError> {
        self.catalog.db_info().await
    }
}
