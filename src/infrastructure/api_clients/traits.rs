//! Traits for the remote retrieval seams
//!
//! Handlers and use cases depend on these abstractions so the concrete
//! clients can be swapped for mocks in tests.

use async_trait::async_trait;

use crate::application::ApplicationError;
use crate::domain::{CveId, CveRecord, CweId, CweRankedEntry, CweRecord};

/// Source of detailed per-CVE records (NIST NVD pages)
#[async_trait]
pub trait CveDetailSource: Send + Sync {
    /// Fetch one CVE by identifier. Returns `NotFound` when the source has no
    /// record for it.
    async fn fetch_cve(&self, id: &CveId) -> Result<CveRecord, ApplicationError>;
}

/// Source of CWE reference data (MITRE pages)
#[async_trait]
pub trait CweSource: Send + Sync {
    /// Fetch one weakness definition by id
    async fn fetch_cwe(&self, id: &CweId) -> Result<CweRecord, ApplicationError>;

    /// Fetch the Top 25 most dangerous weaknesses ranking
    async fn top_25(&self) -> Result<Vec<CweRankedEntry>, ApplicationError>;
}

/// CVE-search database operations
///
/// List-shaped responses are passed through as the upstream's parsed JSON
/// body; only single-CVE lookups are normalized into a wrapped record.
#[async_trait]
pub trait CveCatalog: Send + Sync {
    /// Fetch one CVE by identifier
    async fn search_by_cve(&self, id: &CveId) -> Result<CveRecord, ApplicationError>;

    /// List the most recent 30 CVEs
    async fn last_cves(&self) -> Result<serde_json::Value, ApplicationError>;

    /// List vendors with known CVEs
    async fn vendors(&self) -> Result<serde_json::Value, ApplicationError>;

    /// List products for one vendor
    async fn vendor_products(&self, vendor: &str) -> Result<serde_json::Value, ApplicationError>;

    /// Fetch one vendor/product pair
    async fn vendor_product(
        &self,
        vendor: &str,
        product: &str,
    ) -> Result<serde_json::Value, ApplicationError>;

    /// Fetch database metadata
    async fn db_info(&self) -> Result<serde_json::Value, ApplicationError>;
}
