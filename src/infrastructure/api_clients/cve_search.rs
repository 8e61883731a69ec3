//! CVE-search REST API client
//!
//! Wraps the endpoints documented at <https://cve-search.org/api/>. Every
//! operation resolves the credential bag, issues exactly one outbound GET and
//! returns the parsed JSON body; single-CVE lookups are additionally
//! normalized through [`RawCve`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::traits::{CveCatalog, CveDetailSource};
use crate::application::ApplicationError;
use crate::domain::{CveId, CveRecord};
use crate::infrastructure::credentials::{CredentialStore, CveSearchCredential};

const SOURCE: &str = "CVE-search";

/// Raw JSON vulnerability payload with explicit optional fields
///
/// Upstream records are frequently partial; absent keys become `None` or an
/// empty list instead of failing the request. Callers defend downstream.
#[derive(Debug, Default, Deserialize)]
pub struct RawCve {
    pub id: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub cvss: Option<MaybeNumber>,
    #[serde(rename = "Published")]
    pub published: Option<String>,
    #[serde(rename = "Modified")]
    pub modified: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub vulnerable_product: Vec<String>,
    pub cwe: Option<String>,
}

/// Numeric field that some upstream records serialize as a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaybeNumber {
    Number(f64),
    Text(String),
}

impl MaybeNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl RawCve {
    /// Vendors derived from the vulnerable CPE URIs
    pub fn vendors(&self) -> Vec<String> {
        let mut vendors: Vec<String> = self
            .vulnerable_product
            .iter()
            .filter_map(|uri| split_cpe(uri).map(|(vendor, _)| vendor))
            .collect();
        vendors.sort();
        vendors.dedup();
        vendors
    }

    /// Products derived from the vulnerable CPE URIs
    pub fn products(&self) -> Vec<String> {
        let mut products: Vec<String> = self
            .vulnerable_product
            .iter()
            .filter_map(|uri| split_cpe(uri).map(|(_, product)| product))
            .collect();
        products.sort();
        products.dedup();
        products
    }

    fn into_record(self, requested: &CveId) -> CveRecord {
        let vendors = self.vendors();
        let products = self.products();
        CveRecord {
            id: self.id.unwrap_or_else(|| requested.to_string()),
            description: self.summary,
            cvss_score: self.cvss.as_ref().and_then(MaybeNumber::as_f64),
            published: self.published,
            modified: self.modified,
            vendors,
            products,
            references: self.references,
            cwe_id: self.cwe.filter(|c| !c.trim().is_empty()),
            cwe: None,
        }
    }
}

/// Extract `(vendor, product)` from a CPE 2.3 or legacy CPE 2.2 URI
fn split_cpe(uri: &str) -> Option<(String, String)> {
    let fields: Vec<&str> = if let Some(rest) = uri.strip_prefix("cpe:2.3:") {
        rest.split(':').collect()
    } else if let Some(rest) = uri.strip_prefix("cpe:/") {
        rest.split(':').collect()
    } else {
        return None;
    };

    // [part, vendor, product, ...]
    match (fields.get(1), fields.get(2)) {
        (Some(vendor), Some(product)) if !vendor.is_empty() && !product.is_empty() => {
            Some((vendor.to_string(), product.to_string()))
        }
        _ => None,
    }
}

/// Client for the CVE-search REST API
///
/// The credential bag is resolved on every call so a request observes the
/// settings file as it currently stands; no state survives between requests.
pub struct CveSearchClient {
    client: Client,
    credentials: Arc<CredentialStore>,
}

impl CveSearchClient {
    pub fn new(client: Client, credentials: Arc<CredentialStore>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    async fn get_json(
        &self,
        credential: &CveSearchCredential,
        path: &str,
    ) -> Result<serde_json::Value, ApplicationError> {
        let url = format!("{}/{}", credential.base_url.trim_end_matches('/'), path);
        tracing::debug!(url = %url, "Querying CVE-search");

        let mut request = self.client.get(&url);
        if let Some(key) = &credential.api_key {
            request = request.header("X-API-KEY", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApplicationError::upstream(SOURCE, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApplicationError::NotFound {
                resource: url.clone(),
            });
        }
        if !response.status().is_success() {
            return Err(ApplicationError::upstream(
                SOURCE,
                format!("HTTP {} for {}", response.status(), url),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ApplicationError::malformed(SOURCE, e.to_string()))
    }

    async fn resolve(&self) -> Result<CveSearchCredential, ApplicationError> {
        Ok(self.credentials.cve_search().await?)
    }
}

/// Normalize a single-CVE response body into a record.
///
/// The API answers unknown ids with an empty body rather than a 404, so an
/// empty or null document maps to `NotFound` naming the requested id.
fn normalize_cve_body(
    body: serde_json::Value,
    id: &CveId,
) -> Result<CveRecord, ApplicationError> {
    if body.is_null() || body.as_object().is_some_and(|o| o.is_empty()) {
        return Err(ApplicationError::NotFound {
            resource: id.to_string(),
        });
    }

    let raw: RawCve = serde_json::from_value(body)
        .map_err(|e| ApplicationError::malformed(SOURCE, e.to_string()))?;
    Ok(raw.into_record(id))
}

#[async_trait]
impl CveCatalog for CveSearchClient {
    async fn search_by_cve(&self, id: &CveId) -> Result<CveRecord, ApplicationError> {
        let credential = self.resolve().await?;
        let body = self.get_json(&credential, &format!("cve/{id}")).await?;
        normalize_cve_body(body, id)
    }

    async fn last_cves(&self) -> Result<serde_json::Value, ApplicationError> {
        let credential = self.resolve().await?;
        self.get_json(&credential, "last").await
    }

    async fn vendors(&self) -> Result<serde_json::Value, ApplicationError> {
        let credential = self.resolve().await?;
        self.get_json(&credential, "browse").await
    }

    async fn vendor_products(&self, vendor: &str) -> Result<serde_json::Value, ApplicationError> {
        let credential = self.resolve().await?;
        self.get_json(&credential, &format!("browse/{vendor}")).await
    }

    async fn vendor_product(
        &self,
        vendor: &str,
        product: &str,
    ) -> Result<serde_json::Value, ApplicationError> {
        let credential = self.resolve().await?;
        self.get_json(&credential, &format!("search/{vendor}/{product}"))
            .await
    }

    async fn db_info(&self) -> Result<serde_json::Value, ApplicationError> {
        let credential = self.resolve().await?;
        self.get_json(&credential, "dbInfo").await
    }
}
