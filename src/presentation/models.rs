//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CveRecord, CweFeedEntry, CweRankedEntry, CweRecord};

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error category
    #[schema(example = "Unable to get information about CVE=CVE-2999-9999")]
    pub error: String,

    /// Underlying failure detail
    #[schema(example = "NIST NVD request failed: connection refused")]
    pub details: String,
}

/// Detailed CVE data aggregated from NVD with the resolved weakness
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CveDetailResponse {
    /// Canonical identifier
    #[schema(example = "CVE-2010-3333")]
    pub id: String,

    /// Vulnerability description
    pub description: Option<String>,

    /// CVSS v3 base score
    #[schema(example = 9.8)]
    pub cvss_score: Option<f64>,

    /// Publication date as reported by the source
    pub published: Option<String>,

    /// Last modification date as reported by the source
    pub modified: Option<String>,

    /// Vendors with affected products
    pub vendors: Vec<String>,

    /// Affected products
    pub products: Vec<String>,

    /// External reference URLs
    pub references: Vec<String>,

    /// Weakness id as reported upstream, possibly an NVD placeholder
    #[schema(example = "CWE-787")]
    pub cwe_id: Option<String>,

    /// Resolved weakness record when the id points at a real CWE
    pub cwe: Option<CweDetailDto>,
}

impl CveDetailResponse {
    pub fn from_record(record: CveRecord, host_address: &str) -> Self {
        Self {
            cwe: record
                .cwe
                .map(|cwe| CweDetailDto::from_record(cwe, host_address)),
            id: record.id,
            description: record.description,
            cvss_score: record.cvss_score,
            published: record.published,
            modified: record.modified,
            vendors: record.vendors,
            products: record.products,
            references: record.references,
            cwe_id: record.cwe_id,
        }
    }
}

/// Detailed CWE data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CweDetailDto {
    /// Prefixed identifier
    #[schema(example = "CWE-79")]
    pub id: String,

    /// Weakness title
    pub name: String,

    /// Weakness description
    pub description: String,

    /// MITRE page the data was extracted from
    #[schema(example = "https://cwe.mitre.org/data/definitions/79.html")]
    pub source_url: String,

    /// Link to this API's detail endpoint for the weakness
    #[schema(example = "http://localhost:3000/cwe/79")]
    pub detail_url: String,

    /// When the data was retrieved
    pub fetched_at: DateTime<Utc>,
}

impl CweDetailDto {
    pub fn from_record(record: CweRecord, host_address: &str) -> Self {
        let number = record.id.trim_start_matches("CWE-").to_string();
        Self {
            detail_url: format!("{host_address}/cwe/{number}"),
            id: record.id,
            name: record.name,
            description: record.description,
            source_url: record.source_url,
            fetched_at: record.fetched_at,
        }
    }
}

/// One ranked entry of the Top 25 list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CweRankedDto {
    #[schema(example = 1)]
    pub rank: u32,

    #[schema(example = "CWE-787")]
    pub id: String,

    #[schema(example = "Out-of-bounds Write")]
    pub name: String,

    /// MITRE's aggregate score for the ranking year
    pub score: Option<f64>,

    /// Link to this API's detail endpoint for the weakness
    pub detail_url: String,
}

impl CweRankedDto {
    pub fn from_entry(entry: CweRankedEntry, host_address: &str) -> Self {
        let number = entry.id.trim_start_matches("CWE-").to_string();
        Self {
            rank: entry.rank,
            detail_url: format!("{host_address}/cwe/{number}"),
            id: entry.id,
            name: entry.name,
            score: entry.score,
        }
    }
}

/// Top 25 most dangerous weaknesses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Top25Response {
    pub response: Vec<CweRankedDto>,
}

/// One entry of the full CWE index
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CweIndexEntryDto {
    #[schema(example = "CWE-79")]
    pub id: String,

    pub name: Option<String>,

    pub description: Option<String>,

    /// MITRE page with the full definition
    pub source_url: String,

    /// Link to this API's detail endpoint for the weakness
    pub detail_url: String,
}

impl CweIndexEntryDto {
    pub fn from_entry(entry: CweFeedEntry, host_address: &str) -> Self {
        let number = entry.id.trim_start_matches("CWE-").to_string();
        Self {
            source_url: format!("https://cwe.mitre.org/data/definitions/{number}.html"),
            detail_url: format!("{host_address}/cwe/{number}"),
            id: entry.id,
            name: entry.name,
            description: entry.description,
        }
    }
}

/// Full CWE index from the mirrored feed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CweAllResponse {
    pub count: usize,
    pub results: Vec<CweIndexEntryDto>,
}

/// Health check payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,

    #[schema(example = "0.1.0")]
    pub version: String,

    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn cwe_detail_link_uses_the_bare_number() {
        let dto = CweDetailDto::from_record(
            CweRecord {
                id: "CWE-79".to_string(),
                name: "XSS".to_string(),
                description: String::new(),
                source_url: "https://cwe.mitre.org/data/definitions/79.html".to_string(),
                fetched_at: Utc::now(),
            },
            "http://localhost:3000",
        );
        assert_eq!(dto.detail_url, "http://localhost:3000/cwe/79");
    }

    #[test]
    fn index_entry_gets_both_links() {
        let dto = CweIndexEntryDto::from_entry(
            CweFeedEntry {
                id: "CWE-89".to_string(),
                name: Some("SQL Injection".to_string()),
                description: None,
            },
            "https://api.example.com",
        );
        assert_eq!(
            dto.source_url,
            "https://cwe.mitre.org/data/definitions/89.html"
        );
        assert_eq!(dto.detail_url, "https://api.example.com/cwe/89");
    }
}
