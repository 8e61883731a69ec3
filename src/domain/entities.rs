//! Domain entities
//!
//! Records are immutable once fetched and live only for the duration of a
//! request; nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized CVE record aggregated from one upstream source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CveRecord {
    /// Canonical identifier, e.g. `CVE-2010-3333`
    pub id: String,
    /// Vulnerability description as published by the source
    pub description: Option<String>,
    /// CVSS base score when the source exposes one
    pub cvss_score: Option<f64>,
    /// Publication date string as reported by the source
    pub published: Option<String>,
    /// Last-modified date string as reported by the source
    pub modified: Option<String>,
    /// Vendors with affected products
    pub vendors: Vec<String>,
    /// Affected products
    pub products: Vec<String>,
    /// External reference URLs
    pub references: Vec<String>,
    /// Associated weakness id as reported upstream. May be an NVD
    /// placeholder (`NVD-CWE-noinfo`) that cannot be resolved at MITRE.
    pub cwe_id: Option<String>,
    /// Resolved weakness record, when `cwe_id` points at a real CWE
    pub cwe: Option<CweRecord>,
}

/// A CWE record scraped from MITRE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CweRecord {
    /// Prefixed identifier, e.g. `CWE-79`
    pub id: String,
    /// Weakness title
    pub name: String,
    /// Weakness description
    pub description: String,
    /// MITRE page the data was extracted from
    pub source_url: String,
    /// When the data was retrieved
    pub fetched_at: DateTime<Utc>,
}

/// One row of the MITRE Top 25 ranking table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CweRankedEntry {
    pub rank: u32,
    /// Prefixed identifier, e.g. `CWE-787`
    pub id: String,
    pub name: String,
    /// MITRE's aggregate score for the ranking year
    pub score: Option<f64>,
}

/// One entry of the locally mirrored `cwe_all.json` feed
///
/// Feed files are third-party data; every field besides the id is optional
/// and absent keys deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CweFeedEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
