//! Infrastructure: external integrations
//!
//! - [`credentials`] — settings file holding per-service credential bags
//! - [`api_clients`] — JSON API clients (CVE-search)
//! - [`scrapers`] — HTML scrapers for NIST NVD and MITRE CWE pages
//! - [`feeds`] — locally mirrored JSON feed files

pub mod api_clients;
pub mod credentials;
pub mod feeds;
pub mod scrapers;
