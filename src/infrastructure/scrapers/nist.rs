//! NIST NVD vulnerability page scraper

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use super::{select_all_text, select_text};
use crate::application::ApplicationError;
use crate::config::NistConfig;
use crate::domain::{CveId, CveRecord};
use crate::infrastructure::api_clients::traits::CveDetailSource;

const SOURCE: &str = "NIST NVD";

/// Scraper for `https://nvd.nist.gov/vuln/detail/{CVE-ID}` pages
pub struct NistCveScraper {
    client: Client,
    base_url: String,
    cwe_pattern: Regex,
    cpe_pattern: Regex,
}

impl NistCveScraper {
    pub fn new(client: Client, config: &NistConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cwe_pattern: Regex::new(r"(?:NVD-)?CWE-[0-9A-Za-z-]+").unwrap(),
            cpe_pattern: Regex::new(r"cpe:2\.3:[aoh]:([^:\s\x22&]+):([^:\s\x22&]+):").unwrap(),
        }
    }

    fn detail_url(&self, id: &CveId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Reduce a vulnerability detail page to a normalized record.
    ///
    /// A page without the description element is treated as "this CVE does
    /// not exist" since NVD serves the same shell for unknown ids.
    fn parse_detail_page(&self, id: &CveId, html: &str) -> Result<CveRecord, ApplicationError> {
        let document = Html::parse_document(html);

        let description = select_text(&document, r#"[data-testid="vuln-description"]"#)
            .filter(|text| !text.is_empty());
        let Some(description) = description else {
            return Err(ApplicationError::NotFound {
                resource: id.to_string(),
            });
        };

        let cvss_score = select_text(&document, r#"[data-testid="vuln-cvss3-panel-score"]"#)
            .or_else(|| select_text(&document, "a#Cvss3NistCalculatorAnchor"))
            .and_then(|text| {
                text.split_whitespace()
                    .next()
                    .and_then(|token| token.parse::<f64>().ok())
            });

        let published = select_text(&document, r#"[data-testid="vuln-published-on"]"#);
        let modified = select_text(&document, r#"[data-testid="vuln-last-modified-on"]"#);

        let references = Self::reference_links(&document);

        let cwe_cells = select_all_text(&document, r#"td[data-testid^="vuln-CWEs-link-"]"#);
        let cwe_fallback = select_all_text(&document, r#"[data-testid^="vuln-cwes-link-"]"#);
        let cwe_id = cwe_cells
            .iter()
            .chain(cwe_fallback.iter())
            .find_map(|text| self.cwe_pattern.find(text).map(|m| m.as_str().to_string()));

        let (vendors, products) = self.affected_from_cpe(html);

        Ok(CveRecord {
            id: id.to_string(),
            description: Some(description),
            cvss_score,
            published,
            modified,
            vendors,
            products,
            references,
            cwe_id,
            cwe: None,
        })
    }

    /// Reference URLs in page order, first occurrence wins
    fn reference_links(document: &Html) -> Vec<String> {
        let Ok(selector) = Selector::parse(r#"td[data-testid^="vuln-hyperlinks-link-"] a"#) else {
            return Vec::new();
        };
        let mut seen = std::collections::HashSet::new();
        document
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .filter(|href| seen.insert(href.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Vendor/product pairs from the CPE URIs embedded in the configuration
    /// section of the page
    fn affected_from_cpe(&self, html: &str) -> (Vec<String>, Vec<String>) {
        let mut vendors = Vec::new();
        let mut products = Vec::new();
        for capture in self.cpe_pattern.captures_iter(html) {
            vendors.push(capture[1].to_string());
            products.push(capture[2].to_string());
        }
        vendors.sort();
        vendors.dedup();
        products.sort();
        products.dedup();
        (vendors, products)
    }
}

#[async_trait]
impl CveDetailSource for NistCveScraper {
    async fn fetch_cve(&self, id: &CveId) -> Result<CveRecord, ApplicationError> {
        let url = self.detail_url(id);
        tracing::debug!(url = %url, "Fetching NVD vulnerability page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApplicationError::upstream(SOURCE, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApplicationError::NotFound {
                resource: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(ApplicationError::upstream(
                SOURCE,
                format!("HTTP {} for {}", response.status(), url),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ApplicationError::upstream(SOURCE, e))?;

        self.parse_detail_page(id, &html)
    }
}
