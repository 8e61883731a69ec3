//! MITRE CWE page scrapers
//!
//! Two pages are consumed: the per-weakness definition page and the Top 25
//! ranking archive. Both are plain HTML; the layout has been stable for
//! years but parsing still degrades field-by-field instead of failing whole.

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};

use super::select_text;
use crate::application::ApplicationError;
use crate::config::MitreConfig;
use crate::domain::{CweId, CweRankedEntry, CweRecord};
use crate::infrastructure::api_clients::traits::CweSource;

const SOURCE: &str = "MITRE CWE";

/// Scraper for `cwe.mitre.org` definition and Top 25 pages
pub struct MitreCweScraper {
    client: Client,
    definition_url: String,
    top25_url: String,
    cwe_pattern: Regex,
}

impl MitreCweScraper {
    pub fn new(client: Client, config: &MitreConfig) -> Self {
        Self {
            client,
            definition_url: config.definition_url.trim_end_matches('/').to_string(),
            top25_url: config.top25_url.clone(),
            cwe_pattern: Regex::new(r"CWE-(\d+)").unwrap(),
        }
    }

    fn definition_page_url(&self, id: &CweId) -> String {
        format!("{}/{}.html", self.definition_url, id.number())
    }

    async fn get_html(&self, url: &str) -> Result<String, ApplicationError> {
        tracing::debug!(url = %url, "Fetching MITRE page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApplicationError::upstream(SOURCE, e))?;

        if !response.status().is_success() {
            return Err(ApplicationError::upstream(
                SOURCE,
                format!("HTTP {} for {}", response.status(), url),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| ApplicationError::upstream(SOURCE, e))
    }

    /// Extract name and description from a definition page.
    ///
    /// MITRE serves a generic shell for unknown ids, so a heading that does
    /// not mention the requested id means the weakness does not exist.
    fn parse_definition_page(
        &self,
        id: &CweId,
        url: &str,
        html: &str,
    ) -> Result<CweRecord, ApplicationError> {
        let document = Html::parse_document(html);

        let heading = select_text(&document, "h2").unwrap_or_default();
        if !heading.contains(&id.to_string()) {
            return Err(ApplicationError::NotFound {
                resource: id.to_string(),
            });
        }

        // "CWE-79: Improper Neutralization of Input ..." -> keep the title part
        let name = heading
            .split_once(':')
            .map(|(_, title)| title.trim().to_string())
            .unwrap_or(heading);

        let description = select_text(&document, "div#Description div.indent")
            .or_else(|| select_text(&document, "div#Description"))
            .unwrap_or_default();

        Ok(CweRecord {
            id: id.to_string(),
            name,
            description,
            source_url: url.to_string(),
            fetched_at: Utc::now(),
        })
    }

    /// Parse the ranking table of the Top 25 archive page.
    ///
    /// Rows are `rank | id | name | score`, with older pages folding id and
    /// name into one cell.
    fn parse_top25_page(&self, html: &str) -> Result<Vec<CweRankedEntry>, ApplicationError> {
        let document = Html::parse_document(html);
        let row_selector = Selector::parse("table tr")
            .map_err(|e| ApplicationError::malformed(SOURCE, e.to_string()))?;
        let cell_selector = Selector::parse("td")
            .map_err(|e| ApplicationError::malformed(SOURCE, e.to_string()))?;

        let mut entries = Vec::new();
        for row in document.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| {
                    cell.text()
                        .collect::<String>()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            if cells.len() < 3 {
                continue;
            }

            let Ok(rank) = cells[0].trim_start_matches('[').trim_end_matches(']').parse() else {
                continue; // header or spacer row
            };
            let row_text = cells.join(" ");
            let Some(capture) = self.cwe_pattern.captures(&row_text) else {
                continue;
            };
            let id = capture[0].to_string();

            let name = if cells.len() >= 4 {
                cells[2].clone()
            } else {
                cells[1].replace(&id, "").trim().to_string()
            };
            let score = cells
                .last()
                .and_then(|cell| cell.trim().parse::<f64>().ok());

            entries.push(CweRankedEntry {
                rank,
                id,
                name,
                score,
            });
        }

        if entries.is_empty() {
            return Err(ApplicationError::malformed(
                SOURCE,
                format!("no ranking rows found at {}", self.top25_url),
            ));
        }
        Ok(entries)
    }
}

#[async_trait]
impl CweSource for MitreCweScraper {
    async fn fetch_cwe(&self, id: &CweId) -> Result<CweRecord, ApplicationError> {
        let url = self.definition_page_url(id);
        let html = self.get_html(&url).await?;
        self.parse_definition_page(id, &url, &html)
    }

    async fn top_25(&self) -> Result<Vec<CweRankedEntry>, ApplicationError> {
        let html = self.get_html(&self.top25_url).await?;
        self.parse_top25_page(&html)
    }
}
