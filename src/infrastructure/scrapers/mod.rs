//! HTML scrapers for sources without a usable JSON API
//!
//! NIST NVD vulnerability pages and MITRE CWE pages are fetched as HTML and
//! reduced to normalized records with CSS selectors. Parsing is deliberately
//! lenient: a field that cannot be located becomes `None`, and only a page
//! that lacks the identifying content counts as not-found.

mod mitre;
mod nist;

pub use mitre::MitreCweScraper;
pub use nist::NistCveScraper;

use scraper::{Html, Selector};

/// Text of the first element matching `selector`, trimmed, `None` when the
/// selector matches nothing (or is invalid).
fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next().map(|el| {
        el.text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Trimmed text of every element matching `selector`
fn select_all_text(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect()
}
