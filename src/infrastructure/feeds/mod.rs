//! Locally mirrored JSON feed files
//!
//! The feed directory mirrors upstream bulk data: `cwe_ids/cwe_all.json`
//! holds the full CWE index, while `cve_details/` and `cwe_details/` hold one
//! pre-rendered JSON document per page. Files are read fresh on every request.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ApplicationError;
use crate::domain::CweFeedEntry;

/// Read access to the mirrored feed files
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// All CWE ids with their basic data from `cwe_ids/cwe_all.json`
    async fn all_cwes(&self) -> Result<Vec<CweFeedEntry>, ApplicationError>;

    /// One page of detailed CVE data from `cve_details/{page}.json`
    async fn cve_details_page(&self, page: u32) -> Result<serde_json::Value, ApplicationError>;

    /// One page of detailed CWE data from `cwe_details/{page}.json`
    async fn cwe_details_page(&self, page: u32) -> Result<serde_json::Value, ApplicationError>;
}

/// Filesystem-backed feed store
pub struct FeedStore {
    directory: PathBuf,
}

impl FeedStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    async fn read_json(&self, relative: &Path) -> Result<serde_json::Value, ApplicationError> {
        let path = self.directory.join(relative);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ApplicationError::Feed {
                path: path.clone(),
                detail: e.to_string(),
            })?;
        serde_json::from_str(&raw).map_err(|e| ApplicationError::Feed {
            path,
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl FeedRepository for FeedStore {
    async fn all_cwes(&self) -> Result<Vec<CweFeedEntry>, ApplicationError> {
        let path = Path::new("cwe_ids").join("cwe_all.json");
        let value = self.read_json(&path).await?;
        serde_json::from_value(value).map_err(|e| ApplicationError::Feed {
            path: self.directory.join("cwe_ids").join("cwe_all.json"),
            detail: e.to_string(),
        })
    }

    async fn cve_details_page(&self, page: u32) -> Result<serde_json::Value, ApplicationError> {
        self.read_json(&Path::new("cve_details").join(format!("{page}.json")))
            .await
    }

    async fn cwe_details_page(&self, page: u32) -> Result<serde_json::Value, ApplicationError> {
        self.read_json(&Path::new("cwe_details").join(format!("{page}.json")))
            .await
    }
}
