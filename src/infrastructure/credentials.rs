//! Credential store for third-party services
//!
//! Credentials live in a JSON settings file outside the main configuration
//! (the file typically holds user-supplied API endpoints and keys). The store
//! re-reads the file on every lookup so edits take effect without a restart,
//! matching the per-request resource model: nothing is held across requests.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Credential bag for the CVE-search service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CveSearchCredential {
    /// API root, e.g. `https://cve.circl.lu/api`
    pub base_url: String,
    /// Optional API key sent as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,
}

/// On-disk shape of the settings file
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    cve_search: Option<CveSearchCredential>,
}

/// Error type for credential lookups
///
/// Absence is a distinct condition: handlers map it to a 400 that points the
/// caller at the settings location instead of a generic failure.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("no credentials for {service} in {path}")]
    NotFound { service: String, path: PathBuf },

    #[error("settings file {path} could not be parsed: {detail}")]
    Invalid { path: PathBuf, detail: String },
}

impl From<CredentialError> for ApplicationError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NotFound { service, path } => ApplicationError::CredentialsMissing {
                service,
                settings_path: path,
            },
            CredentialError::Invalid { path, detail } => ApplicationError::malformed(
                "credential settings",
                format!("{}: {detail}", path.display()),
            ),
        }
    }
}

/// Loads per-service credential bags from a JSON settings file
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the CVE-search credential bag
    pub async fn cve_search(&self) -> Result<CveSearchCredential, CredentialError> {
        let settings = self.read_settings().await?;
        match settings.cve_search {
            Some(credential) if !credential.base_url.trim().is_empty() => Ok(credential),
            _ => Err(CredentialError::NotFound {
                service: "cve_search".to_string(),
                path: self.path.clone(),
            }),
        }
    }

    async fn read_settings(&self) -> Result<SettingsFile, CredentialError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            // A missing settings file means no service is configured yet.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SettingsFile::default());
            }
            Err(err) => {
                return Err(CredentialError::Invalid {
                    path: self.path.clone(),
                    detail: err.to_string(),
                });
            }
        };

        serde_json::from_str(&raw).map_err(|err| CredentialError::Invalid {
            path: self.path.clone(),
            detail: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store_with(contents: &str) -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, CredentialStore::new(path))
    }

    #[tokio::test]
    async fn resolves_configured_service() {
        let (_dir, store) = store_with(
            r#"{"cve_search": {"base_url": "https://cve.circl.lu/api", "api_key": null}}"#,
        );
        let credential = store.cve_search().await.unwrap();
        assert_eq!(credential.base_url, "https://cve.circl.lu/api");
        assert!(credential.api_key.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_not_found_not_a_crash() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("does-not-exist.json"));
        assert!(matches!(
            store.cve_search().await,
            Err(CredentialError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn missing_section_is_not_found() {
        let (_dir, store) = store_with(r#"{}"#);
        assert!(matches!(
            store.cve_search().await,
            Err(CredentialError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn empty_base_url_is_not_found() {
        let (_dir, store) = store_with(r#"{"cve_search": {"base_url": ""}}"#);
        assert!(matches!(
            store.cve_search().await,
            Err(CredentialError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn unparsable_file_is_invalid() {
        let (_dir, store) = store_with("not json at all");
        assert!(matches!(
            store.cve_search().await,
            Err(CredentialError::Invalid { .. })
        ));
    }
}
