//! Application error taxonomy
//!
//! One tagged error type per failure category. All retrieval paths return
//! this enum and the presentation layer maps each variant to an HTTP status;
//! nothing is retried or escalated beyond the single request.

use std::path::PathBuf;

/// Errors produced by the retrieval operations
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// Configuration for a required external service is absent
    #[error("credentials for {service} are not configured")]
    CredentialsMissing {
        service: String,
        settings_path: PathBuf,
    },

    /// The requested identifier does not exist on the remote source
    #[error("{resource} was not found on the remote source")]
    NotFound { resource: String },

    /// Network or HTTP-level failure talking to an upstream. The field must
    /// not be called `source`: thiserror wires that name into
    /// `Error::source()`, which a plain `String` cannot implement.
    #[error("{service} request failed: {detail}")]
    Upstream { service: String, detail: String },

    /// The upstream answered with an unexpected response shape
    #[error("{service} returned an unexpected response: {detail}")]
    Malformed { service: String, detail: String },

    /// A locally mirrored feed file is missing or unreadable
    #[error("feed data at {path} is missing or unreadable: {detail}")]
    Feed { path: PathBuf, detail: String },

    /// A caller-supplied parameter failed a shape check
    #[error("{0}")]
    InvalidInput(String),
}

impl ApplicationError {
    /// Wrap a transport error from a named upstream
    pub fn upstream(service: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            service: service.into(),
            detail: err.to_string(),
        }
    }

    /// Wrap a response-shape error from a named upstream
    pub fn malformed(service: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Malformed {
            service: service.into(),
            detail: detail.into(),
        }
    }
}

impl From<crate::domain::IdentifierError> for ApplicationError {
    fn from(err: crate::domain::IdentifierError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
