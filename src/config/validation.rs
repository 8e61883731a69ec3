//! Configuration validation module

use url::Url;

use crate::config::{
    Config, FeedsConfig, LoggingConfig, MitreConfig, NistConfig, ServerConfig, SourcesConfig,
};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Source configuration error: {message}")]
    Sources { message: String },

    #[error("Feed configuration error: {message}")]
    Feeds { message: String },

    #[error("Logging configuration error: {message}")]
    Logging { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn sources(message: impl Into<String>) -> Self {
        Self::Sources {
            message: message.into(),
        }
    }

    pub fn feeds(message: impl Into<String>) -> Self {
        Self::Feeds {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.sources.validate()?;
        self.feeds.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::server("host must not be empty"));
        }
        if self.port == 0 {
            return Err(ValidationError::server("port must not be zero"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "request_timeout_seconds must be positive",
            ));
        }
        Ok(())
    }
}

impl Validate for SourcesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ValidationError::sources("timeout_seconds must be positive"));
        }
        self.nist.validate()?;
        self.mitre.validate()?;
        Ok(())
    }
}

impl Validate for NistConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        Url::parse(&self.base_url)
            .map_err(|e| ValidationError::sources(format!("invalid NVD base_url: {e}")))?;
        Ok(())
    }
}

impl Validate for MitreConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        Url::parse(&self.definition_url)
            .map_err(|e| ValidationError::sources(format!("invalid MITRE definition_url: {e}")))?;
        Url::parse(&self.top25_url)
            .map_err(|e| ValidationError::sources(format!("invalid MITRE top25_url: {e}")))?;
        Ok(())
    }
}

impl Validate for FeedsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.directory.as_os_str().is_empty() {
            return Err(ValidationError::feeds("directory must not be empty"));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => {
                return Err(ValidationError::logging(format!(
                    "unknown log format {other:?}, expected json, pretty or compact"
                )));
            }
        }
        if self.level.trim().is_empty() {
            return Err(ValidationError::logging("level must not be empty"));
        }
        Ok(())
    }
}
