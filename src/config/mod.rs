//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    pub credentials: CredentialsConfig,
    pub feeds: FeedsConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whether to expose interactive API docs (Swagger UI). Should be false
    /// in hardened production.
    pub enable_docs: bool,
    /// Global request timeout in seconds applied at the HTTP layer.
    pub request_timeout_seconds: u64,
    /// Allowed CORS origins. Use ["*"] to mirror any origin (development only).
    pub allowed_origins: Vec<String>,
    pub security: SecurityConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_docs: true,
            request_timeout_seconds: 30,
            allowed_origins: vec!["*".to_string()],
            security: SecurityConfig::default(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Whether to attach the standard security headers to every response
    pub enable_security_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_security_headers: true,
        }
    }
}

/// Upstream source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Timeout for each outbound call, in seconds. There are no retries; a
    /// slow upstream fails the single request it was serving.
    pub timeout_seconds: u64,
    pub nist: NistConfig,
    pub mitre: MitreConfig,
}

/// NIST NVD page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NistConfig {
    /// Root of the vulnerability detail pages
    pub base_url: String,
}

impl Default for NistConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nvd.nist.gov/vuln/detail".to_string(),
        }
    }
}

/// MITRE CWE page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MitreConfig {
    /// Root of the per-weakness definition pages
    pub definition_url: String,
    /// Top 25 ranking archive page
    pub top25_url: String,
}

impl Default for MitreConfig {
    fn default() -> Self {
        Self {
            definition_url: "https://cwe.mitre.org/data/definitions".to_string(),
            top25_url: "https://cwe.mitre.org/top25/archive/2020/2020_cwe_top25.html".to_string(),
        }
    }
}

/// Credential settings file location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// JSON file holding per-service credential bags
    pub path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/credentials.json"),
        }
    }
}

/// Mirrored feed files configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// Directory holding `cwe_ids/`, `cve_details/` and `cwe_details/`
    pub directory: PathBuf,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("feeds"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            nist: NistConfig::default(),
            mitre: MitreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("VULNFEED").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
