//! Vulnfeed - CVE/CWE aggregation API
//!
//! Aggregates public vulnerability data from a CVE-search REST API, the NIST
//! NVD pages and MITRE's published CWE pages, plus locally mirrored JSON
//! feeds, and exposes it over a small set of HTTP endpoints.
//!
//! # Modules
//!
//! - [`config`] — Strongly-typed configuration with TOML and environment variable support
//! - [`domain`] — CVE/CWE records and validated identifiers
//! - [`application`] — Retrieval use cases and the error taxonomy
//! - [`infrastructure`] — API clients, scrapers, credential store and feed files
//! - [`presentation`] — Handlers, routing and HTTP error translation
//! - [`logging`] — Structured logging with tracing
//!
//! Environment variables use the `VULNFEED__` prefix with double underscore
//! separators:
//!
//! ```bash
//! VULNFEED__SERVER__PORT=3000
//! VULNFEED__FEEDS__DIRECTORY=/var/lib/vulnfeed/feeds
//! ```

mod app;

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::create_app;
pub use config::Config;
pub use logging::init_tracing;
