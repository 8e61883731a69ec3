//! Clients for remote vulnerability data services

pub mod cve_search;
pub mod traits;

pub use cve_search::CveSearchClient;
pub use traits::{CveCatalog, CveDetailSource, CweSource};
