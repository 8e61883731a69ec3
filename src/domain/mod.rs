//! Core domain models for CVE and CWE data

pub mod entities;
pub mod value_objects;

pub use entities::{CveRecord, CweFeedEntry, CweRankedEntry, CweRecord};
pub use value_objects::{CveId, CweId, IdentifierError};
