//! Validated identifiers for CVE and CWE records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error for identifiers that fail shape validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct IdentifierError(pub String);

/// A validated CVE identifier (`CVE-<year>-<sequence>`)
///
/// Validation is purely syntactic; whether the CVE exists on any upstream
/// source is decided per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CveId(String);

impl CveId {
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let normalized = input.trim().to_uppercase();
        let mut parts = normalized.splitn(3, '-');

        let prefix = parts.next().unwrap_or_default();
        let year = parts.next().unwrap_or_default();
        let sequence = parts.next().unwrap_or_default();

        if prefix != "CVE" {
            return Err(IdentifierError(format!(
                "invalid CVE identifier {input:?}: expected CVE-<year>-<number>"
            )));
        }
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError(format!(
                "invalid CVE identifier {input:?}: year must be four digits"
            )));
        }
        if sequence.len() < 4 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError(format!(
                "invalid CVE identifier {input:?}: sequence must be at least four digits"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CveId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A validated CWE identifier
///
/// Accepts both the bare number (`79`) and the prefixed form (`CWE-79`).
/// NVD placeholder ids such as `NVD-CWE-noinfo` deliberately do not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CweId(u32);

impl CweId {
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("CWE-")
            .or_else(|| trimmed.strip_prefix("cwe-"))
            .unwrap_or(trimmed);

        let number: u32 = digits.parse().map_err(|_| {
            IdentifierError(format!(
                "invalid CWE identifier {input:?}: expected a number or CWE-<number>"
            ))
        })?;
        if number == 0 {
            return Err(IdentifierError(format!(
                "invalid CWE identifier {input:?}: number must be positive"
            )));
        }

        Ok(Self(number))
    }

    pub fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CweId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CWE-{}", self.0)
    }
}

impl FromStr for CweId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
