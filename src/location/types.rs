//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How much of an extraction is backed by the gazetteer.
///
/// Variants are declared from least to most reliable so the derived `Ord`
/// gives `High > Medium > Low > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Default for Confidence {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// The location pulled out of a single label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationResult {
    /// Canonical city name (e.g. "서울특별시").
    pub city: Option<String>,
    pub district: Option<String>,
    pub neighborhood: Option<String>,
    pub confidence: Confidence,
    /// District is a key of the gazetteer.
    #[serde(default)]
    pub district_validated: bool,
    /// Neighborhood is listed under the chosen district.
    #[serde(default)]
    pub neighborhood_validated: bool,
}

impl LocationResult {
    /// City, district and neighborhood are all present.
    pub fn is_complete(&self) -> bool {
        self.city.is_some() && self.district.is_some() && self.neighborhood.is_some()
    }

    /// Single-line summary, `✗` standing in for missing fields.
    pub fn display_line(&self) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "\u{2717}".into());
        format!(
            "{} / {} / {} [{}]",
            field(&self.city),
            field(&self.district),
            field(&self.neighborhood),
            self.confidence,
        )
    }
}

/// Location subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// A label entry that is not a string.
    #[error("Invalid label at index {index}: expected a string, found {found}")]
    InvalidInput { index: usize, found: String },

    #[error("Invalid threshold {0}: must be a finite percentage between 0 and 100")]
    InvalidThreshold(f64),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LocationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
