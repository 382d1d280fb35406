//! Reference hierarchy of districts and their neighborhoods.
//!
//! Built once, then shared read-only by every extraction. An empty
//! gazetteer is a valid (degraded) state: extraction still runs but can
//! never confirm a neighborhood.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// District name → set of neighborhood names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Gazetteer {
    districts: BTreeMap<String, BTreeSet<String>>,
}

impl Gazetteer {
    /// The empty gazetteer.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from (district, neighborhood) pairs. Pairs the builder rejects
    /// are logged and dropped; use [`GazetteerBuilder`] to inspect them.
    pub fn build<I, D, N>(records: I) -> Self
    where
        I: IntoIterator<Item = (D, N)>,
        D: AsRef<str>,
        N: AsRef<str>,
    {
        let mut builder = GazetteerBuilder::new();
        for (idx, (district, neighborhood)) in records.into_iter().enumerate() {
            builder.push(idx + 1, district.as_ref(), neighborhood.as_ref());
        }
        let (gazetteer, diagnostics) = builder.finish();
        for d in &diagnostics {
            tracing::warn!("gazetteer record rejected: {}", d);
        }
        gazetteer
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn district_count(&self) -> usize {
        self.districts.len()
    }

    pub fn neighborhood_count(&self) -> usize {
        self.districts.values().map(BTreeSet::len).sum()
    }

    pub fn contains_district(&self, district: &str) -> bool {
        self.districts.contains_key(district)
    }

    pub fn neighborhoods(&self, district: &str) -> Option<&BTreeSet<String>> {
        self.districts.get(district)
    }

    pub fn is_neighborhood_of(&self, district: &str, neighborhood: &str) -> bool {
        self.districts
            .get(district)
            .is_some_and(|set| set.contains(neighborhood))
    }

    /// District names in sorted order.
    pub fn districts(&self) -> impl Iterator<Item = &str> {
        self.districts.keys().map(String::as_str)
    }
}

/// Why a reference row was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowIssue {
    #[error("expected at least 3 columns, found {found}")]
    TooFewColumns { found: usize },

    #[error("empty {column} field")]
    EmptyField { column: &'static str },

    #[error("'{neighborhood}' already belongs to '{existing}', not added to '{rejected}'")]
    CrossDistrictAlias {
        neighborhood: String,
        existing: String,
        rejected: String,
    },
}

/// A rejected row and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDiagnostic {
    pub line: usize,
    #[serde(flatten)]
    pub issue: RowIssue,
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.issue)
    }
}

/// Column positions in a reference row: `city,district,neighborhood,...`.
const DISTRICT_COLUMN: usize = 1;
const NEIGHBORHOOD_COLUMN: usize = 2;
const MIN_COLUMNS: usize = 3;

/// Accumulates validated rows and keeps a diagnostic for every rejected one.
#[derive(Debug, Default)]
pub struct GazetteerBuilder {
    districts: BTreeMap<String, BTreeSet<String>>,
    owner: HashMap<String, String>,
    diagnostics: Vec<RowDiagnostic>,
}

impl GazetteerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a split delimited row (`city,district,neighborhood,...`).
    pub fn push_row(&mut self, line: usize, columns: &[&str]) -> bool {
        if columns.len() < MIN_COLUMNS {
            self.reject(line, RowIssue::TooFewColumns { found: columns.len() });
            return false;
        }
        self.push(line, columns[DISTRICT_COLUMN], columns[NEIGHBORHOOD_COLUMN])
    }

    /// Add one (district, neighborhood) pair. Returns whether it was accepted.
    pub fn push(&mut self, line: usize, district: &str, neighborhood: &str) -> bool {
        let district = district.trim();
        let neighborhood = neighborhood.trim();

        if district.is_empty() {
            self.reject(line, RowIssue::EmptyField { column: "district" });
            return false;
        }
        if neighborhood.is_empty() {
            self.reject(line, RowIssue::EmptyField { column: "neighborhood" });
            return false;
        }

        if let Some(existing) = self.owner.get(neighborhood) {
            if existing != district {
                let issue = RowIssue::CrossDistrictAlias {
                    neighborhood: neighborhood.to_string(),
                    existing: existing.clone(),
                    rejected: district.to_string(),
                };
                self.reject(line, issue);
                return false;
            }
        } else {
            self.owner.insert(neighborhood.to_string(), district.to_string());
        }

        self.districts
            .entry(district.to_string())
            .or_default()
            .insert(neighborhood.to_string());
        true
    }

    fn reject(&mut self, line: usize, issue: RowIssue) {
        self.diagnostics.push(RowDiagnostic { line, issue });
    }

    /// Rows rejected so far.
    pub fn diagnostics(&self) -> &[RowDiagnostic] {
        &self.diagnostics
    }

    pub fn finish(self) -> (Gazetteer, Vec<RowDiagnostic>) {
        (Gazetteer { districts: self.districts }, self.diagnostics)
    }
}
