//! Presentation of a batch outcome: console report and JSON result file.
//!
//! Both are stateless consumers of [`BatchOutcome`].

use crate::location::{BatchMetrics, BatchOutcome, Confidence, LocationError, LocationResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Default location of the written results.
pub const DEFAULT_REPORT_PATH: &str = "data/sample/parsing_test_results.json";

const TIERS: [Confidence; 3] = [Confidence::High, Confidence::Medium, Confidence::Low];

/// Render the human-readable report.
pub fn render_report(outcome: &BatchOutcome) -> String {
    let m = &outcome.metrics;
    let mut out = String::new();

    out.push_str(&format!("  Parse rates ({} labels)\n", m.total));
    out.push_str("  ╔════════════════════════════════════════╗\n");
    out.push_str(&rate_line("City", m.city_rate));
    out.push_str(&rate_line("District", m.district_rate));
    out.push_str(&rate_line("Neighborhood", m.neighborhood_rate));
    out.push_str(&rate_line("All three", m.overall_rate));
    out.push_str("  ╠════════════════════════════════════════╣\n");

    for tier in TIERS {
        let count = m.confidence.get(tier);
        out.push_str(&format!(
            "  ║ {:<12} {:>5}  ({:>5.1}%)               ║\n",
            tier.to_string(),
            count,
            share(count, m.total),
        ));
    }
    out.push_str("  ╚════════════════════════════════════════╝\n");

    if outcome.decision {
        out.push_str(&format!(
            "  \u{2705} GO: overall {:.1}% >= {:.1}%\n",
            m.overall_rate, outcome.threshold
        ));
        out.push_str("  Next steps:\n");
        out.push_str("    1. Collect the full evaluation list\n");
        out.push_str("    2. Extract locations from every title\n");
        out.push_str("    3. Map results onto the reference neighborhoods\n");
    } else {
        out.push_str(&format!(
            "  \u{26A0}\u{FE0F}  NO-GO: overall {:.1}% < {:.1}%\n",
            m.overall_rate, outcome.threshold
        ));
        out.push_str("  Alternatives:\n");
        out.push_str("    1. Use incident records that carry an explicit neighborhood field\n");
        out.push_str("    2. Resolve street addresses through an address service\n");
        out.push_str("    3. Map manually if the volume is small\n");
    }
    out
}

fn rate_line(name: &str, rate: f64) -> String {
    format!("  ║ {:<12} {:>6.1}%                       ║\n", name, rate)
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

/// One extracted label as written to the results file.
#[derive(Debug, Clone, Serialize)]
pub struct LabelRecord<'a> {
    pub label: &'a str,
    #[serde(flatten)]
    pub result: &'a LocationResult,
}

/// The persisted form of a batch outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ParsingReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub total_count: usize,
    pub threshold: f64,
    pub decision: bool,
    pub success_rates: &'a BatchMetrics,
    pub results: Vec<LabelRecord<'a>>,
}

impl<'a> ParsingReport<'a> {
    pub fn new(outcome: &'a BatchOutcome) -> Self {
        Self {
            generated_at: Utc::now(),
            total_count: outcome.metrics.total,
            threshold: outcome.threshold,
            decision: outcome.decision,
            success_rates: &outcome.metrics,
            results: outcome
                .labels
                .iter()
                .zip(&outcome.results)
                .map(|(label, result)| LabelRecord { label: label.as_str(), result })
                .collect(),
        }
    }

    /// Write pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<(), LocationError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| LocationError::io(parent, e))?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| LocationError::io(path, e))?;
        tracing::info!(path = %path.display(), "results written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{BatchEvaluator, Gazetteer};
    use tempfile::TempDir;

    fn outcome(labels: &[&str]) -> BatchOutcome {
        let g = Gazetteer::build([("강남구", "역삼동")]);
        BatchEvaluator::default().evaluate(labels.iter().copied(), &g)
    }

    #[test]
    fn test_render_go() {
        let text = render_report(&outcome(&["강남구 역삼동", "서울 강남구 대치동"]));
        assert!(text.contains("Parse rates (2 labels)"));
        assert!(text.contains("100.0%"));
        assert!(text.contains("GO: overall 100.0% >= 70.0%"));
        assert!(text.contains("Next steps"));
    }

    #[test]
    fn test_render_no_go() {
        let text = render_report(&outcome(&["강남구 역삼동", "향후계획서 설치공사"]));
        assert!(text.contains("NO-GO: overall 50.0% < 70.0%"));
        assert!(text.contains("Alternatives"));
    }

    #[test]
    fn test_render_empty_batch() {
        let text = render_report(&outcome(&[]));
        assert!(text.contains("Parse rates (0 labels)"));
        assert!(text.contains("NO-GO"));
    }

    #[test]
    fn test_report_json_shape() {
        let o = outcome(&["강남구 역삼동 위험도평가"]);
        let report = ParsingReport::new(&o);
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["total_count"], 1);
        assert_eq!(v["decision"], true);
        assert_eq!(v["results"][0]["label"], "강남구 역삼동 위험도평가");
        assert_eq!(v["results"][0]["confidence"], "high");
        assert_eq!(v["results"][0]["district"], "강남구");
        assert_eq!(v["success_rates"]["confidence"]["high"], 1);
    }

    #[test]
    fn test_write_json_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("results.json");
        let o = outcome(&["강남구 역삼동"]);
        ParsingReport::new(&o).write_json(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["results"].as_array().unwrap().len(), 1);
        assert!(written["generated_at"].is_string());
    }
}
