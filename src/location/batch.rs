//! Batch evaluation: extract every label, aggregate success rates, and
//! decide whether the label source is worth harvesting in full.

use super::extractor;
use super::gazetteer::Gazetteer;
use super::sources::labels_from_values;
use super::types::{Confidence, LocationError, LocationResult};
use serde::Serialize;

/// Overall rate (percent) required for a go decision.
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Counts per confidence tier. `None` results are not tallied here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfidenceHistogram {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ConfidenceHistogram {
    fn tally(&mut self, confidence: Confidence) {
        match confidence {
            Confidence::High => self.high += 1,
            Confidence::Medium => self.medium += 1,
            Confidence::Low => self.low += 1,
            Confidence::None => {}
        }
    }

    pub fn get(&self, confidence: Confidence) -> usize {
        match confidence {
            Confidence::High => self.high,
            Confidence::Medium => self.medium,
            Confidence::Low => self.low,
            Confidence::None => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Aggregate statistics for one batch. Rates are percentages in `[0, 100]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchMetrics {
    pub total: usize,
    pub city_rate: f64,
    pub district_rate: f64,
    pub neighborhood_rate: f64,
    /// Share of labels with city, district and neighborhood all present.
    pub overall_rate: f64,
    pub confidence: ConfidenceHistogram,
    /// Labels graded `None`.
    pub unresolved: usize,
}

impl BatchMetrics {
    /// Compute from a complete result list.
    pub fn from_results(results: &[LocationResult]) -> Self {
        let total = results.len();
        if total == 0 {
            return Self::default();
        }

        let (mut city, mut district, mut neighborhood, mut overall) = (0, 0, 0, 0);
        let mut histogram = ConfidenceHistogram::default();
        for r in results {
            city += usize::from(r.city.is_some());
            district += usize::from(r.district.is_some());
            neighborhood += usize::from(r.neighborhood.is_some());
            overall += usize::from(r.is_complete());
            histogram.tally(r.confidence);
        }

        let rate = |count: usize| 100.0 * count as f64 / total as f64;
        Self {
            total,
            city_rate: rate(city),
            district_rate: rate(district),
            neighborhood_rate: rate(neighborhood),
            overall_rate: rate(overall),
            unresolved: total - histogram.total(),
            confidence: histogram,
        }
    }
}

/// Results, metrics and the go/no-go decision for one batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub labels: Vec<String>,
    pub results: Vec<LocationResult>,
    pub metrics: BatchMetrics,
    pub threshold: f64,
    pub decision: bool,
}

/// Runs extraction over a batch and applies the decision threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchEvaluator {
    threshold: f64,
}

impl Default for BatchEvaluator {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}

impl BatchEvaluator {
    /// Threshold is a percentage; it must be finite and within `[0, 100]`.
    pub fn new(threshold: f64) -> Result<Self, LocationError> {
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(LocationError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Extract every label in input order and aggregate.
    pub fn evaluate<I, S>(&self, labels: I, gazetteer: &Gazetteer) -> BatchOutcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let results: Vec<LocationResult> = labels
            .iter()
            .map(|label| extractor::extract(label, gazetteer))
            .collect();
        let metrics = BatchMetrics::from_results(&results);
        let decision = self.decide(&metrics);

        tracing::info!(
            total = metrics.total,
            overall_rate = metrics.overall_rate,
            threshold = self.threshold,
            decision,
            "batch evaluated"
        );

        BatchOutcome {
            labels,
            results,
            metrics,
            threshold: self.threshold,
            decision,
        }
    }

    /// Evaluate raw JSON entries. Every entry is checked before any
    /// extraction runs, so a malformed batch produces no partial outcome.
    pub fn evaluate_values(
        &self,
        values: &[serde_json::Value],
        gazetteer: &Gazetteer,
    ) -> Result<BatchOutcome, LocationError> {
        let labels = labels_from_values(values)?;
        Ok(self.evaluate(labels, gazetteer))
    }

    /// An empty batch never passes.
    fn decide(&self, metrics: &BatchMetrics) -> bool {
        metrics.total > 0 && metrics.overall_rate >= self.threshold
    }
}

/// Evaluate `labels` against `gazetteer` with the given threshold.
pub fn evaluate<I, S>(
    labels: I,
    gazetteer: &Gazetteer,
    threshold: f64,
) -> Result<BatchOutcome, LocationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(BatchEvaluator::new(threshold)?.evaluate(labels, gazetteer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn gazetteer() -> Gazetteer {
        Gazetteer::build([("강남구", "역삼동"), ("종로구", "사직동")])
    }

    fn ten_labels() -> Vec<&'static str> {
        vec![
            "강남구 역삼동 위험도평가",
            "강남구 대치동 위험도평가",
            "종로구 사직동 굴착공사",
            "서울 종로구 사직동 정비",
            "부산 해운대구 우동 보수",
            "대전 유성구 봉명동 공사",
            "서울 중구 명동 하수관로",
            "해운대구 정비공사",
            "향후계획서 설치공사",
            "서울 지하철 공사",
        ]
    }

    #[test]
    fn test_seven_of_ten_passes_default_threshold() {
        let outcome = BatchEvaluator::default().evaluate(ten_labels(), &gazetteer());
        let m = &outcome.metrics;
        assert_eq!(m.total, 10);
        assert_relative_eq!(m.overall_rate, 70.0);
        assert!(outcome.decision);
    }

    #[test]
    fn test_rates_and_histogram() {
        let outcome = BatchEvaluator::default().evaluate(ten_labels(), &gazetteer());
        let m = &outcome.metrics;
        // "해운대구" carries the city short name "대구"
        assert_relative_eq!(m.city_rate, 90.0);
        assert_relative_eq!(m.district_rate, 80.0);
        assert_relative_eq!(m.neighborhood_rate, 70.0);
        assert_eq!(m.confidence, ConfidenceHistogram { high: 3, medium: 4, low: 2 });
        assert_eq!(m.unresolved, 1);
        assert_eq!(m.confidence.total() + m.unresolved, m.total);
    }

    #[test]
    fn test_results_keep_input_order() {
        let labels = ten_labels();
        let outcome = BatchEvaluator::default().evaluate(labels.clone(), &gazetteer());
        assert_eq!(outcome.labels, labels);
        assert_eq!(outcome.results.len(), labels.len());
        assert_eq!(outcome.results[0].neighborhood.as_deref(), Some("역삼동"));
        assert_eq!(outcome.results[8].confidence, Confidence::None);
    }

    #[test]
    fn test_below_threshold_fails() {
        let evaluator = BatchEvaluator::new(75.0).unwrap();
        let outcome = evaluator.evaluate(ten_labels(), &gazetteer());
        assert!(!outcome.decision);
        assert_relative_eq!(outcome.threshold, 75.0);
    }

    #[test]
    fn test_empty_batch_never_passes() {
        for threshold in [0.0, 70.0, 100.0] {
            let outcome = evaluate(Vec::<String>::new(), &gazetteer(), threshold).unwrap();
            assert_eq!(outcome.metrics, BatchMetrics::default());
            assert_relative_eq!(outcome.metrics.overall_rate, 0.0);
            assert!(!outcome.decision);
        }
    }

    #[test]
    fn test_rate_bounds() {
        for g in [gazetteer(), Gazetteer::empty()] {
            let m = BatchEvaluator::default().evaluate(ten_labels(), &g).metrics;
            for rate in [m.city_rate, m.district_rate, m.neighborhood_rate, m.overall_rate] {
                assert!((0.0..=100.0).contains(&rate));
            }
            assert!(m.overall_rate <= m.city_rate.min(m.district_rate).min(m.neighborhood_rate));
        }
    }

    #[test]
    fn test_overall_requires_all_fields_on_same_label() {
        // city on one label, district+neighborhood on another
        let outcome = BatchEvaluator::default()
            .evaluate(["서울 공사", "수영구 광안동"], &Gazetteer::empty());
        let m = &outcome.metrics;
        assert_relative_eq!(m.city_rate, 50.0);
        assert_relative_eq!(m.district_rate, 50.0);
        assert_relative_eq!(m.neighborhood_rate, 50.0);
        assert_relative_eq!(m.overall_rate, 0.0);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert!(matches!(BatchEvaluator::new(f64::NAN), Err(LocationError::InvalidThreshold(_))));
        assert!(BatchEvaluator::new(100.5).is_err());
        assert!(BatchEvaluator::new(-1.0).is_err());
        assert_relative_eq!(BatchEvaluator::default().threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_evaluate_values_rejects_non_string() {
        let values = vec![json!("강남구 역삼동"), json!(null), json!(3)];
        let err = BatchEvaluator::default()
            .evaluate_values(&values, &gazetteer())
            .unwrap_err();
        assert!(matches!(err, LocationError::InvalidInput { index: 1, .. }));
    }

    #[test]
    fn test_evaluate_values_accepts_strings() {
        let values = vec![json!("강남구 역삼동"), json!("향후계획서")];
        let outcome = BatchEvaluator::default()
            .evaluate_values(&values, &gazetteer())
            .unwrap();
        assert_eq!(outcome.metrics.total, 2);
        assert_eq!(outcome.metrics.confidence.get(Confidence::High), 1);
    }
}
