//! Location extraction subsystem for SafeGround.
//!
//! Pulls city, district and neighborhood out of short evaluation titles,
//! grades each extraction against a reference gazetteer, and aggregates
//! batch success rates into a go/no-go decision.

pub mod batch;
pub mod extractor;
pub mod gazetteer;
pub mod sources;
pub mod types;

pub use batch::{evaluate, BatchEvaluator, BatchMetrics, BatchOutcome, ConfidenceHistogram, DEFAULT_THRESHOLD};
pub use extractor::{extract, CAPITAL};
pub use gazetteer::{Gazetteer, GazetteerBuilder, RowDiagnostic, RowIssue};
pub use sources::{load_gazetteer, load_labels, DEFAULT_GAZETTEER_PATH, DEFAULT_LABELS_PATH};
pub use types::{Confidence, LocationError, LocationResult};
