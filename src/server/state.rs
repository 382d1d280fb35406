use crate::location::{BatchEvaluator, Gazetteer};

/// Shared read-only: extraction never mutates the gazetteer.
pub struct AppState {
    pub gazetteer: Gazetteer,
    pub evaluator: BatchEvaluator,
}
