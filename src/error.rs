//! Error types for the decision engine and its storage boundary.

use crate::config::StrategyKind;

/// Fatal errors raised by the decision engine.
///
/// Soft conditions (insufficient variants, zero-sample intervals, neutral
/// ANOVA) are expressed as values, not errors; the variants here indicate
/// programming or configuration defects that must surface immediately.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configured strategy kind has no entry in the strategy registry.
    ///
    /// The registry is built once at process start and covers every
    /// [`StrategyKind`]; hitting this means the registry initialization was
    /// bypassed or broken, not that the input data was bad.
    #[error("no strategy registered for kind `{0}`")]
    UnknownStrategy(StrategyKind),
}

/// Errors surfaced by the experiment storage layer.
///
/// The engine never performs I/O itself; these are produced by
/// [`ExperimentStore`](crate::processor::ExperimentStore) implementations
/// and isolated per experiment by the batch processor.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Listing the RUNNING experiments failed.
    #[error("failed to fetch experiments: {0}")]
    Fetch(String),

    /// Marking an experiment completed failed.
    #[error("failed to complete experiment `{experiment_id}`: {message}")]
    Complete {
        /// Experiment the write was for.
        experiment_id: String,
        /// Storage-layer failure description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_message_names_kind() {
        let err = EngineError::UnknownStrategy(StrategyKind::Economic);
        assert!(err.to_string().contains("economic"));
    }

    #[test]
    fn store_error_messages() {
        let err = StoreError::Fetch("connection refused".into());
        assert!(err.to_string().contains("connection refused"));

        let err = StoreError::Complete {
            experiment_id: "exp-1".into(),
            message: "conflict".into(),
        };
        assert!(err.to_string().contains("exp-1"));
    }
}
