//! Batch auto-winner processing.
//!
//! The processor walks every RUNNING experiment with auto-selection enabled
//! and either completes it with a winner or leaves it running. Experiments
//! are independent, so the batch runs on a bounded rayon pool; per-item
//! failures are recorded against the experiment id and never abort the
//! batch.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::result::{AutoWinnerResult, ExperimentError};
use crate::selector::{check_time_constraints, select_winner};
use crate::types::Experiment;

/// Synthetic experiment id used when the store cannot even list experiments.
const FETCH_ERROR_ID: &str = "<fetch>";

/// Upper bound on the default worker count.
const MAX_DEFAULT_WORKERS: usize = 8;

/// Storage boundary the processor drives.
///
/// Implementations live outside this crate (database, API client, in-memory
/// fixture). `mark_completed` must be idempotent-safe on the storage side:
/// the processor never re-checks an experiment's state after deciding.
pub trait ExperimentStore: Sync {
    /// List RUNNING experiments flagged for automatic winner selection,
    /// with their variant aggregates.
    fn fetch_auto_select_running(&self) -> Result<Vec<Experiment>, StoreError>;

    /// Mark an experiment COMPLETED with the chosen variant.
    fn mark_completed(&self, experiment_id: &str, variant_id: &str) -> Result<(), StoreError>;
}

/// What happened to one experiment during a batch run.
enum Evaluation {
    /// A winner was chosen and persisted.
    Completed,
    /// The experiment stays RUNNING.
    StillRunning,
    /// Evaluation or persistence failed; the experiment is untouched.
    Failed(String),
}

/// Batch processor applying winner selection to many experiments.
#[derive(Debug, Clone)]
pub struct AutoWinnerProcessor {
    worker_count: usize,
}

impl Default for AutoWinnerProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoWinnerProcessor {
    /// Processor with a default worker count: available parallelism, capped
    /// at 8.
    pub fn new() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
            .min(MAX_DEFAULT_WORKERS);
        Self {
            worker_count: workers,
        }
    }

    /// Processor with an explicit worker count.
    ///
    /// `workers == 1` gives strictly sequential processing.
    pub fn with_workers(workers: usize) -> Self {
        assert!(workers > 0, "worker count must be positive");
        Self {
            worker_count: workers,
        }
    }

    /// Run one batch: evaluate every eligible experiment and persist the
    /// decisions.
    ///
    /// Failures are isolated per experiment. A failure to list experiments
    /// at all yields an empty result carrying one synthetic error entry.
    pub fn process<S: ExperimentStore>(&self, store: &S) -> AutoWinnerResult {
        let experiments = match store.fetch_auto_select_running() {
            Ok(experiments) => experiments,
            Err(e) => {
                warn!(error = %e, "failed to fetch experiments for auto-winner run");
                return AutoWinnerResult {
                    errors: vec![ExperimentError {
                        experiment_id: FETCH_ERROR_ID.to_string(),
                        error: e.to_string(),
                    }],
                    ..AutoWinnerResult::default()
                };
            }
        };

        info!(
            count = experiments.len(),
            workers = self.worker_count,
            "starting auto-winner batch"
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .build();
        let evaluations: Vec<(String, Evaluation)> = match pool {
            Ok(pool) => pool.install(|| {
                experiments
                    .par_iter()
                    .map(|e| (e.id.clone(), evaluate_experiment(e, store)))
                    .collect()
            }),
            // Pool construction failing (resource exhaustion) degrades to
            // the sequential loop rather than aborting the batch.
            Err(e) => {
                warn!(error = %e, "thread pool unavailable, processing sequentially");
                experiments
                    .iter()
                    .map(|e| (e.id.clone(), evaluate_experiment(e, store)))
                    .collect()
            }
        };

        let mut result = AutoWinnerResult::default();
        for (experiment_id, evaluation) in evaluations {
            result.total_checked += 1;
            match evaluation {
                Evaluation::Completed => result.winners_selected += 1,
                Evaluation::StillRunning => result.still_running += 1,
                Evaluation::Failed(error) => result.errors.push(ExperimentError {
                    experiment_id,
                    error,
                }),
            }
        }

        info!(
            total = result.total_checked,
            winners = result.winners_selected,
            running = result.still_running,
            errors = result.errors.len(),
            "auto-winner batch finished"
        );

        result
    }
}

/// Evaluate one experiment and persist a winner if one is confirmed.
fn evaluate_experiment<S: ExperimentStore>(experiment: &Experiment, store: &S) -> Evaluation {
    // The store is expected to pre-filter, but a stale or buggy listing must
    // not complete an experiment the owner opted out of.
    if !experiment.auto_select_enabled {
        debug!(experiment = %experiment.id, "auto-selection disabled, skipping");
        return Evaluation::StillRunning;
    }

    let timing = &experiment.timing;
    let status = check_time_constraints(
        timing.started_at,
        timing.min_duration_days,
        timing.max_duration_days,
    );

    if !status.is_ready {
        debug!(
            experiment = %experiment.id,
            reason = %status.reasoning,
            "experiment not ready"
        );
        return Evaluation::StillRunning;
    }

    if status.should_force_selection {
        return force_select(experiment, store);
    }

    match select_winner(&experiment.variants, &experiment.config) {
        Ok(Some(candidate)) if candidate.meets_threshold => {
            debug!(
                experiment = %experiment.id,
                winner = %candidate.variant_id,
                "winner confirmed"
            );
            complete(experiment, &candidate.variant_id, store)
        }
        Ok(_) => Evaluation::StillRunning,
        Err(e) => Evaluation::Failed(e.to_string()),
    }
}

/// Max duration exceeded: take the statistical winner when one is
/// confirmed, otherwise the variant with the highest raw conversion rate
/// (first-encountered on ties).
fn force_select<S: ExperimentStore>(experiment: &Experiment, store: &S) -> Evaluation {
    let confirmed = match select_winner(&experiment.variants, &experiment.config) {
        Ok(candidate) => candidate.filter(|c| c.meets_threshold),
        Err(e) => return Evaluation::Failed(e.to_string()),
    };

    let variant_id = match confirmed {
        Some(candidate) => candidate.variant_id,
        None => {
            let best = experiment.variants.iter().reduce(|best, v| {
                if v.conversion_rate() > best.conversion_rate() {
                    v
                } else {
                    best
                }
            });
            match best {
                Some(v) => v.id.clone(),
                None => {
                    return Evaluation::Failed(
                        "cannot force-select a winner: experiment has no variants".to_string(),
                    )
                }
            }
        }
    };

    debug!(
        experiment = %experiment.id,
        winner = %variant_id,
        "max duration reached, forcing selection"
    );
    complete(experiment, &variant_id, store)
}

fn complete<S: ExperimentStore>(
    experiment: &Experiment,
    variant_id: &str,
    store: &S,
) -> Evaluation {
    match store.mark_completed(&experiment.id, variant_id) {
        Ok(()) => Evaluation::Completed,
        Err(e) => Evaluation::Failed(e.to_string()),
    }
}
