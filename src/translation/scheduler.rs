/*!
 * Epoch batch scheduling.
 *
 * The scheduler owns the run's two accumulators — processed sources and
 * their translations — threads them through every epoch, and returns them
 * inside an explicit outcome. No state lives outside the returned value, so
 * the failure path always sees exactly what the success path would have.
 */

use anyhow::anyhow;
use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::checkpoint::Checkpoint;
use crate::translation::core::TranslationService;

/// Cooperative cancellation flag, set from a signal handler and read at
/// epoch boundaries only
pub type CancelFlag = Arc<AtomicBool>;

/// Throughput snapshot surfaced after each epoch
#[derive(Debug, Clone)]
pub struct EpochReport {
    /// 1-based index of the epoch that just finished
    pub epoch: usize,
    /// Total number of epochs in this run
    pub epoch_count: usize,
    /// Sentences translated in this epoch
    pub epoch_sentences: usize,
    /// Sentences per second for this epoch
    pub epoch_rate: f64,
    /// Sentences per second since the scheduler started
    pub cumulative_rate: f64,
    /// Estimated seconds remaining at the cumulative rate
    pub eta_seconds: f64,
    /// Sentences still outstanding after this epoch
    pub remaining: usize,
}

/// Result of a scheduler pass.
///
/// Every variant carries the full accumulators (prior progress plus
/// whatever this run added), so the caller can persist or publish them
/// without reaching into scheduler internals.
#[derive(Debug)]
pub enum SchedulerOutcome {
    /// All epochs ran and every outstanding sentence was translated
    Completed {
        /// All processed source sentences, prior plus new
        processed: Vec<String>,
        /// Their translations, positionally aligned
        results: Vec<String>,
    },
    /// The run stopped early but consistently: cancellation, or an engine
    /// reply that came back short
    Interrupted {
        /// All processed source sentences, prior plus new
        processed: Vec<String>,
        /// Their translations, positionally aligned
        results: Vec<String>,
        /// Epochs that completed before the stop
        epochs_completed: usize,
        /// Human-readable reason for the stop
        reason: String,
    },
    /// The engine failed; accumulators hold everything completed before it
    Failed {
        /// All processed source sentences, prior plus new
        processed: Vec<String>,
        /// Their translations, positionally aligned
        results: Vec<String>,
        /// Epochs that completed before the failure
        epochs_completed: usize,
        /// The underlying failure
        error: anyhow::Error,
    },
}

/// Validate an epoch count against the outstanding work size.
///
/// One epoch is always a single full pass. For more than one, the count
/// must stay below the number of outstanding sentences so every epoch
/// covers measurable progress; the final epoch absorbs the integer-division
/// remainder.
pub fn validate_epochs(epochs: usize, outstanding: usize) -> Result<usize, anyhow::Error> {
    if epochs == 0 {
        return Err(anyhow!("Epoch count must be at least 1"));
    }

    if epochs == 1 {
        return Ok(outstanding);
    }

    if epochs >= outstanding {
        return Err(anyhow!(
            "Epoch count {} is too large for {} outstanding sentences",
            epochs,
            outstanding
        ));
    }

    Ok(outstanding / epochs)
}

/// Epoch batch scheduler driving the engine over the outstanding set
pub struct EpochScheduler<'a> {
    /// Engine facade
    service: &'a TranslationService,
    /// Checkpoint written after every successful epoch
    checkpoint: &'a Checkpoint,
    /// Cooperative cancellation flag
    cancel: CancelFlag,
}

impl<'a> EpochScheduler<'a> {
    /// Create a scheduler over the given service and checkpoint location
    pub fn new(
        service: &'a TranslationService,
        checkpoint: &'a Checkpoint,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            service,
            checkpoint,
            cancel,
        }
    }

    /// Run all epochs over the outstanding sentences.
    ///
    /// `prior` seeds the accumulators with checkpointed progress; the epochs
    /// only cover `pending`. After each successful epoch the full accumulator
    /// state is checkpointed (overwrite, never append) and a throughput
    /// report handed to `progress`.
    #[allow(clippy::too_many_arguments)]
    pub async fn run(
        &self,
        pending: Vec<String>,
        prior: (Vec<String>, Vec<String>),
        epochs: usize,
        source_lang: &str,
        target_lang: &str,
        progress: impl Fn(&EpochReport),
    ) -> SchedulerOutcome {
        let (mut processed, mut results) = prior;
        let outstanding = pending.len();

        let epoch_size = match validate_epochs(epochs, outstanding) {
            Ok(size) => size,
            Err(error) => {
                return SchedulerOutcome::Failed {
                    processed,
                    results,
                    epochs_completed: 0,
                    error,
                };
            }
        };

        let run_start = Instant::now();
        let mut translated_this_run = 0;

        for epoch in 0..epochs {
            if self.cancel.load(Ordering::SeqCst) {
                info!("Cancellation requested, stopping before epoch {}", epoch + 1);
                return SchedulerOutcome::Interrupted {
                    processed,
                    results,
                    epochs_completed: epoch,
                    reason: "cancelled".to_string(),
                };
            }

            let start = epoch * epoch_size;
            let end = if epoch + 1 == epochs {
                outstanding
            } else {
                start + epoch_size
            };
            let slice = &pending[start..end];

            let epoch_start = Instant::now();
            let translations = match self
                .service
                .translate_sentences(slice, source_lang, target_lang)
                .await
            {
                Ok(translations) => translations,
                Err(e) => {
                    return SchedulerOutcome::Failed {
                        processed,
                        results,
                        epochs_completed: epoch,
                        error: e.into(),
                    };
                }
            };

            // A short reply still yields an aligned prefix: only the sources
            // that actually got translated enter the accumulators.
            let translated = translations.len();
            processed.extend_from_slice(&slice[..translated]);
            results.extend(translations);
            translated_this_run += translated;

            if let Err(e) = self.checkpoint.save(&processed, &results) {
                warn!("Failed to checkpoint after epoch {}: {}", epoch + 1, e);
            }

            let epoch_secs = epoch_start.elapsed().as_secs_f64();
            let total_secs = run_start.elapsed().as_secs_f64();
            let cumulative_rate = if total_secs > 0.0 {
                translated_this_run as f64 / total_secs
            } else {
                0.0
            };
            let remaining = outstanding - (start + translated);

            let report = EpochReport {
                epoch: epoch + 1,
                epoch_count: epochs,
                epoch_sentences: translated,
                epoch_rate: if epoch_secs > 0.0 {
                    translated as f64 / epoch_secs
                } else {
                    0.0
                },
                cumulative_rate,
                eta_seconds: if cumulative_rate > 0.0 {
                    remaining as f64 / cumulative_rate
                } else {
                    0.0
                },
                remaining,
            };
            progress(&report);

            if translated < slice.len() {
                return SchedulerOutcome::Interrupted {
                    processed,
                    results,
                    epochs_completed: epoch + 1,
                    reason: format!(
                        "engine answered short in epoch {} ({} of {} sentences)",
                        epoch + 1,
                        translated,
                        slice.len()
                    ),
                };
            }
        }

        SchedulerOutcome::Completed { processed, results }
    }
}
