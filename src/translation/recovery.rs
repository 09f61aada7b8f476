/*!
 * Crash recovery handling.
 *
 * The recovery handler sits between the scheduler and the caller. A
 * completed run passes straight through; an interrupted or failed run has
 * its accumulators persisted to the checkpoint before the error surfaces,
 * so the next invocation resumes instead of re-translating. The process
 * then exits non-zero; nothing here retries.
 */

use log::{error, info, warn};

use crate::checkpoint::Checkpoint;
use crate::errors::AppError;
use crate::translation::scheduler::SchedulerOutcome;

/// Resolve a scheduler outcome into the final accumulators or an error.
///
/// On `Interrupted`/`Failed` with at least one completed epoch, the full
/// accumulator state is saved (best-effort; a save failure is logged, not
/// masked over the original error). With no completed epochs nothing is
/// written, leaving any prior on-disk checkpoint untouched.
pub fn finalize_run(
    outcome: SchedulerOutcome,
    checkpoint: &Checkpoint,
) -> Result<(Vec<String>, Vec<String>), AppError> {
    match outcome {
        SchedulerOutcome::Completed { processed, results } => Ok((processed, results)),

        SchedulerOutcome::Interrupted {
            processed,
            results,
            epochs_completed,
            reason,
        } => {
            save_partial(checkpoint, &processed, &results, epochs_completed);
            Err(AppError::Interrupted(format!(
                "{} ({} sentences saved)",
                reason,
                processed.len()
            )))
        }

        SchedulerOutcome::Failed {
            processed,
            results,
            epochs_completed,
            error,
        } => {
            save_partial(checkpoint, &processed, &results, epochs_completed);
            error!("Translation run failed: {}", error);
            Err(AppError::Unknown(error.to_string()))
        }
    }
}

/// Best-effort checkpoint write for a run that stopped early
fn save_partial(
    checkpoint: &Checkpoint,
    processed: &[String],
    results: &[String],
    epochs_completed: usize,
) {
    if epochs_completed == 0 {
        info!("No progress this run, leaving checkpoint as-is");
        return;
    }

    match checkpoint.save(processed, results) {
        Ok(()) => info!(
            "Saved partial progress: {} translated sentences under {:?}",
            results.len(),
            checkpoint.dir()
        ),
        Err(e) => warn!("Could not save partial progress: {}", e),
    }
}
