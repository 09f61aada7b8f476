/*!
 * Translation pipeline.
 *
 * This module contains the pieces that move outstanding sentences through
 * the engine:
 * - `translation::core`: engine facade with request sub-batching
 * - `translation::scheduler`: epoch-based batch scheduling with
 *   throughput/ETA accounting and per-epoch checkpoints
 * - `translation::recovery`: failure boundary that persists partial
 *   progress before the process exits
 */

pub mod core;
pub mod recovery;
pub mod scheduler;

pub use self::core::TranslationService;
pub use self::recovery::finalize_run;
pub use self::scheduler::{EpochReport, EpochScheduler, SchedulerOutcome};
