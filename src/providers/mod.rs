/*!
 * Translation engine implementations.
 *
 * The engine is a black box from the pipeline's point of view: an
 * order-preserving function from a list of source sentences to a list of
 * translations. It may return fewer items than requested on partial
 * failure; callers treat the trailing items as still untranslated.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::EngineError;

/// Common trait for translation engines
///
/// Implementations may parallelize or sub-batch internally, but must return
/// translations in the same order as the input sentences.
#[async_trait]
pub trait TranslationEngine: Send + Sync + Debug {
    /// Translate a list of sentences from `source_lang` to `target_lang`.
    ///
    /// The result is position-aligned with the input. A shorter result is a
    /// permitted degraded outcome, never reordered or padded.
    async fn translate(
        &self,
        sentences: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, EngineError>;

    /// Test the connection to the engine
    async fn test_connection(&self) -> Result<(), EngineError>;
}

pub mod mock;
pub mod remote;
