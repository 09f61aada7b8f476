/*!
 * Core translation service implementation.
 *
 * The service is the pipeline's single gateway to the engine. Callers hand
 * it one sentence list per epoch (or per catalog); how that list is split
 * into wire requests, fanned out, and reassembled in order is decided here
 * and invisible to the scheduler.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;

use crate::app_config::EngineConfig;
use crate::errors::EngineError;
use crate::providers::TranslationEngine;
use crate::providers::remote::RemoteEngine;

/// Translation service wrapping an engine implementation
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Engine implementation
    engine: Arc<dyn TranslationEngine>,
    /// Character budget per engine request
    max_chars_per_request: usize,
    /// Bound on concurrent engine requests
    concurrent_requests: usize,
}

impl TranslationService {
    /// Create a service backed by the remote engine from configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            engine: Arc::new(RemoteEngine::new(config)),
            max_chars_per_request: config.max_chars_per_request,
            concurrent_requests: config.concurrent_requests,
        }
    }

    /// Create a service over an explicit engine, used by tests and library
    /// consumers that bring their own implementation
    pub fn with_engine(engine: Arc<dyn TranslationEngine>, config: &EngineConfig) -> Self {
        Self {
            engine,
            max_chars_per_request: config.max_chars_per_request,
            concurrent_requests: config.concurrent_requests,
        }
    }

    /// Translate a sentence list, preserving input order.
    ///
    /// The list is split into requests under the character budget and the
    /// requests run with bounded concurrency. A request error fails the
    /// whole call; a request that answers short truncates the result at the
    /// first gap, so the output is always a position-aligned prefix of the
    /// input. Callers decide what a short prefix means for them.
    pub async fn translate_sentences(
        &self,
        sentences: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, EngineError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = self.split_into_requests(sentences);
        debug!(
            "Translating {} sentences in {} engine request{}",
            sentences.len(),
            chunks.len(),
            if chunks.len() > 1 { "s" } else { "" }
        );

        let results = stream::iter(chunks.into_iter().enumerate())
            .map(|(index, chunk)| {
                let engine = self.engine.clone();
                let source_lang = source_lang.to_string();
                let target_lang = target_lang.to_string();

                async move {
                    let result = engine.translate(&chunk, &source_lang, &target_lang).await;
                    (index, chunk.len(), result)
                }
            })
            .buffer_unordered(self.concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Restore request order before reassembly
        let mut sorted = results;
        sorted.sort_by_key(|(index, _, _)| *index);

        let mut translations = Vec::with_capacity(sentences.len());
        for (index, requested, result) in sorted {
            let chunk_translations = result?;

            let short = chunk_translations.len() < requested;
            translations.extend(chunk_translations);

            if short {
                warn!(
                    "Engine answered request {} short; keeping the aligned prefix of {} translations",
                    index + 1,
                    translations.len()
                );
                break;
            }
        }

        Ok(translations)
    }

    /// Test the connection to the engine
    pub async fn test_connection(&self) -> Result<(), EngineError> {
        self.engine.test_connection().await
    }

    /// Split sentences into chunks under the per-request character budget.
    ///
    /// A sentence larger than the whole budget still travels alone; the
    /// engine owns any further subdivision.
    fn split_into_requests(&self, sentences: &[String]) -> Vec<Vec<String>> {
        let mut chunks = Vec::new();
        let mut current = Vec::new();
        let mut current_chars = 0;

        for sentence in sentences {
            if !current.is_empty() && current_chars + sentence.len() > self.max_chars_per_request {
                chunks.push(std::mem::take(&mut current));
                current_chars = 0;
            }

            current_chars += sentence.len();
            current.push(sentence.clone());
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}
