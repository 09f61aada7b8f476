/*!
 * Mock engine implementations for testing.
 *
 * This module provides mock engines that simulate different behaviors:
 * - `MockEngine::identity()` - echoes every sentence back unchanged
 * - `MockEngine::prefixing()` - tags each sentence so tests can spot output
 * - `MockEngine::mapping()` - translates via a fixed lookup table
 * - `MockEngine::failing_after(n)` - succeeds n times, then errors
 * - `MockEngine::truncating(n)` - drops all but the first n translations
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::EngineError;
use crate::providers::TranslationEngine;

/// Behavior mode for the mock engine
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return every sentence unchanged
    Identity,
    /// Prefix each sentence with a marker
    Prefixing,
    /// Translate via a fixed msgid -> translation table; unmapped sentences
    /// echo back unchanged
    Mapping(HashMap<String, String>),
    /// Succeed for the first `succeed_calls` calls, then always fail
    FailingAfter {
        /// Number of calls that succeed before failures start
        succeed_calls: usize,
    },
    /// Return only the first `keep` translations of each call
    Truncating {
        /// Number of translations to keep per call
        keep: usize,
    },
}

/// Mock engine for exercising pipeline behavior without a server
#[derive(Debug)]
pub struct MockEngine {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls made so far
    call_count: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Engine that echoes input back unchanged
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Engine that prefixes each sentence with `[xx] `
    pub fn prefixing() -> Self {
        Self::new(MockBehavior::Prefixing)
    }

    /// Engine backed by a fixed translation table
    pub fn mapping<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let table = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(MockBehavior::Mapping(table))
    }

    /// Engine that succeeds `succeed_calls` times, then errors
    pub fn failing_after(succeed_calls: usize) -> Self {
        Self::new(MockBehavior::FailingAfter { succeed_calls })
    }

    /// Engine that returns at most `keep` translations per call
    pub fn truncating(keep: usize) -> Self {
        Self::new(MockBehavior::Truncating { keep })
    }

    /// Number of translate calls observed so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationEngine for MockEngine {
    async fn translate(
        &self,
        sentences: &[String],
        _source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, EngineError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Identity => Ok(sentences.to_vec()),
            MockBehavior::Prefixing => Ok(sentences
                .iter()
                .map(|s| format!("[{}] {}", target_lang, s))
                .collect()),
            MockBehavior::Mapping(table) => Ok(sentences
                .iter()
                .map(|s| table.get(s).cloned().unwrap_or_else(|| s.clone()))
                .collect()),
            MockBehavior::FailingAfter { succeed_calls } => {
                if call < *succeed_calls {
                    Ok(sentences.to_vec())
                } else {
                    Err(EngineError::RequestFailed(
                        "mock engine configured to fail".to_string(),
                    ))
                }
            }
            MockBehavior::Truncating { keep } => {
                Ok(sentences.iter().take(*keep).cloned().collect())
            }
        }
    }

    async fn test_connection(&self) -> Result<(), EngineError> {
        Ok(())
    }
}
