use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::EngineConfig;
use crate::errors::EngineError;
use crate::providers::TranslationEngine;

/// Client for a remote translation engine server.
///
/// The server exposes a single JSON endpoint: POST `/translate` with the
/// model, language pair and sentence list, answering with the translations
/// in the same order. Model loading, device dispatch and quality are the
/// server's concern entirely.
#[derive(Debug)]
pub struct RemoteEngine {
    /// Base URL of the engine server
    base_url: String,
    /// Model identifier forwarded with each request
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Translate request for the engine API
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Model identifier
    model: &'a str,
    /// Source language identifier
    source_language: &'a str,
    /// Target language identifier
    target_language: &'a str,
    /// Sentences to translate
    sentences: &'a [String],
}

/// Translate response from the engine API
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// Translations, position-aligned with the request sentences
    translations: Vec<String>,
}

impl RemoteEngine {
    /// Create a new engine client from configuration
    pub fn new(config: &EngineConfig) -> Self {
        let base_url = config.endpoint.trim_end_matches('/').to_string();

        Self {
            base_url,
            model: config.model.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }

    /// POST one translate request with retry and exponential backoff
    async fn request(
        &self,
        sentences: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, EngineError> {
        let url = format!("{}/translate", self.base_url);
        let request = TranslateRequest {
            model: &self.model,
            source_language: source_lang,
            target_language: target_lang,
            sentences,
        };

        let mut attempt = 0;
        let mut last_error = EngineError::RequestFailed("no attempts made".to_string());

        while attempt <= self.max_retries {
            if attempt > 0 {
                let backoff = self.backoff_base_ms * (1 << (attempt - 1));
                debug!("Retrying engine request in {}ms (attempt {})", backoff, attempt);
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            match self.client.post(&url).json(&request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return match response.json::<TranslateResponse>().await {
                            Ok(parsed) => Ok(parsed.translations),
                            Err(e) => Err(EngineError::ParseError(e.to_string())),
                        };
                    }

                    let message = response.text().await.unwrap_or_default();
                    error!("Engine returned {}: {}", status, message);
                    last_error = EngineError::ApiError {
                        status_code: status.as_u16(),
                        message,
                    };

                    // Client errors will not improve on retry
                    if status.is_client_error() {
                        return Err(last_error);
                    }
                }
                Err(e) => {
                    last_error = EngineError::ConnectionError(e.to_string());
                }
            }

            attempt += 1;
        }

        Err(last_error)
    }
}

#[async_trait]
impl TranslationEngine for RemoteEngine {
    async fn translate(
        &self,
        sentences: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, EngineError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let translations = self.request(sentences, source_lang, target_lang).await?;

        if translations.len() > sentences.len() {
            return Err(EngineError::ParseError(format!(
                "Engine returned {} translations for {} sentences",
                translations.len(),
                sentences.len()
            )));
        }

        Ok(translations)
    }

    async fn test_connection(&self) -> Result<(), EngineError> {
        let url = format!("{}/health", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(EngineError::ApiError {
                status_code: response.status().as_u16(),
                message: "health check failed".to_string(),
            }),
            Err(e) => Err(EngineError::ConnectionError(e.to_string())),
        }
    }
}
