/*!
 * Error types for the transcorpus application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the translation engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error when making a request to the engine fails
    #[error("Engine request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an engine response fails
    #[error("Failed to parse engine response: {0}")]
    ParseError(String),

    /// Error returned by the engine itself
    #[error("Engine responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the engine
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors that can occur while loading a corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    /// No input files matched the suffix filter
    #[error("No input files with suffix '{suffix}' found under {directory}")]
    NoInputFiles {
        /// Suffix filter that was applied
        suffix: String,
        /// Directory that was scanned
        directory: String,
    },
}

/// Errors that can occur while loading or validating a checkpoint
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Checkpoint state disagrees with the corpus
    #[error(
        "Checkpoint is inconsistent with the corpus: {corpus} corpus sentences, \
         {translated} already translated, but {pending} pending"
    )]
    Inconsistent {
        /// Number of unique sentences in the corpus
        corpus: usize,
        /// Number of sentences recorded as translated
        translated: usize,
        /// Number of sentences computed as pending
        pending: usize,
    },

    /// The two checkpoint files are not positionally aligned
    #[error("Checkpoint files are misaligned: {sources} sources vs {translations} translations")]
    Misaligned {
        /// Line count of the source-side file
        sources: usize,
        /// Line count of the translation-side file
        translations: usize,
    },
}

/// Errors that can occur during catalog processing
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be parsed
    #[error("Failed to parse catalog {path}: {message}")]
    ParseFailed {
        /// Path of the offending catalog
        path: String,
        /// Parser diagnostic
        message: String,
    },

    /// Catalog file could not be written back
    #[error("Failed to write catalog {path}: {message}")]
    WriteFailed {
        /// Path of the offending catalog
        path: String,
        /// Writer diagnostic
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from corpus loading
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Error from checkpoint handling
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Error from catalog processing
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Final counts disagree after a run
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run was cancelled and partial progress was saved
    #[error("Run interrupted: {0}")]
    Interrupted(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
