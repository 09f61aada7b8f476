/*!
 * Resume state tracking and crash-safe checkpoint persistence.
 *
 * A checkpoint records every (source sentence, translation) pair completed
 * so far, as two newline-joined text files with positionally aligned lines.
 * It is always written as a whole-state overwrite, never an append, so a
 * restart can trust whatever it finds: either a complete prior state or
 * nothing.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::corpus::Corpus;
use crate::errors::CheckpointError;
use crate::file_utils::FileManager;

/// Handle to the checkpoint location for one (output, source, target) triple
#[derive(Debug, Clone)]
pub struct Checkpoint {
    /// Directory holding the two state files
    dir: PathBuf,
    /// File of already-translated source sentences
    source_file: PathBuf,
    /// File of their translations, line-aligned with `source_file`
    target_file: PathBuf,
}

/// Prior progress loaded from a checkpoint: aligned source/translation pairs
#[derive(Debug, Clone, Default)]
pub struct ResumeState {
    /// Source sentences already processed, order-preserving
    pub translated_source: Vec<String>,
    /// Their translations, same length, positionally aligned
    pub translation_output: Vec<String>,
}

impl ResumeState {
    /// Number of pairs carried over from the previous run
    pub fn len(&self) -> usize {
        self.translated_source.len()
    }

    /// True when no prior progress exists
    pub fn is_empty(&self) -> bool {
        self.translated_source.is_empty()
    }

    /// Compute the outstanding sentences: corpus minus prior progress, in
    /// corpus order.
    ///
    /// The length identity `corpus − translated == pending` is asserted
    /// here; a violation means the checkpoint does not describe this corpus
    /// (stale or corrupt) and the run must stop rather than guess.
    pub fn pending(&self, corpus: &Corpus) -> Result<Vec<String>, CheckpointError> {
        let translated: HashSet<&str> =
            self.translated_source.iter().map(|s| s.as_str()).collect();

        let pending: Vec<String> = corpus
            .sentences()
            .iter()
            .filter(|s| !translated.contains(s.as_str()))
            .cloned()
            .collect();

        if corpus.len() < self.translated_source.len()
            || corpus.len() - self.translated_source.len() != pending.len()
        {
            return Err(CheckpointError::Inconsistent {
                corpus: corpus.len(),
                translated: self.translated_source.len(),
                pending: pending.len(),
            });
        }

        Ok(pending)
    }
}

impl Checkpoint {
    /// Derive the checkpoint location from the output path and language pair.
    ///
    /// The directory is the output path with a `.cache` suffix substituted
    /// for its extension (`out.txt` -> `out.cache/`), with per-pair file
    /// names so different language pairs never collide.
    pub fn for_output(output_path: &Path, source_lang: &str, target_lang: &str) -> Self {
        let dir = output_path.with_extension("cache");
        let pair = format!("{}-{}", source_lang, target_lang);
        let source_file = dir.join(format!("translated.{}.txt", pair));
        let target_file = dir.join(format!("translations.{}.txt", pair));

        Checkpoint {
            dir,
            source_file,
            target_file,
        }
    }

    /// Directory the checkpoint files live under
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load prior progress.
    ///
    /// A missing directory, or only one of the two files present, or files
    /// with different line counts, all come back as empty state: forward
    /// progress is preferred over perfect resumption, and the worst case is
    /// re-translating what a torn checkpoint could not prove was done.
    pub fn load(&self) -> ResumeState {
        if !FileManager::file_exists(&self.source_file)
            || !FileManager::file_exists(&self.target_file)
        {
            debug!("No checkpoint found under {:?}", self.dir);
            return ResumeState::default();
        }

        let translated_source = match FileManager::read_lines(&self.source_file) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Ignoring unreadable checkpoint {:?}: {}", self.source_file, e);
                return ResumeState::default();
            }
        };

        let translation_output = match FileManager::read_lines(&self.target_file) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Ignoring unreadable checkpoint {:?}: {}", self.target_file, e);
                return ResumeState::default();
            }
        };

        if translated_source.len() != translation_output.len() {
            warn!(
                "Checkpoint files are misaligned ({} sources vs {} translations), \
                 treating as no prior progress",
                translated_source.len(),
                translation_output.len()
            );
            return ResumeState::default();
        }

        info!(
            "Resuming from checkpoint: {} sentences already translated",
            translated_source.len()
        );

        ResumeState {
            translated_source,
            translation_output,
        }
    }

    /// Persist the full current state, overwriting any previous checkpoint.
    ///
    /// Old files are deleted first and the new state written whole; appending
    /// could duplicate entries if a previous save was interrupted. Parent
    /// directories are created as needed.
    pub fn save(&self, processed: &[String], results: &[String]) -> Result<()> {
        if processed.len() != results.len() {
            return Err(CheckpointError::Misaligned {
                sources: processed.len(),
                translations: results.len(),
            }
            .into());
        }

        FileManager::ensure_dir(&self.dir)
            .with_context(|| format!("Failed to create checkpoint directory {:?}", self.dir))?;

        FileManager::remove_file_if_exists(&self.source_file)?;
        FileManager::remove_file_if_exists(&self.target_file)?;

        FileManager::write_lines(&self.source_file, processed)?;
        FileManager::write_lines(&self.target_file, results)?;

        debug!(
            "Checkpoint saved: {} pairs under {:?}",
            processed.len(),
            self.dir
        );

        Ok(())
    }
}
