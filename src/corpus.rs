/*!
 * Corpus loading.
 *
 * A corpus is the deduplicated set of sentences found across all matching
 * input files under a source directory. It is built once at the start of a
 * run and never mutated afterwards; everything downstream (resume tracking,
 * epoch scheduling) works against its sentence list.
 */

use anyhow::Result;
use log::{debug, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::CorpusError;
use crate::file_utils::FileManager;

/// Deduplicated set of source sentences in first-seen order.
///
/// First-seen order is the canonical iteration order: it keeps output and
/// checkpoint contents reproducible across restarts, which a hash-set
/// iteration would not.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Unique sentences, ordered by first encounter across the sorted file list
    sentences: Vec<String>,
    /// Number of input files that contributed
    file_count: usize,
}

impl Corpus {
    /// Load a corpus from all files matching `suffix` under `source_dir`.
    ///
    /// Excluded from enumeration: the output file itself, a file with the
    /// output's name at the source-directory root, and anything under the
    /// active checkpoint directory, so a run never re-reads what it is
    /// itself writing.
    pub fn load<P: AsRef<Path>>(
        source_dir: P,
        suffix: &str,
        output_path: &Path,
        checkpoint_dir: &Path,
    ) -> Result<Self, CorpusError> {
        let source_dir = source_dir.as_ref();

        let mut excludes = vec![
            output_path.to_path_buf(),
            checkpoint_dir.to_path_buf(),
        ];
        if let Some(name) = output_path.file_name() {
            excludes.push(source_dir.join(name));
        }

        let files = FileManager::find_files_with_suffix(source_dir, suffix, &excludes)
            .map_err(|_| CorpusError::NoInputFiles {
                suffix: suffix.to_string(),
                directory: source_dir.display().to_string(),
            })?;

        if files.is_empty() {
            return Err(CorpusError::NoInputFiles {
                suffix: suffix.to_string(),
                directory: source_dir.display().to_string(),
            });
        }

        info!(
            "Found {} input file{}",
            files.len(),
            if files.len() > 1 { "s" } else { "" }
        );

        Ok(Self::from_files(&files))
    }

    /// Build a corpus from an explicit file list
    fn from_files(files: &[PathBuf]) -> Self {
        let mut sentences = Vec::new();
        let mut seen = HashSet::new();

        for file in files {
            let lines = match FileManager::read_lines(file) {
                Ok(lines) => lines,
                Err(e) => {
                    // An unreadable file is skipped, not fatal; the final
                    // consistency check still covers whatever was loaded.
                    log::warn!("Skipping unreadable input file {:?}: {}", file, e);
                    continue;
                }
            };

            for line in lines {
                if seen.insert(line.clone()) {
                    sentences.push(line);
                }
            }
        }

        debug!("Loaded {} unique sentences", sentences.len());

        Corpus {
            sentences,
            file_count: files.len(),
        }
    }

    /// Build a corpus directly from sentences; duplicates collapse in
    /// first-seen order just as they do when loading from files
    pub fn from_sentences<I, S>(sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique = Vec::new();
        let mut seen = HashSet::new();

        for sentence in sentences {
            let sentence = sentence.into();
            if seen.insert(sentence.clone()) {
                unique.push(sentence);
            }
        }

        Corpus {
            sentences: unique,
            file_count: 0,
        }
    }

    /// Unique sentences in canonical order
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    /// Number of unique sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// True when the corpus holds no sentences
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Number of files the corpus was loaded from
    pub fn file_count(&self) -> usize {
        self.file_count
    }
}
