/*!
 * Catalog translation management.
 *
 * Parallel pipeline to the corpus flow, for gettext-style catalogs. Each
 * catalog declares its own language in its metadata; only catalogs whose
 * declared language matches the requested target are touched, and only
 * their `msgstr` values ever change. Writing back happens once per catalog,
 * after every selected entry has been updated, so a catalog on disk is
 * always either the old state or the new one.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use polib::catalog::Catalog;
use polib::message::{MessageMutView, MessageView};
use polib::po_file;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use crate::errors::{AppError, CatalogError};
use crate::language_utils;
use crate::translation::core::TranslationService;
use crate::translation::scheduler::CancelFlag;

// @const: "French <traduc@traduc.org>" -> "French"
static LANGUAGE_TEAM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^<]+?)\s*(?:<[^>]*>)?\s*$").unwrap()
});

/// What happened to a single catalog file
#[derive(Debug, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// Entries were translated and the catalog written back
    Translated(usize),
    /// The catalog was left untouched
    Skipped(SkipReason),
}

/// Why a catalog was left untouched
#[derive(Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Declared language does not match the requested target
    LanguageMismatch,
    /// No language declared in the catalog metadata
    NoLanguage,
    /// Nothing selected for translation
    NothingToTranslate,
}

/// Totals for one target language
#[derive(Debug, Clone, Default)]
pub struct LanguageStats {
    /// Target language the totals are for
    pub language: String,
    /// Entries whose msgstr was set this run
    pub entries_translated: usize,
    /// Catalogs translated and written back
    pub catalogs_processed: usize,
    /// Catalogs skipped (mismatch, no metadata, empty selection)
    pub catalogs_skipped: usize,
}

/// Overall totals across all target languages of a run
#[derive(Debug, Clone, Default)]
pub struct CatalogRunStats {
    /// Per-language totals, in processing order
    pub languages: Vec<LanguageStats>,
}

impl CatalogRunStats {
    /// Entries translated across all languages
    pub fn entries_translated(&self) -> usize {
        self.languages.iter().map(|l| l.entries_translated).sum()
    }

    /// Catalogs processed across all languages
    pub fn catalogs_processed(&self) -> usize {
        self.languages.iter().map(|l| l.catalogs_processed).sum()
    }

    /// Catalogs skipped across all languages
    pub fn catalogs_skipped(&self) -> usize {
        self.languages.iter().map(|l| l.catalogs_skipped).sum()
    }
}

/// Catalog translation manager
pub struct CatalogTranslator<'a> {
    /// Engine facade
    service: &'a TranslationService,
    /// Source language entries are translated from
    source_language: String,
    /// Overwrite already-translated entries
    force: bool,
    /// Cooperative cancellation flag, read between catalogs
    cancel: CancelFlag,
}

impl<'a> CatalogTranslator<'a> {
    /// Create a manager over the given service
    pub fn new(
        service: &'a TranslationService,
        source_language: &str,
        force: bool,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            service,
            source_language: source_language.to_string(),
            force,
            cancel,
        }
    }

    /// Translate catalogs for one target language, or for every discovered
    /// target when none is given
    pub async fn run<P: AsRef<Path>>(
        &self,
        root: P,
        target: Option<&str>,
        progress: impl Fn(usize, usize),
    ) -> Result<CatalogRunStats, AppError> {
        let root = root.as_ref();

        let targets = match target {
            Some(target) => vec![target.to_string()],
            None => {
                let discovered = discover_target_languages(root, &self.source_language)?;
                if discovered.is_empty() {
                    warn!("No target languages discovered under {:?}", root);
                }
                discovered
            }
        };

        let mut stats = CatalogRunStats::default();
        for target in &targets {
            let language_stats = self.run_language(root, target, &progress).await?;
            info!(
                "{}: {} entries translated, {} catalogs processed, {} skipped",
                language_label(target),
                language_stats.entries_translated,
                language_stats.catalogs_processed,
                language_stats.catalogs_skipped
            );
            stats.languages.push(language_stats);
        }

        Ok(stats)
    }

    /// Translate all catalogs matching one target language
    async fn run_language(
        &self,
        root: &Path,
        target: &str,
        progress: &impl Fn(usize, usize),
    ) -> Result<LanguageStats, AppError> {
        let files = catalog_files_for_target(root, target)?;
        info!(
            "Found {} catalog{} for {}",
            files.len(),
            if files.len() == 1 { "" } else { "s" },
            language_label(target)
        );

        let mut stats = LanguageStats {
            language: target.to_string(),
            ..LanguageStats::default()
        };

        for (index, file) in files.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                return Err(AppError::Interrupted(format!(
                    "cancelled before catalog {:?}; {} catalogs already written",
                    file, stats.catalogs_processed
                )));
            }

            match self.translate_catalog(file, target).await? {
                CatalogOutcome::Translated(count) => {
                    stats.entries_translated += count;
                    stats.catalogs_processed += 1;
                }
                CatalogOutcome::Skipped(reason) => {
                    debug!("Skipping {:?}: {:?}", file, reason);
                    stats.catalogs_skipped += 1;
                }
            }

            progress(index + 1, files.len());
        }

        Ok(stats)
    }

    /// Translate a single catalog file in place.
    ///
    /// The catalog is only written back when at least one entry changed;
    /// skips leave the file untouched.
    pub async fn translate_catalog(
        &self,
        path: &Path,
        target: &str,
    ) -> Result<CatalogOutcome, AppError> {
        let mut catalog = po_file::parse(path).map_err(|e| CatalogError::ParseFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        // Explicit metadata match is required: an undeclared language means
        // "do not translate", not "translate anyway".
        let declared = match declared_language(&catalog) {
            Some(declared) => declared,
            None => return Ok(CatalogOutcome::Skipped(SkipReason::NoLanguage)),
        };
        if !language_utils::language_codes_match(&declared, target) {
            return Ok(CatalogOutcome::Skipped(SkipReason::LanguageMismatch));
        }

        let msgids = self.select_msgids(&catalog);
        if msgids.is_empty() {
            return Ok(CatalogOutcome::Skipped(SkipReason::NothingToTranslate));
        }

        let translations = self
            .service
            .translate_sentences(&msgids, &self.source_language, target)
            .await?;

        if translations.len() < msgids.len() {
            warn!(
                "Engine answered short for {:?}: {} of {} msgids translated, \
                 the rest stay untranslated",
                path,
                translations.len(),
                msgids.len()
            );
        }

        // Position-aligned mapping; zip stops at the shorter side, which is
        // exactly the degraded-but-consistent outcome wanted here.
        let mapping: HashMap<&str, &str> = msgids
            .iter()
            .map(|s| s.as_str())
            .zip(translations.iter().map(|s| s.as_str()))
            .collect();

        let updated = self.apply_mapping(&mut catalog, &mapping)?;
        if updated == 0 {
            return Ok(CatalogOutcome::Skipped(SkipReason::NothingToTranslate));
        }

        po_file::write_to_file(&catalog, path).map_err(|e| CatalogError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(CatalogOutcome::Translated(updated))
    }

    /// Collect the unique msgids selected for translation, in catalog order
    fn select_msgids(&self, catalog: &Catalog) -> Vec<String> {
        let mut msgids = Vec::new();
        let mut seen = HashSet::new();

        for message in catalog.messages() {
            if !message.is_singular() || message.msgid().is_empty() {
                continue;
            }
            if !self.force && message.is_translated() {
                continue;
            }
            if seen.insert(message.msgid().to_string()) {
                msgids.push(message.msgid().to_string());
            }
        }

        msgids
    }

    /// Write translations into matching entries; msgids are never mutated
    fn apply_mapping(
        &self,
        catalog: &mut Catalog,
        mapping: &HashMap<&str, &str>,
    ) -> Result<usize> {
        let mut updated = 0;

        for mut message in catalog.messages_mut() {
            if !message.is_singular() || message.msgid().is_empty() {
                continue;
            }
            if !self.force && message.is_translated() {
                continue;
            }

            let translation = match mapping.get(message.msgid()) {
                Some(translation) => translation.to_string(),
                None => continue,
            };

            message
                .set_msgstr(translation)
                .map_err(|e| anyhow::anyhow!("Cannot set msgstr: {}", e))?;
            updated += 1;
        }

        Ok(updated)
    }
}

/// Read a catalog's declared language from its metadata.
///
/// The `Language` header is authoritative; when absent, the human-readable
/// `Language-Team` header ("French <traduc@traduc.org>") is parsed as a
/// fallback. Returns None when neither yields anything usable.
pub fn declared_language(catalog: &Catalog) -> Option<String> {
    let language = catalog.metadata.language.trim();
    if !language.is_empty() {
        return Some(language.to_string());
    }

    let team = catalog.metadata.language_team.trim();
    if team.is_empty() {
        return None;
    }

    LANGUAGE_TEAM_REGEX
        .captures(team)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
        .filter(|name| !name.is_empty())
}

/// Find catalog files for a target language under a directory tree.
///
/// A catalog belongs to the target when one of its path components is
/// literally the target's short code, the usual `locale/<code>/` and
/// `<code>/` conventions both included.
pub fn catalog_files_for_target<P: AsRef<Path>>(
    root: P,
    target: &str,
) -> Result<Vec<PathBuf>, AppError> {
    let short = language_utils::short_code(target)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let mut files: Vec<PathBuf> = all_catalog_files(root.as_ref())?
        .into_iter()
        .filter(|path| {
            path.components()
                .any(|component| component.as_os_str().to_string_lossy() == short)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Enumerate every catalog file under a directory tree
fn all_catalog_files(root: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(root).follow_links(true) {
        let entry = entry
            .context("Failed to read directory entry")
            .map_err(|e| AppError::File(e.to_string()))?;
        let path = entry.path();

        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("po"))
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Discover the distinct target languages declared across a catalog tree,
/// excluding the source language. Codes come back normalized to the short
/// form, sorted for stable processing order.
pub fn discover_target_languages<P: AsRef<Path>>(
    root: P,
    source_language: &str,
) -> Result<Vec<String>, AppError> {
    let mut targets = BTreeSet::new();

    for file in all_catalog_files(root.as_ref())? {
        let catalog = match po_file::parse(&file) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Ignoring unparseable catalog {:?}: {}", file, e);
                continue;
            }
        };

        let Some(declared) = declared_language(&catalog) else {
            continue;
        };
        if language_utils::language_codes_match(&declared, source_language) {
            continue;
        }
        match language_utils::short_code(&declared) {
            Ok(short) => {
                targets.insert(short);
            }
            Err(_) => {
                debug!("Cannot resolve declared language '{}' in {:?}", declared, file);
            }
        }
    }

    Ok(targets.into_iter().collect())
}

/// Human-readable label for a language identifier, for diagnostics only
fn language_label(identifier: &str) -> String {
    match language_utils::get_language_name(identifier) {
        Ok(name) => format!("{} ({})", name, identifier),
        Err(_) => identifier.to_string(),
    }
}
