use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::app_config::Config;
use crate::catalog::{CatalogRunStats, CatalogTranslator};
use crate::checkpoint::Checkpoint;
use crate::corpus::Corpus;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::translation::recovery::finalize_run;
use crate::translation::scheduler::{CancelFlag, EpochReport, EpochScheduler};
use crate::translation::core::TranslationService;

// @module: Application controller for translation runs

/// Main application controller wiring the pipeline together
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Engine facade shared by all modes
    service: TranslationService,
    // @field: Cancellation flag set by the signal handler
    cancel: CancelFlag,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(&config.engine);
        Ok(Self {
            config,
            service,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create a controller over an explicit service, used by tests
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            service,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Install a ctrl-c handler that requests cooperative cancellation.
    ///
    /// The flag is only read at epoch and catalog boundaries, so a running
    /// engine call always finishes before the run winds down consistently.
    pub fn install_signal_handler(&self) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, finishing the current unit before stopping");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    /// Flag handle for tests driving cancellation directly
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run the batch text pipeline: load, resume, schedule, recover or write.
    ///
    /// `force` retranslates the whole corpus regardless of any checkpoint.
    pub async fn run_text(
        &self,
        source_dir: &Path,
        output_path: &Path,
        force: bool,
    ) -> Result<(), AppError> {
        let start_time = std::time::Instant::now();
        let source_lang = &self.config.source_language;
        let target_lang = &self.config.target_language;

        let checkpoint = Checkpoint::for_output(output_path, source_lang, target_lang);

        let corpus = Corpus::load(
            source_dir,
            &self.config.suffix,
            output_path,
            checkpoint.dir(),
        )?;
        info!(
            "Corpus: {} unique sentences from {} files",
            corpus.len(),
            corpus.file_count()
        );

        // Resume bookkeeping; force mode treats the whole corpus as pending
        let resume = if force {
            Default::default()
        } else {
            checkpoint.load()
        };
        let prior_len = resume.len();
        let pending = resume.pending(&corpus)?;

        if pending.is_empty() {
            info!("Nothing to translate, corpus is already complete");
            return Ok(());
        }
        info!(
            "{} sentences outstanding ({} already translated)",
            pending.len(),
            prior_len
        );

        let progress_bar = Self::epoch_progress_bar(pending.len() as u64);
        let bar = progress_bar.clone();
        let scheduler = EpochScheduler::new(&self.service, &checkpoint, self.cancel.clone());
        let outcome = scheduler
            .run(
                pending.clone(),
                (resume.translated_source, resume.translation_output),
                self.config.epochs,
                source_lang,
                target_lang,
                move |report: &EpochReport| {
                    bar.inc(report.epoch_sentences as u64);
                    bar.set_message(format!(
                        "{:.1}/s (epoch {:.1}/s), ETA {}",
                        report.cumulative_rate,
                        report.epoch_rate,
                        Self::format_duration(std::time::Duration::from_secs_f64(
                            report.eta_seconds
                        ))
                    ));
                    info!(
                        "Epoch {}/{}: {} sentences at {:.1}/s, {:.1}/s overall, {} remaining",
                        report.epoch,
                        report.epoch_count,
                        report.epoch_sentences,
                        report.epoch_rate,
                        report.cumulative_rate,
                        report.remaining
                    );
                },
            )
            .await;
        progress_bar.finish_and_clear();

        let (processed, results) = finalize_run(outcome, &checkpoint)?;

        // Final integrity check before declaring success
        if processed.len() != corpus.len() || results.len() != corpus.len() {
            return Err(AppError::Consistency(format!(
                "Final counts disagree: corpus {}, processed {}, results {}",
                corpus.len(),
                processed.len(),
                results.len()
            )));
        }
        debug_assert_eq!(corpus.len(), prior_len + pending.len());

        self.write_output(output_path, &results, prior_len)?;

        info!(
            "Translated {} sentences in {}",
            pending.len(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(())
    }

    /// Write translations to the output file.
    ///
    /// A fresh path gets the full aligned output. An existing file is
    /// appended with only this run's translations, announced loudly, so
    /// prior content is never clobbered or duplicated.
    fn write_output(
        &self,
        output_path: &Path,
        results: &[String],
        prior_len: usize,
    ) -> Result<(), AppError> {
        if FileManager::file_exists(output_path) {
            warn!(
                "{} exists already; translated sentences will be added at the end of the file",
                output_path.display()
            );
            FileManager::append_lines(output_path, &results[prior_len..])?;
        } else {
            FileManager::write_lines(output_path, results)?;
        }

        info!("Output written to {}", output_path.display());
        Ok(())
    }

    /// Translate catalogs under a directory tree.
    ///
    /// With an explicit target, only catalogs declaring that language are
    /// touched; otherwise every language discovered in the tree (minus the
    /// source) is processed in turn.
    pub async fn run_catalogs(
        &self,
        root: &Path,
        target: Option<&str>,
        force: bool,
    ) -> Result<CatalogRunStats, AppError> {
        let translator = CatalogTranslator::new(
            &self.service,
            &self.config.source_language,
            force,
            self.cancel.clone(),
        );

        let progress_bar = Self::catalog_progress_bar();
        let bar = progress_bar.clone();
        let stats = translator
            .run(root, target, move |done, total| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();
        let stats = stats?;

        info!(
            "Catalog run complete: {} entries translated across {} language{}, \
             {} catalogs processed, {} skipped",
            stats.entries_translated(),
            stats.languages.len(),
            if stats.languages.len() == 1 { "" } else { "s" },
            stats.catalogs_processed(),
            stats.catalogs_skipped()
        );
        Ok(stats)
    }

    /// Translate a handful of sentences directly and return the results
    pub async fn run_sentences(&self, sentences: Vec<String>) -> Result<Vec<String>, AppError> {
        let translations = self
            .service
            .translate_sentences(
                &sentences,
                &self.config.source_language,
                &self.config.target_language,
            )
            .await?;
        Ok(translations)
    }

    /// Progress bar for epoch scheduling
    fn epoch_progress_bar(total_sentences: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total_sentences);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sentences ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Progress bar for catalog processing
    fn catalog_progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} catalogs ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
