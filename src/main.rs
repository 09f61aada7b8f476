// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::app_config::{Config, LogLevel, default_target_language};
use crate::app_controller::Controller;
use crate::language_utils::validate_language_code;

mod app_config;
mod app_controller;
mod catalog;
mod checkpoint;
mod corpus;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Batch-translate all text files under a directory (default command)
    Translate(TranslateArgs),

    /// Incrementally translate gettext catalogs under a directory tree
    Po(PoArgs),

    /// Translate one or more sentences given on the command line
    Sentence(SentenceArgs),

    /// Generate shell completions for transcorpus
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Source directory holding the corpus files
    #[arg(value_name = "SOURCE_DIR")]
    source_dir: PathBuf,

    /// Path of the output file the translations are written to
    #[arg(short = 'S', long)]
    save: PathBuf,

    /// Source language identifier (e.g. 'en', 'eng', 'eng_Latn')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language identifier (defaults to the system locale)
    #[arg(short, long)]
    target_language: Option<String>,

    /// Number of epochs to split the outstanding work into
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Suffix filter for input files
    #[arg(long)]
    suffix: Option<String>,

    /// Retranslate everything, ignoring any checkpoint
    #[arg(short, long)]
    force: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "transcorpus.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct PoArgs {
    /// Root of the catalog tree (e.g. a locale/ directory)
    #[arg(value_name = "CATALOG_ROOT")]
    root: PathBuf,

    /// Target language; when omitted every language declared in the tree
    /// (except the source) is processed
    #[arg(short, long)]
    target_language: Option<String>,

    /// Source language identifier
    #[arg(short, long)]
    source_language: Option<String>,

    /// Retranslate entries that already have a translation
    #[arg(short, long)]
    force: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "transcorpus.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct SentenceArgs {
    /// Sentences to translate
    #[arg(value_name = "SENTENCE", required = true)]
    sentences: Vec<String>,

    /// Source language identifier
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language identifier (defaults to the system locale)
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "transcorpus.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// transcorpus - resumable batch corpus translation
///
/// Batch-translates text corpora and gettext catalogs through an external
/// translation engine, with crash-safe checkpoints so interrupted runs
/// resume where they left off.
#[derive(Parser, Debug)]
#[command(name = "transcorpus")]
#[command(version = "1.0.0")]
#[command(about = "Resumable batch translation for corpora and gettext catalogs")]
#[command(long_about = "transcorpus batch-translates text corpora and gettext catalogs through
an external translation engine, surviving interruption without redoing work.

EXAMPLES:
    transcorpus translate ./corpus -S out.txt -s eng -t fra   # Batch-translate a directory
    transcorpus translate ./corpus -S out.txt -e 10           # Split the run into 10 epochs
    transcorpus translate ./corpus -S out.txt --force         # Ignore the checkpoint
    transcorpus po ./locale -t fr                             # Fill untranslated French entries
    transcorpus po ./locale                                   # Every declared language in the tree
    transcorpus po ./locale -t fr --force                     # Overwrite existing translations
    transcorpus sentence \"Hello world\" -s eng -t fra          # One-off translation
    transcorpus completions bash > transcorpus.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in transcorpus.json by default. You can specify a
    different config file with --config-path. If the config file doesn't exist,
    a default one will be created automatically.

CHECKPOINTS:
    Progress is checkpointed next to the output file (<output>.cache/) after
    every epoch. Interrupted runs pick up from the checkpoint on the next
    invocation; --force starts over.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Load the configuration file, creating a default one when missing, and
/// fold the shared CLI overrides in
fn load_config(
    config_path: &str,
    source_language: Option<&str>,
    target_language: Option<&str>,
    log_level: Option<&CliLogLevel>,
) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(source) = source_language {
        config.source_language = source.to_string();
    }
    if let Some(target) = target_language {
        config.target_language = target.to_string();
    } else if config.target_language.is_empty() {
        config.target_language = default_target_language();
    }
    if let Some(level) = log_level {
        config.log_level = level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    // Unknown identifiers are a warning, not an error: the engine may
    // understand identifiers this tool cannot resolve.
    for lang in [&config.source_language, &config.target_language] {
        if validate_language_code(lang).is_err() {
            warn!(
                "Warning! '{}' is not a recognized language identifier. \
                 There is a high probability translation operations will fail.",
                lang
            );
        }
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger once with info level by default;
    // the level is updated after the config is loaded
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
        return ExitCode::FAILURE;
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "transcorpus", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Po(args) => run_po(args).await,
        Commands::Sentence(args) => run_sentence(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(
        &options.config_path,
        options.source_language.as_deref(),
        options.target_language.as_deref(),
        options.log_level.as_ref(),
    )?;

    if let Some(epochs) = options.epochs {
        config.epochs = epochs;
    }
    if let Some(suffix) = &options.suffix {
        config.suffix = suffix.clone();
    }
    config.validate().context("Configuration validation failed")?;

    if !options.source_dir.is_dir() {
        return Err(anyhow!(
            "Source directory does not exist: {:?}",
            options.source_dir
        ));
    }

    let controller = Controller::with_config(config)?;
    controller.install_signal_handler();
    controller
        .run_text(&options.source_dir, &options.save, options.force)
        .await
        .map_err(anyhow::Error::from)
}

async fn run_po(options: PoArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        options.source_language.as_deref(),
        options.target_language.as_deref(),
        options.log_level.as_ref(),
    )?;

    if !options.root.is_dir() {
        return Err(anyhow!("Catalog root does not exist: {:?}", options.root));
    }

    let controller = Controller::with_config(config)?;
    controller.install_signal_handler();
    controller
        .run_catalogs(
            &options.root,
            options.target_language.as_deref(),
            options.force,
        )
        .await
        .map(|_| ())
        .map_err(anyhow::Error::from)
}

async fn run_sentence(options: SentenceArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        options.source_language.as_deref(),
        options.target_language.as_deref(),
        options.log_level.as_ref(),
    )?;

    let controller = Controller::with_config(config)?;
    let translations = controller
        .run_sentences(options.sentences)
        .await
        .map_err(anyhow::Error::from)?;

    for translation in translations {
        println!("{}", translation);
    }
    Ok(())
}
