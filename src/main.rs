// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, SourceLanguageMode, TargetLanguage};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod catalog;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod translation;
mod validation;
mod work_items;

/// CLI Wrapper for TargetLanguage to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTargetLanguage {
    Nb,
    Sv,
    Da,
}

impl From<CliTargetLanguage> for TargetLanguage {
    fn from(cli_target: CliTargetLanguage) -> Self {
        match cli_target {
            CliTargetLanguage::Nb => TargetLanguage::Nb,
            CliTargetLanguage::Sv => TargetLanguage::Sv,
            CliTargetLanguage::Da => TargetLanguage::Da,
        }
    }
}

/// CLI Wrapper for SourceLanguageMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSourceLanguageMode {
    Auto,
    En,
    De,
}

impl From<CliSourceLanguageMode> for SourceLanguageMode {
    fn from(cli_mode: CliSourceLanguageMode) -> Self {
        match cli_mode {
            CliSourceLanguageMode::Auto => SourceLanguageMode::Auto,
            CliSourceLanguageMode::En => SourceLanguageMode::En,
            CliSourceLanguageMode::De => SourceLanguageMode::De,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a PO catalog using an AI model (default command)
    #[command(alias = "tr")]
    Translate(TranslateArgs),

    /// Generate shell completions for poglot
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input PO catalog
    #[arg(value_name = "INPUT_PO")]
    input_file: PathBuf,

    /// Output PO catalog
    #[arg(value_name = "OUTPUT_PO")]
    output_file: PathBuf,

    /// Model name to use for translation
    #[arg(short, long, env = "POGLOT_MODEL")]
    model: Option<String>,

    /// Items per translation request (1-50)
    #[arg(short, long, env = "POGLOT_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Target language
    #[arg(short, long, value_enum, env = "POGLOT_TARGET_LANG")]
    target_lang: Option<CliTargetLanguage>,

    /// Source language policy: detect per entry, or force one language
    #[arg(short, long, value_enum, env = "POGLOT_SOURCE_LANG")]
    source_lang: Option<CliSourceLanguageMode>,

    /// Translate every entry, ignoring language heuristics
    #[arg(short, long)]
    force: bool,

    /// File with free-text domain context to include in the prompt
    #[arg(long, value_name = "FILE")]
    context_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "poglot.json")]
    config_path: String,

    /// API key (overrides config file and OPENAI_API_KEY)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Preview what would be translated without calling the API
    #[arg(short, long)]
    dry_run: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// poglot - PO catalog translation with AI
///
/// Batch-translates gettext PO catalogs to Norwegian Bokmål, Swedish, or
/// Danish using an OpenAI-compatible API.
#[derive(Parser, Debug)]
#[command(name = "poglot")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered PO catalog translation tool")]
#[command(long_about = "poglot batch-translates gettext PO catalogs using an AI model.

Entries are scanned per catalog: English-looking or German-looking text is
queued (configurable), sent to the model in batches, and accepted answers are
written back to msgstr. Failures fall back to per-item calls and are logged
next to the output file.

EXAMPLES:
    poglot messages.po messages.nb.po              # Translate with defaults
    poglot -t sv messages.po messages.sv.po        # Target Swedish
    poglot -m gpt-4o-mini -b 20 in.po out.po       # Model and batch size
    poglot -s de in.po out.po                      # Force German source
    poglot --force in.po out.po                    # Re-translate everything
    poglot --dry-run in.po out.po                  # Preview the worklist
    poglot --context-file notes.txt in.po out.po   # Add domain context
    poglot completions bash > poglot.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in poglot.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically. The API key comes
    from --api-key, the config file, or OPENAI_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input PO catalog
    #[arg(value_name = "INPUT_PO")]
    input_file: Option<PathBuf>,

    /// Output PO catalog
    #[arg(value_name = "OUTPUT_PO")]
    output_file: Option<PathBuf>,

    /// Model name to use for translation
    #[arg(short, long, env = "POGLOT_MODEL")]
    model: Option<String>,

    /// Items per translation request (1-50)
    #[arg(short, long, env = "POGLOT_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Target language
    #[arg(short, long, value_enum, env = "POGLOT_TARGET_LANG")]
    target_lang: Option<CliTargetLanguage>,

    /// Source language policy: detect per entry, or force one language
    #[arg(short, long, value_enum, env = "POGLOT_SOURCE_LANG")]
    source_lang: Option<CliSourceLanguageMode>,

    /// Translate every entry, ignoring language heuristics
    #[arg(short, long)]
    force: bool,

    /// File with free-text domain context to include in the prompt
    #[arg(long, value_name = "FILE")]
    context_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "poglot.json")]
    config_path: String,

    /// API key (overrides config file and OPENAI_API_KEY)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Preview what would be translated without calling the API
    #[arg(short, long)]
    dry_run: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());

            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "poglot", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_file = cli
                .input_file
                .ok_or_else(|| anyhow!("INPUT_PO is required when no subcommand is specified"))?;
            let output_file = cli
                .output_file
                .ok_or_else(|| anyhow!("OUTPUT_PO is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_file,
                output_file,
                model: cli.model,
                batch_size: cli.batch_size,
                target_lang: cli.target_lang,
                source_lang: cli.source_lang,
                force: cli.force,
                context_file: cli.context_file,
                config_path: cli.config_path,
                api_key: cli.api_key,
                dry_run: cli.dry_run,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
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

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.provider.model = model.clone();
    }
    if let Some(batch_size) = options.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(target_lang) = &options.target_lang {
        config.target_language = target_lang.clone().into();
    }
    if let Some(source_lang) = &options.source_lang {
        config.source_language = source_lang.clone().into();
    }
    if options.force {
        config.force_all = true;
    }
    if let Some(api_key) = &options.api_key {
        config.provider.api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(context_file) = &options.context_file {
        let context = file_utils::FileManager::read_to_string(context_file)?;
        let context = context.trim();
        if !context.is_empty() {
            config.domain_context = Some(context.to_string());
        }
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    if options.dry_run {
        controller.dry_run(options.input_file).await?;
        return Ok(());
    }

    controller.run(options.input_file, options.output_file).await?;

    Ok(())
}
