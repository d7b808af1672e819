// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use ytnote::app_config::{self, Config, OutputFormat};
use ytnote::app_controller::{Controller, FileOutcome};
use ytnote::file_utils::FileManager;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean caption files into readable transcripts (default command)
    Clean(CleanArgs),

    /// Generate shell completions for ytnote
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct CleanArgs {
    /// Caption file (.vtt, .srt, .txt) or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: CleanOptions,
}

#[derive(Parser, Debug, Clone)]
struct CleanOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Directory for cleaned transcripts (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Language code of the captions (e.g. 'en', 'zh', 'ja-JP'); skips script detection
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Print the cleaned transcript instead of writing a file (single file only)
    #[arg(long)]
    stdout: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// ytnote - YouTube captions to clean notes
///
/// Turns raw caption tracks (WebVTT, SubRip or copied transcripts) into
/// deduplicated, chunked text ready to paste into a note-taking page.
#[derive(Parser, Debug)]
#[command(name = "ytnote")]
#[command(version)]
#[command(about = "Clean YouTube caption tracks into readable, chunked transcripts")]
#[command(long_about = "ytnote strips caption markup, removes rolling-caption repetition and reflows
the text into lines and chunks sized for the transcript's script.

EXAMPLES:
    ytnote talk.en.vtt                         # Writes talk.en_clean.txt next to the input
    ytnote -f talk.srt                         # Force overwrite existing output
    ytnote -L zh lecture.vtt                   # Skip detection, use CJK formatting
    ytnote --format json talk.vtt              # Write document, profile and policy as JSON
    ytnote --stdout talk.vtt                   # Print instead of writing
    ytnote --log-level debug ~/captions/       # Clean every caption file in a directory
    ytnote completions bash > ytnote.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

LANGUAGE:
    The language comes from --language, then a <stem>.json / <stem>.info.json
    metadata file, then a tag in the file name (talk.zh-Hans.vtt), then the
    config default. Without any, the script is detected from the text.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Caption file (.vtt, .srt, .txt) or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: CleanOptions,
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
        // The logger itself passes everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "\x1B[1;31m"),
            Level::Warn => ("🚧 ", "\x1B[1;33m"),
            Level::Info => (" ", "\x1B[1;32m"),
            Level::Debug => ("🔍 ", "\x1B[1;36m"),
            Level::Trace => ("📋 ", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

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
    // Info until the config has been read
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "ytnote", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Clean(args)) => run_clean(args).await,
        None => {
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            run_clean(CleanArgs {
                input_path,
                options: cli.options,
            })
            .await
        }
    }
}

async fn run_clean(args: CleanArgs) -> Result<()> {
    let options = &args.options;

    // Apply the command line level right away so config loading is logged at it
    if let Some(level) = options.log_level {
        log::set_max_level(app_config::LogLevel::from(level).into());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(level) = options.log_level {
        config.log_level = level.into();
    }
    if let Some(format) = options.format {
        config.output.format = format.into();
    }
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    let controller = Controller::with_config(config)?.with_language_override(options.language.clone());

    if options.stdout {
        if !FileManager::file_exists(&args.input_path) {
            return Err(anyhow!("--stdout needs a single input file: {:?}", args.input_path));
        }
        match controller.clean_file(&args.input_path)? {
            Some(rendered) => print!("{}", rendered),
            None => warn!("Nothing to print for {:?}", args.input_path),
        }
        return Ok(());
    }

    if FileManager::file_exists(&args.input_path) {
        let outcome = controller
            .run(args.input_path.clone(), options.output_dir.clone(), options.force_overwrite)
            .await?;
        if outcome == FileOutcome::Empty {
            info!("No transcript content found in {:?}, nothing written", args.input_path);
        }
    } else if FileManager::dir_exists(&args.input_path) {
        let summary = controller
            .run_folder(args.input_path.clone(), options.output_dir.clone(), options.force_overwrite)
            .await?;
        if summary.failed > 0 {
            return Err(anyhow!(
                "{} of {} files failed, see {:?}",
                summary.failed,
                summary.total(),
                args.input_path.join(ytnote::app_controller::ISSUES_LOG_FILE)
            ));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    }

    Ok(())
}
