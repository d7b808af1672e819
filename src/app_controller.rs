use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, OutputFormat};
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileType};
use crate::transcript::{PipelineOutput, TranscriptPipeline};

// @module: Application controller for caption cleaning

/// Name of the per-folder run log
pub const ISSUES_LOG_FILE: &str = "ytnote.issues.log";

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Cleaned transcript written to this path
    Written(PathBuf),
    /// Output already existed at this path
    Skipped(PathBuf),
    /// The file held no transcript content
    Empty,
}

/// Tally of a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub written: usize,
    pub skipped: usize,
    pub empty: usize,
    pub failed: usize,
    /// File name and reason for every failure
    pub issues: Vec<String>,
}

impl FolderSummary {
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.empty + self.failed
    }

    fn record(&mut self, file_name: &str, result: Result<FileOutcome>) {
        match result {
            Ok(FileOutcome::Written(_)) => self.written += 1,
            Ok(FileOutcome::Skipped(_)) => self.skipped += 1,
            Ok(FileOutcome::Empty) => self.empty += 1,
            Err(e) => {
                error!("Error processing file {}: {:#}", file_name, e);
                self.failed += 1;
                self.issues.push(format!("{}: {:#}", file_name, e));
            }
        }
    }
}

/// JSON rendering of a cleaned transcript
#[derive(Serialize)]
struct JsonReport<'a> {
    source: String,
    text: String,
    #[serde(flatten)]
    output: &'a PipelineOutput,
}

/// Main application controller for caption cleaning
#[derive(Clone)]
pub struct Controller {
    // @field: App configuration
    config: Arc<Config>,

    // @field: Language hint from the command line, ahead of every other source
    language_override: Option<String>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config: Arc::new(config),
            language_override: None,
        })
    }

    pub fn with_language_override(mut self, language: Option<String>) -> Self {
        self.language_override = language.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pick the language hint for a file.
    ///
    /// Order: command line, sidecar metadata, file name tag, config default.
    /// `None` leaves the decision to script detection.
    pub fn resolve_language_hint(&self, input_file: &Path) -> Option<String> {
        if let Some(language) = &self.language_override {
            return Some(language.clone());
        }
        if let Some(language) = FileManager::sidecar_language(input_file) {
            debug!("Using language '{}' from metadata next to {:?}", language, input_file);
            return Some(language);
        }
        if let Some(language) = FileManager::language_tag_from_filename(input_file) {
            debug!("Using language '{}' from file name {:?}", language, input_file);
            return Some(language);
        }
        self.config.language.clone()
    }

    /// Clean one caption file; `None` when the file has no transcript content
    pub fn clean_file(&self, input_file: &Path) -> Result<Option<String>> {
        let bytes = FileManager::read_bytes(input_file)?;
        let hint = self.resolve_language_hint(input_file);
        let mut pipeline = TranscriptPipeline::new(self.config.pipeline_config());

        match pipeline.run_bytes(&bytes, hint.as_deref()) {
            Ok(output) => Ok(Some(self.render(&output, input_file)?)),
            Err(e) if e.is_no_content() => {
                warn!("No transcript content in {:?}: {}", input_file, e.detail());
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(AppError::from(e)))
                .with_context(|| format!("Failed to clean {:?}", input_file)),
        }
    }

    /// Render pipeline output in the configured format
    pub fn render(&self, output: &PipelineOutput, input_file: &Path) -> Result<String> {
        match self.config.output.format {
            OutputFormat::Text => Ok(format!("{}\n", output.document)),
            OutputFormat::Json => {
                let report = JsonReport {
                    source: input_file.display().to_string(),
                    text: output.document.to_string(),
                    output,
                };
                serde_json::to_string_pretty(&report).context("Failed to serialize transcript to JSON")
            }
        }
    }

    /// Clean one file and write `<stem><suffix>.<ext>` into `output_dir`
    pub fn process_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<FileOutcome> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if FileManager::detect_file_type(input_file)? == FileType::Unknown {
            warn!("{:?} does not look like a caption file, reading it as a plain transcript", input_file);
        }

        let output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.output.suffix,
            self.config.output.format.extension(),
        );
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", input_file);
            return Ok(FileOutcome::Skipped(output_path));
        }

        match self.clean_file(input_file)? {
            Some(rendered) => {
                FileManager::write_to_file(&output_path, &rendered)?;
                info!("Success: {:?}", output_path);
                Ok(FileOutcome::Written(output_path))
            }
            None => Ok(FileOutcome::Empty),
        }
    }

    /// Run the workflow for a single caption file
    pub async fn run(&self, input_file: PathBuf, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<FileOutcome> {
        let start_time = Instant::now();
        let output_dir = output_dir.unwrap_or_else(|| Self::default_output_dir(&input_file));
        FileManager::ensure_dir(&output_dir)?;

        let controller = self.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            controller.process_file(&input_file, &output_dir, force_overwrite)
        })
        .await
        .context("Cleaning task panicked")??;

        debug!("Finished in {}", Self::format_duration(start_time.elapsed()));
        Ok(outcome)
    }

    /// Run the workflow in folder mode, processing every caption file under a directory.
    /// Files that already have a cleaned output will be skipped
    pub async fn run_folder(&self, input_dir: PathBuf, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let caption_files = FileManager::find_caption_files(&input_dir, &self.config.output.suffix)?;
        if caption_files.is_empty() {
            return Err(anyhow!("No caption files found in directory: {:?}", input_dir));
        }
        if let Some(dir) = &output_dir {
            FileManager::ensure_dir(dir)?;
        }

        let folder_pb = ProgressBar::new(caption_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));
        folder_pb.set_message("Cleaning captions");

        let concurrency = self.config.output.concurrent_files.max(1);
        let results = stream::iter(caption_files)
            .map(|caption_file| {
                let controller = self.clone();
                let folder_pb = folder_pb.clone();
                let file_output_dir = output_dir
                    .clone()
                    .unwrap_or_else(|| Self::default_output_dir(&caption_file));
                async move {
                    let file_name = caption_file
                        .file_name()
                        .map(|f| f.to_string_lossy().to_string())
                        .unwrap_or_else(|| "unknown".to_string());

                    let result = tokio::task::spawn_blocking(move || {
                        controller.process_file(&caption_file, &file_output_dir, force_overwrite)
                    })
                    .await
                    .context("Cleaning task panicked")
                    .and_then(|result| result);

                    folder_pb.set_message(format!("Done: {}", file_name));
                    folder_pb.inc(1);
                    (file_name, result)
                }
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;

        folder_pb.finish_with_message("Folder processing complete");

        let mut summary = FolderSummary::default();
        for (file_name, result) in results {
            summary.record(&file_name, result);
        }

        let summary_message = format!(
            "Folder processing completed: {} written, {} skipped, {} empty, {} errors - Duration: {}",
            summary.written,
            summary.skipped,
            summary.empty,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );
        info!("{}", summary_message);

        let log_file_path = input_dir.join(ISSUES_LOG_FILE);
        let mut log_content = format!("Folder Processing: {} - {}", input_dir.display(), summary_message);
        for issue in &summary.issues {
            log_content.push_str("\n  ");
            log_content.push_str(issue);
        }
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &log_content) {
            warn!("Failed to write folder logs to file: {}", e);
        } else {
            debug!("Folder processing logs written to {:?}", log_file_path);
        }

        Ok(summary)
    }

    fn default_output_dir(input_file: &Path) -> PathBuf {
        input_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn format_duration(duration: Duration) -> String {
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
