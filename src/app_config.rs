use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::transcript::{CollapseConfig, FormattingPolicy, ParserOptions, PipelineConfig, UnitKind};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Default language hint (ISO 639), used when a file carries none
    #[serde(default)]
    pub language: Option<String>,

    /// Cue text cleanup
    #[serde(default)]
    pub cleaning: ParserOptions,

    /// Repetition collapsing thresholds
    #[serde(default)]
    pub collapse: CollapseConfig,

    /// Line and chunk limits per script family
    #[serde(default)]
    pub formatting: FormattingConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Reflow limits for both script families
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FormattingConfig {
    // @field: Words per line for space-separated scripts
    #[serde(default = "default_latin_line_limit")]
    pub latin_line_limit: usize,

    // @field: Words per chunk for space-separated scripts
    #[serde(default = "default_latin_chunk_limit")]
    pub latin_chunk_limit: usize,

    // @field: Characters per line for CJK
    #[serde(default = "default_cjk_line_limit")]
    pub cjk_line_limit: usize,

    // @field: Characters per chunk for CJK
    #[serde(default = "default_cjk_chunk_limit")]
    pub cjk_chunk_limit: usize,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            latin_line_limit: default_latin_line_limit(),
            latin_chunk_limit: default_latin_chunk_limit(),
            cjk_line_limit: default_cjk_line_limit(),
            cjk_chunk_limit: default_cjk_chunk_limit(),
        }
    }
}

impl FormattingConfig {
    pub fn latin_policy(&self) -> FormattingPolicy {
        FormattingPolicy {
            unit_kind: UnitKind::Word,
            line_limit: self.latin_line_limit,
            chunk_limit: self.latin_chunk_limit,
        }
    }

    pub fn cjk_policy(&self) -> FormattingPolicy {
        FormattingPolicy {
            unit_kind: UnitKind::Character,
            line_limit: self.cjk_line_limit,
            chunk_limit: self.cjk_chunk_limit,
        }
    }
}

/// Rendering of the cleaned transcript
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Chunks of lines separated by blank lines
    #[default]
    Text,
    /// Document, profile and policy as JSON
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    // @field: Appended to the input stem, e.g. talk_clean.txt
    #[serde(default = "default_output_suffix")]
    pub suffix: String,

    // @field: Output rendering
    #[serde(default)]
    pub format: OutputFormat,

    // @field: Files processed at once in folder mode
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
            format: OutputFormat::default(),
            concurrent_files: default_concurrent_files(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_latin_line_limit() -> usize {
    15
}

fn default_latin_chunk_limit() -> usize {
    100
}

fn default_cjk_line_limit() -> usize {
    50
}

fn default_cjk_chunk_limit() -> usize {
    500
}

fn default_output_suffix() -> String {
    "_clean".to_string()
}

fn default_concurrent_files() -> usize {
    4
}

impl Config {
    /// Load configuration from a JSON file, writing the defaults there when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path.as_ref(), config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(language) = &self.language {
            crate::language_utils::validate_language_code(language)
                .with_context(|| format!("Invalid default language: {}", language))?;
        }

        let limits = [
            ("formatting.latin_line_limit", self.formatting.latin_line_limit),
            ("formatting.latin_chunk_limit", self.formatting.latin_chunk_limit),
            ("formatting.cjk_line_limit", self.formatting.cjk_line_limit),
            ("formatting.cjk_chunk_limit", self.formatting.cjk_chunk_limit),
            ("output.concurrent_files", self.output.concurrent_files),
            ("collapse.max_phrase_tokens", self.collapse.max_phrase_tokens),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(anyhow!("{} must be at least 1", name));
        }

        if self.output.suffix.contains(|c| c == '/' || c == '\\') {
            return Err(anyhow!("output.suffix must not contain path separators"));
        }

        Ok(())
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_parser_options(self.cleaning.clone())
            .with_collapse_config(self.collapse.clone())
            .with_latin_policy(self.formatting.latin_policy())
            .with_cjk_policy(self.formatting.cjk_policy())
    }
}
