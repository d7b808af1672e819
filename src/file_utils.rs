use anyhow::{Context, Result};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::language_utils::{self, LanguageCodeType};

// @module: File and directory utilities

/// Extensions picked up when cleaning a whole directory
pub const CAPTION_EXTENSIONS: [&str; 3] = ["vtt", "srt", "txt"];

/// Timing line shared by WebVTT and SubRip
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:\d+:)?\d{1,2}:\d{2}[.,]\d{1,3}\s+-->").expect("Invalid timing line regex")
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a cleaned transcript
    // @params: input_file, output_dir, suffix, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Find caption files under a directory, leaving out earlier cleaned outputs
    pub fn find_caption_files<P: AsRef<Path>>(dir: P, output_suffix: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for extension in CAPTION_EXTENSIONS {
            files.extend(Self::find_files(dir.as_ref(), extension)?);
        }

        files.retain(|path| {
            let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
            output_suffix.is_empty() || !stem.ends_with(output_suffix)
        });
        files.sort();
        files.dedup();

        Ok(files)
    }

    /// Read a file's raw bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect whether a file holds timed captions or a plain transcript
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "vtt" | "srt" => return Ok(FileType::Subtitle),
                "txt" => return Ok(FileType::Transcript),
                _ => {}
            }
        }

        // Fall back to examining file contents
        if let Ok(content) = fs::read_to_string(path) {
            if content.trim_start_matches('\u{FEFF}').starts_with("WEBVTT") || TIMING_LINE_REGEX.is_match(&content) {
                return Ok(FileType::Subtitle);
            }
        }

        Ok(FileType::Unknown)
    }

    /// Language tag embedded in a subtitle file name, as in `talk.zh-Hans.vtt`.
    ///
    /// Only two-letter codes count; three-letter words such as `new` or
    /// `old` are too often part of a title.
    pub fn language_tag_from_filename<P: AsRef<Path>>(path: P) -> Option<String> {
        let stem = path.as_ref().file_stem()?.to_string_lossy().to_string();
        let (_, tag) = stem.rsplit_once('.')?;

        match language_utils::validate_language_code(tag) {
            Ok(LanguageCodeType::Part1) => Some(tag.to_string()),
            _ => None,
        }
    }

    /// Language recorded in download metadata next to a caption file.
    ///
    /// Looks for `<stem>.json`, then `<base>.json` and `<base>.info.json`
    /// where `<base>` is the stem without its language tag.
    pub fn sidecar_language<P: AsRef<Path>>(path: P) -> Option<String> {
        let path = path.as_ref();
        let dir = path.parent().unwrap_or(Path::new(""));
        let stem = path.file_stem()?.to_string_lossy().to_string();

        let mut candidates = vec![dir.join(format!("{}.json", stem))];
        if let Some((base, _)) = stem.rsplit_once('.') {
            candidates.push(dir.join(format!("{}.json", base)));
            candidates.push(dir.join(format!("{}.info.json", base)));
        }
        candidates.push(dir.join(format!("{}.info.json", stem)));

        candidates
            .iter()
            .filter(|candidate| candidate.as_path() != path && candidate.is_file())
            .find_map(|candidate| {
                let content = fs::read_to_string(candidate).ok()?;
                let metadata: serde_json::Value = serde_json::from_str(&content).ok()?;
                metadata
                    .get("language")
                    .and_then(|value| value.as_str())
                    .map(str::trim)
                    .filter(|language| !language.is_empty())
                    .map(str::to_string)
            })
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Timed caption file (WebVTT or SubRip)
    Subtitle,
    /// Plain text transcript
    Transcript,
    /// Unknown file type
    Unknown,
}
