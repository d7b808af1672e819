/*!
 * Caption stream parsing.
 *
 * Turns a raw caption stream into an ordered list of `CaptionCue`s. Three
 * dialects are understood:
 * - **WebVTT**, including YouTube auto-caption files with karaoke spans
 * - **SubRip** (SRT)
 * - **Plain transcripts**, optionally with leading `[MM:SS]` stamps
 *
 * Parsing is forgiving: a malformed cue block is skipped and logged, and the
 * parser moves on to the next block. Only a stream with no usable cue at all
 * is reported, as `NoContent`.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::cue::{CaptionCue, parse_timestamp};
use super::markup::clean_cue_text;
use crate::errors::PipelineError;

/// Cue timing line: `start --> [end] [settings]`
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\S+)\s*-->\s*(\S*)(.*)$").expect("Invalid timing line regex")
});

/// Leading timestamp of a plain transcript line: `[01:02] text`, `1:02:03 text`, `0:05 - text`
static PLAIN_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[\[(]?((?:\d+:)?\d{1,2}:\d{2}(?:[.,]\d{1,3})?)[\])]?(?:\s+-\s+|\s+|$)(.*)$")
        .expect("Invalid plain timestamp regex")
});

/// Block keywords whose content never holds cue text
const IGNORED_BLOCK_PREFIXES: [&str; 6] = ["WEBVTT", "NOTE", "STYLE", "REGION", "Kind:", "Language:"];

/// Share of control characters above which a stream is treated as binary
const MAX_CONTROL_CHAR_RATIO: f64 = 0.1;

/// Caption dialect detected for an input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionDialect {
    WebVtt,
    SubRip,
    PlainText,
}

impl fmt::Display for CaptionDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WebVtt => "WebVTT",
            Self::SubRip => "SubRip",
            Self::PlainText => "plain text",
        };
        write!(f, "{}", name)
    }
}

/// Text cleanup applied to every cue while parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Remove sound descriptions such as [Music] or (applause)
    #[serde(default = "default_true")]
    pub strip_sound_annotations: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strip_sound_annotations: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Result of parsing one caption stream
#[derive(Debug, Clone)]
pub struct ParsedCaptions {
    pub dialect: CaptionDialect,
    pub cues: Vec<CaptionCue>,
    /// Cue blocks that were dropped as malformed or empty
    pub skipped_blocks: usize,
}

/// Parser state for the block currently being read
enum Block {
    /// Between blocks, or reading identifier lines
    Idle,
    /// Inside a header, NOTE, STYLE or REGION block
    Ignored,
    /// Inside a cue with valid timing
    Cue {
        start: Duration,
        end: Duration,
        lines: Vec<String>,
        line_number: usize,
    },
    /// Inside a cue whose timing line could not be read
    Broken,
}

/// Parses raw caption streams into timed cues
#[derive(Debug, Clone, Default)]
pub struct CueParser {
    options: ParserOptions,
}

impl CueParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse a caption stream of any supported dialect
    pub fn parse(&self, raw: &str) -> Result<ParsedCaptions, PipelineError> {
        let content = raw.strip_prefix('\u{FEFF}').unwrap_or(raw);
        check_textual(content)?;

        if content.trim().is_empty() {
            return Err(PipelineError::NoContent("caption stream is empty".to_string()));
        }

        let content = content.replace("\r\n", "\n").replace('\r', "\n");
        let dialect = Self::detect_dialect(&content);
        debug!("Detected {} caption stream", dialect);

        let (mut cues, skipped_blocks) = match dialect {
            CaptionDialect::WebVtt | CaptionDialect::SubRip => self.parse_timed(&content),
            CaptionDialect::PlainText => self.parse_plain(&content),
        };

        if cues.is_empty() {
            return Err(PipelineError::NoContent(format!(
                "no usable cues in {} stream ({} block(s) skipped)",
                dialect, skipped_blocks
            )));
        }

        // Stable sort keeps source order for cues sharing a start time
        cues.sort_by_key(|cue| cue.start_time);

        if skipped_blocks > 0 {
            warn!("Skipped {} malformed or empty cue block(s)", skipped_blocks);
        }
        debug!("Parsed {} cue(s) from {} stream", cues.len(), dialect);

        Ok(ParsedCaptions {
            dialect,
            cues,
            skipped_blocks,
        })
    }

    /// Guess the dialect of a caption stream from its header and timing lines
    pub fn detect_dialect(content: &str) -> CaptionDialect {
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
        let first_line = content.lines().map(str::trim).find(|line| !line.is_empty());
        if first_line.is_some_and(|line| line.starts_with("WEBVTT")) {
            return CaptionDialect::WebVtt;
        }

        let timing_start = content
            .lines()
            .filter_map(|line| TIMING_LINE_REGEX.captures(line))
            .map(|caps| caps[1].to_string())
            .find(|start| parse_timestamp(start).is_ok());

        match timing_start {
            Some(start) if start.contains(',') => CaptionDialect::SubRip,
            Some(_) => CaptionDialect::WebVtt,
            None => CaptionDialect::PlainText,
        }
    }

    /// Parse WebVTT or SubRip content block by block
    fn parse_timed(&self, content: &str) -> (Vec<CaptionCue>, usize) {
        let mut cues = Vec::new();
        let mut skipped = 0;
        let mut block = Block::Idle;
        let mut orphan_lines = 0;

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                // YouTube puts a single space right after the timing line
                if !line.is_empty() && matches!(&block, Block::Cue { lines, .. } if lines.is_empty()) {
                    continue;
                }
                self.finish_block(std::mem::replace(&mut block, Block::Idle), &mut cues, &mut skipped);
                if orphan_lines > 0 {
                    debug!("Skipping text without timing before line {}", line_number);
                    skipped += 1;
                    orphan_lines = 0;
                }
                continue;
            }

            if let Some(caps) = TIMING_LINE_REGEX.captures(trimmed) {
                // A cue that runs straight into the next one may have swallowed its SRT index
                if let Block::Cue { lines, .. } = &mut block {
                    if lines.len() > 1 && lines.last().is_some_and(|l| l.bytes().all(|b| b.is_ascii_digit())) {
                        lines.pop();
                    }
                }
                self.finish_block(std::mem::replace(&mut block, Block::Idle), &mut cues, &mut skipped);
                orphan_lines = 0;

                block = match parse_timing(&caps[1], &caps[2]) {
                    Ok((start, end)) => Block::Cue {
                        start,
                        end,
                        lines: Vec::new(),
                        line_number,
                    },
                    Err(e) => {
                        warn!("Skipping cue with malformed timing at line {}: {}", line_number, e);
                        Block::Broken
                    }
                };
                continue;
            }

            match &mut block {
                Block::Cue { lines, .. } => lines.push(trimmed.to_string()),
                Block::Ignored | Block::Broken => {}
                Block::Idle => {
                    if IGNORED_BLOCK_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
                        block = Block::Ignored;
                    } else {
                        // Cue identifiers precede the timing line; anything else is stray text
                        orphan_lines += 1;
                    }
                }
            }
        }

        self.finish_block(block, &mut cues, &mut skipped);
        if orphan_lines > 0 {
            skipped += 1;
        }

        (cues, skipped)
    }

    fn finish_block(&self, block: Block, cues: &mut Vec<CaptionCue>, skipped: &mut usize) {
        match block {
            Block::Idle | Block::Ignored => {}
            Block::Broken => *skipped += 1,
            Block::Cue {
                start,
                end,
                lines,
                line_number,
            } => {
                let text = clean_cue_text(&lines.join("\n"), self.options.strip_sound_annotations);
                match CaptionCue::new_validated(start, end, &text) {
                    Ok(cue) => cues.push(cue),
                    Err(e) => {
                        debug!("Skipping cue at line {}: {}", line_number, e);
                        *skipped += 1;
                    }
                }
            }
        }
    }

    /// Parse a plain transcript, one cue per non-empty line
    fn parse_plain(&self, content: &str) -> (Vec<CaptionCue>, usize) {
        let mut cues = Vec::new();
        let mut skipped = 0;
        let mut current_start = Duration::ZERO;

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut text = trimmed;
            if let Some(caps) = PLAIN_TIMESTAMP_REGEX.captures(trimmed) {
                // A stamp that does not parse as a time is ordinary text
                if let Ok(start) = parse_timestamp(&caps[1]) {
                    current_start = start;
                    text = caps.get(2).map_or("", |m| m.as_str());
                }
            }

            if text.trim().is_empty() {
                continue;
            }

            let cleaned = clean_cue_text(text, self.options.strip_sound_annotations);
            match CaptionCue::new_validated(current_start, current_start, &cleaned) {
                Ok(cue) => cues.push(cue),
                Err(e) => {
                    debug!("Skipping transcript line {}: {}", index + 1, e);
                    skipped += 1;
                }
            }
        }

        (cues, skipped)
    }
}

/// Parse the start and optional end of a timing line; a missing end equals the start
fn parse_timing(start: &str, end: &str) -> anyhow::Result<(Duration, Duration)> {
    let start = parse_timestamp(start)?;
    let end = if end.is_empty() { start } else { parse_timestamp(end)? };
    Ok((start, end))
}

/// Reject streams that are binary data rather than text
fn check_textual(content: &str) -> Result<(), PipelineError> {
    if content.contains('\0') {
        return Err(PipelineError::ParseError(
            "input contains NUL bytes and is not a text caption stream".to_string(),
        ));
    }

    let total = content.chars().count();
    if total == 0 {
        return Ok(());
    }
    let control = content
        .chars()
        .filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\u{000C}'))
        .count();
    let ratio = control as f64 / total as f64;
    if ratio > MAX_CONTROL_CHAR_RATIO {
        return Err(PipelineError::ParseError(format!(
            "input is {:.0}% control characters and is not a text caption stream",
            ratio * 100.0
        )));
    }

    Ok(())
}

/// Decode raw caption bytes, honouring UTF-8 and UTF-16 byte order marks
pub fn decode_caption_bytes(bytes: &[u8]) -> Result<String, PipelineError> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return decode_utf8(rest);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    decode_utf8(bytes)
}

fn decode_utf8(bytes: &[u8]) -> Result<String, PipelineError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| PipelineError::ParseError(format!("input is not valid UTF-8: {}", e)))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String, PipelineError> {
    if bytes.len() % 2 != 0 {
        return Err(PipelineError::ParseError(
            "UTF-16 input has an odd number of bytes".to_string(),
        ));
    }

    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| PipelineError::ParseError(format!("input is not valid UTF-16: {}", e)))
}
