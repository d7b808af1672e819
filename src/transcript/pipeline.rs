/*!
 * Pipeline driver for transcript normalization.
 *
 * The driver sequences the four stages and tracks where a run is:
 * 1. Parsing: raw caption stream to ordered cues
 * 2. Collapsing: cues to deduplicated text segments
 * 3. Classifying: script profile from a language hint or detection
 * 4. Reflowing: segments to a chunked document
 *
 * A stream without usable cues stops the run at parsing with `NoContent`.
 * The driver does no I/O and may be re-run; every run starts from `Idle`.
 */

use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::time::Instant;

use super::collapser::{CollapseConfig, RepetitionCollapser, TextSegment};
use super::cue_parser::{CaptionDialect, CueParser, ParserOptions, decode_caption_bytes};
use super::document::Document;
use super::reflow::ReflowFormatter;
use super::script::{FormattingPolicy, PolicyTable, ProfileSource, ScriptClassifier, ScriptProfile};
use crate::errors::PipelineError;

/// Where a pipeline run currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Parsing,
    Collapsing,
    Classifying,
    Reflowing,
    Done,
    Failed(PipelineError),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// Whether the driver may move from this state to `next`
    pub fn can_transition_to(&self, next: &PipelineState) -> bool {
        use PipelineState::*;

        match (self, next) {
            (Idle, Parsing)
            | (Parsing, Collapsing)
            | (Collapsing, Classifying)
            | (Classifying, Reflowing)
            | (Reflowing, Done) => true,
            (Parsing, Failed(PipelineError::NoContent(_) | PipelineError::ParseError(_))) => true,
            (Reflowing, Failed(PipelineError::FormatError(_))) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Parsing => write!(f, "parsing"),
            Self::Collapsing => write!(f, "collapsing"),
            Self::Classifying => write!(f, "classifying"),
            Self::Reflowing => write!(f, "reflowing"),
            Self::Done => write!(f, "done"),
            Self::Failed(error) => write!(f, "failed ({})", error.kind()),
        }
    }
}

/// Configuration for the normalization pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Cue text cleanup
    pub parser_options: ParserOptions,

    /// Repetition collapsing thresholds
    pub collapse_config: CollapseConfig,

    /// Latin and CJK formatting policies
    pub policies: PolicyTable,
}

impl PipelineConfig {
    pub fn with_parser_options(mut self, options: ParserOptions) -> Self {
        self.parser_options = options;
        self
    }

    pub fn with_collapse_config(mut self, config: CollapseConfig) -> Self {
        self.collapse_config = config;
        self
    }

    pub fn with_latin_policy(mut self, policy: FormattingPolicy) -> Self {
        self.policies.latin = policy;
        self
    }

    pub fn with_cjk_policy(mut self, policy: FormattingPolicy) -> Self {
        self.policies.cjk = policy;
        self
    }
}

/// Counters collected during one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PipelineStats {
    pub cues_parsed: usize,
    pub blocks_skipped: usize,
    pub segments: usize,
    pub units: usize,
    pub lines: usize,
    pub chunks: usize,
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub document: Document,
    pub profile: ScriptProfile,
    pub policy: FormattingPolicy,
    pub dialect: CaptionDialect,
    pub segments: Vec<TextSegment>,
    pub stats: PipelineStats,
}

impl PipelineOutput {
    /// One-line description of the run
    pub fn summary(&self) -> String {
        format!(
            "{} cues ({} skipped) -> {} segments -> {} {} formatting, {} lines in {} chunks",
            self.stats.cues_parsed,
            self.stats.blocks_skipped,
            self.stats.segments,
            self.profile.script_kind,
            match self.profile.source {
                ProfileSource::Detected => "detected",
                ProfileSource::Hint(_) => "hinted",
            },
            self.stats.lines,
            self.stats.chunks
        )
    }
}

/// The transcript normalization driver.
#[derive(Debug, Clone)]
pub struct TranscriptPipeline {
    config: PipelineConfig,
    parser: CueParser,
    collapser: RepetitionCollapser,
    classifier: ScriptClassifier,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl Default for TranscriptPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl TranscriptPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let parser = CueParser::new(config.parser_options.clone());
        let collapser = RepetitionCollapser::new(config.collapse_config.clone());

        Self {
            config,
            parser,
            collapser,
            classifier: ScriptClassifier::new(),
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// States visited by the latest run, starting with `Idle`
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Normalize a raw caption stream, using `hint` as the language when it is a valid code
    pub fn run(&mut self, raw: &str, hint: Option<&str>) -> Result<PipelineOutput, PipelineError> {
        self.begin();
        let result = self.execute(raw, hint);
        self.finish(result)
    }

    /// Normalize caption bytes, decoding UTF-8 or BOM-marked UTF-16 first
    pub fn run_bytes(&mut self, bytes: &[u8], hint: Option<&str>) -> Result<PipelineOutput, PipelineError> {
        self.begin();
        let result = decode_caption_bytes(bytes).and_then(|text| self.execute(&text, hint));
        self.finish(result)
    }

    fn begin(&mut self) {
        self.state = PipelineState::Idle;
        self.history = vec![PipelineState::Idle];
        self.transition(PipelineState::Parsing);
    }

    fn execute(&mut self, raw: &str, hint: Option<&str>) -> Result<PipelineOutput, PipelineError> {
        let start_time = Instant::now();

        let parsed = self.parser.parse(raw)?;

        self.transition(PipelineState::Collapsing);
        let segments = self.collapser.collapse(&parsed.cues);

        self.transition(PipelineState::Classifying);
        let profile = self.classifier.profile(&segments, hint);
        let policy = self.config.policies.select(&profile);

        self.transition(PipelineState::Reflowing);
        let document = ReflowFormatter::new(policy)?.format(&segments);

        let stats = PipelineStats {
            cues_parsed: parsed.cues.len(),
            blocks_skipped: parsed.skipped_blocks,
            segments: segments.len(),
            units: document.unit_count(),
            lines: document.line_count(),
            chunks: document.chunk_count(),
        };

        let output = PipelineOutput {
            document,
            profile,
            policy,
            dialect: parsed.dialect,
            segments,
            stats,
        };
        info!("{} in {:.2?}", output.summary(), start_time.elapsed());

        Ok(output)
    }

    fn finish(&mut self, result: Result<PipelineOutput, PipelineError>) -> Result<PipelineOutput, PipelineError> {
        match &result {
            Ok(_) => self.transition(PipelineState::Done),
            Err(error) => self.transition(PipelineState::Failed(error.clone())),
        }
        result
    }

    fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "illegal pipeline transition {} -> {}",
            self.state,
            next
        );
        debug!("Pipeline {} -> {}", self.state, next);
        self.state = next.clone();
        self.history.push(next);
    }
}

/// Run the default pipeline once over a raw caption stream
pub fn normalize_transcript(raw: &str, hint: Option<&str>) -> Result<PipelineOutput, PipelineError> {
    TranscriptPipeline::default().run(raw, hint)
}
