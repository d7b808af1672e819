/*!
 * Transcript normalization.
 *
 * This module turns a raw, noisy caption stream into a clean, chunked
 * document:
 * - `cue_parser`: WebVTT, SubRip and plain transcripts to timed cues
 * - `collapser`: rolling-caption and adjacent-phrase deduplication
 * - `script`: CJK or Latin classification and formatting policies
 * - `reflow`: line and chunk wrapping into a `Document`
 * - `pipeline`: the driver that sequences the stages
 */

pub mod collapser;
pub mod cue;
pub mod cue_parser;
pub mod document;
pub mod markup;
pub mod pipeline;
pub mod reflow;
pub mod script;
pub mod tokens;

pub use collapser::{CollapseConfig, RepetitionCollapser, TextSegment};
pub use cue::CaptionCue;
pub use cue_parser::{CaptionDialect, CueParser, ParsedCaptions, ParserOptions, decode_caption_bytes};
pub use document::{Chunk, Document, Line, Unit};
pub use pipeline::{
    PipelineConfig, PipelineOutput, PipelineState, PipelineStats, TranscriptPipeline, normalize_transcript,
};
pub use reflow::ReflowFormatter;
pub use script::{FormattingPolicy, PolicyTable, ProfileSource, ScriptClassifier, ScriptKind, ScriptProfile, UnitKind};
