/*!
 * # ytnote - YouTube captions to clean notes
 *
 * A Rust library for turning raw video caption tracks into readable,
 * chunked transcripts ready for a note-taking page.
 *
 * ## Features
 *
 * - Parse WebVTT, SubRip and copied plain-text transcripts
 * - Strip caption markup and sound annotations
 * - Remove rolling auto-caption repetition
 * - Detect CJK vs Latin scripts, or take an ISO 639 language hint
 * - Reflow into fixed-size lines and chunks per script
 * - Process whole directories of caption files concurrently
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `transcript`: The normalization pipeline:
 *   - `transcript::cue_parser`: Caption stream parsing
 *   - `transcript::collapser`: Repetition collapsing
 *   - `transcript::script`: Script classification and formatting policies
 *   - `transcript::reflow`: Line and chunk wrapping
 *   - `transcript::pipeline`: Stage sequencing and state tracking
 * - `app_config`: Configuration management
 * - `app_controller`: File and folder workflow
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, PipelineError};
pub use language_utils::{get_language_name, normalize_to_part2t, script_for_language};
pub use transcript::{
    Document, PipelineOutput, ScriptKind, ScriptProfile, TranscriptPipeline, normalize_transcript,
};
