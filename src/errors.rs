/*!
 * Error types for the ytnote application.
 *
 * The transcript pipeline reports its three failure kinds through
 * `PipelineError`; the application layer wraps those together with file
 * and configuration problems in `AppError`. Both use the thiserror crate.
 */

use thiserror::Error;

/// Failures surfaced by the transcript normalization pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The input held no extractable cues (a legitimate empty transcript)
    #[error("No transcript content: {0}")]
    NoContent(String),

    /// The input could not be decoded as any supported caption dialect
    #[error("Failed to parse caption stream: {0}")]
    ParseError(String),

    /// The reflow formatter was asked to break one of its invariants
    #[error("Failed to format transcript: {0}")]
    FormatError(String),
}

impl PipelineError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoContent(_) => "no_content",
            Self::ParseError(_) => "parse_error",
            Self::FormatError(_) => "format_error",
        }
    }

    /// Human-readable detail carried by the failure
    pub fn detail(&self) -> &str {
        match self {
            Self::NoContent(detail) | Self::ParseError(detail) | Self::FormatError(detail) => detail,
        }
    }

    /// Whether this failure only means "nothing to clean"
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the transcript pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
