/*!
 * Tests for error types and conversions
 */

use ytnote::errors::{AppError, PipelineError};

#[test]
fn test_pipelineError_noContent_shouldDisplayCorrectly() {
    let error = PipelineError::NoContent("caption stream is empty".to_string());
    let display = format!("{}", error);
    assert!(display.contains("No transcript content"));
    assert!(display.contains("caption stream is empty"));
    assert!(error.is_no_content());
}

#[test]
fn test_pipelineError_kinds_shouldBeStable() {
    assert_eq!(PipelineError::NoContent(String::new()).kind(), "no_content");
    assert_eq!(PipelineError::ParseError(String::new()).kind(), "parse_error");
    assert_eq!(PipelineError::FormatError(String::new()).kind(), "format_error");
    assert!(!PipelineError::ParseError(String::new()).is_no_content());
}

#[test]
fn test_pipelineError_detail_shouldReturnMessage() {
    let error = PipelineError::FormatError("line limit must be at least 1".to_string());
    assert_eq!(error.detail(), "line limit must be at least 1");
    assert!(error.to_string().starts_with("Failed to format transcript"));
}

#[test]
fn test_appError_fromPipelineError_shouldWrapCorrectly() {
    let app_error: AppError = PipelineError::ParseError("binary input".to_string()).into();
    assert!(matches!(app_error, AppError::Pipeline(PipelineError::ParseError(_))));
    assert!(app_error.to_string().contains("binary input"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "talk.vtt missing");
    let app_error = AppError::from(io_error);
    assert!(matches!(app_error, AppError::File(_)));
    assert!(app_error.to_string().contains("talk.vtt missing"));
}

#[test]
fn test_appError_fromJsonError_shouldBecomeConfigError() {
    let json_error = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
    let app_error = AppError::from(json_error);
    assert!(matches!(app_error, AppError::Config(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error = AppError::from(anyhow::anyhow!("something odd"));
    assert!(matches!(app_error, AppError::Unknown(_)));
    assert_eq!(app_error.to_string(), "Unknown error: something odd");
}
