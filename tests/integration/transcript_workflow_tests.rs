/*!
 * End-to-end tests for cleaning caption files and folders
 */

use anyhow::Result;
use std::fs;
use ytnote::app_config::{Config, OutputFormat};
use ytnote::app_controller::{Controller, FileOutcome, ISSUES_LOG_FILE};

use crate::common;

/// Test cleaning a single rolling caption file next to its input
#[tokio::test]
async fn test_run_withRollingCaptions_shouldWriteCleanText() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "talk.en.vtt", common::ROLLING_VTT)?;
    let controller = Controller::new_for_test()?;

    let outcome = controller.run(input, None, false).await?;

    let expected_path = temp_dir.path().join("talk.en_clean.txt");
    assert_eq!(outcome, FileOutcome::Written(expected_path.clone()));
    assert_eq!(fs::read_to_string(expected_path)?, "so today we talk about rolling captions\n");
    Ok(())
}

/// Test that existing outputs are kept unless overwriting is forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "lesson.srt")?;
    let output_dir = temp_dir.path().join("out");
    let existing = common::create_test_file(&output_dir, "lesson_clean.txt", "old notes")?;
    let controller = Controller::new_for_test()?;

    let skipped = controller.run(input.clone(), Some(output_dir.clone()), false).await?;
    assert_eq!(skipped, FileOutcome::Skipped(existing.clone()));
    assert_eq!(fs::read_to_string(&existing)?, "old notes");

    let written = controller.run(input, Some(output_dir), true).await?;
    assert_eq!(written, FileOutcome::Written(existing.clone()));
    assert_eq!(
        fs::read_to_string(&existing)?,
        "This is a test subtitle. It contains multiple entries. For testing purposes.\n"
    );
    Ok(())
}

/// Test JSON output carries the document, profile and policy
#[tokio::test]
async fn test_run_withJsonFormat_shouldWriteReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_cjk_subtitle(temp_dir.path(), "lesson.vtt", 120)?;
    let mut config = Config::default();
    config.output.format = OutputFormat::Json;
    let controller = Controller::with_config(config)?;

    let outcome = controller.run(input, None, false).await?;

    let FileOutcome::Written(path) = outcome else {
        panic!("expected a written file");
    };
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    assert_eq!(report["profile"]["script_kind"], "cjk");
    assert_eq!(report["profile"]["source"]["type"], "detected");
    assert_eq!(report["policy"]["unit_kind"], "character");
    assert_eq!(report["policy"]["line_limit"], 50);
    assert_eq!(report["stats"]["units"], 120);
    assert_eq!(report["stats"]["lines"], 3);
    assert_eq!(report["document"]["chunks"].as_array().map(Vec::len), Some(1));
    Ok(())
}

/// Test that 600 distinct ideographs come out as a 500 and a 100 character chunk
#[tokio::test]
async fn test_run_withLongCjkCaption_shouldSplitIntoCharacterChunks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_cjk_subtitle(temp_dir.path(), "lecture.vtt", 600)?;
    let controller = Controller::new_for_test()?;

    let outcome = controller.run(input, None, false).await?;

    let FileOutcome::Written(path) = outcome else {
        panic!("expected a written file");
    };
    let cleaned = fs::read_to_string(path)?;
    let chunk_sizes: Vec<usize> = cleaned
        .trim_end()
        .split("\n\n")
        .map(|chunk| chunk.chars().filter(|c| !c.is_whitespace()).count())
        .collect();
    assert_eq!(chunk_sizes, vec![500, 100]);
    assert_eq!(cleaned.lines().filter(|line| !line.is_empty()).count(), 12);
    Ok(())
}

/// Test that a file with no transcript content writes nothing
#[tokio::test]
async fn test_run_withOnlyHeaders_shouldReportEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "silent.vtt", "WEBVTT\n\n00:00.000 --> 00:02.000\n[Music]\n")?;
    let controller = Controller::new_for_test()?;

    let outcome = controller.run(input, None, false).await?;

    assert_eq!(outcome, FileOutcome::Empty);
    assert!(!temp_dir.path().join("silent_clean.txt").exists());
    Ok(())
}

/// Test that a missing input file is an error
#[tokio::test]
async fn test_run_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = controller.run(temp_dir.path().join("nope.vtt"), None, false).await;

    assert!(result.is_err());
    Ok(())
}

/// Test a whole folder: good files, an empty one, a broken one and a stale output
#[tokio::test]
async fn test_runFolder_withMixedFiles_shouldSummarizeAndLogIssues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    fs::copy(common::test_resource_path("lecture.srt"), root.join("lecture.srt"))?;
    fs::create_dir_all(root.join("nested"))?;
    fs::copy(
        common::test_resource_path("transcript_panel.txt"),
        root.join("nested/transcript_panel.txt"),
    )?;
    common::create_test_file(root, "silent.vtt", "WEBVTT\n")?;
    fs::write(root.join("broken.srt"), b"\x00\x01\x02\x03binary")?;
    common::create_test_file(root, "old_clean.txt", "previous output")?;

    let controller = Controller::new_for_test()?;
    let summary = controller.run_folder(root.to_path_buf(), None, false).await?;

    assert_eq!(summary.written, 2);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.total(), 4);
    assert!(summary.issues[0].starts_with("broken.srt"));

    assert_eq!(
        fs::read_to_string(root.join("lecture_clean.txt"))?,
        "Welcome to the lecture. Today we cover parsing & formatting. Let's begin.\n"
    );
    assert!(root.join("nested/transcript_panel_clean.txt").exists());

    let log = fs::read_to_string(root.join(ISSUES_LOG_FILE))?;
    assert!(log.contains("2 written"));
    assert!(log.contains("broken.srt"));

    // A second run finds the outputs already in place
    let rerun = controller.run_folder(root.to_path_buf(), None, false).await?;
    assert_eq!(rerun.skipped, 2);
    assert_eq!(rerun.written, 0);
    Ok(())
}

/// Test that folder outputs can go to a separate directory
#[tokio::test]
async fn test_runFolder_withOutputDir_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("captions");
    let output_dir = temp_dir.path().join("notes");
    common::create_test_subtitle(&input_dir, "one.srt")?;
    common::create_test_file(&input_dir, "two.vtt", common::ROLLING_VTT)?;

    let controller = Controller::new_for_test()?;
    let summary = controller.run_folder(input_dir.clone(), Some(output_dir.clone()), false).await?;

    assert_eq!(summary.written, 2);
    assert!(output_dir.join("one_clean.txt").exists());
    assert!(output_dir.join("two_clean.txt").exists());
    assert!(!input_dir.join("one_clean.txt").exists());
    Ok(())
}

/// Test that an empty directory is reported as an error
#[tokio::test]
async fn test_runFolder_withNoCaptionFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.md", "nothing")?;
    let controller = Controller::new_for_test()?;

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), None, false).await.is_err());
    Ok(())
}

/// Test the order in which language hints are resolved
#[test]
fn test_resolveLanguageHint_shouldPreferCliThenSidecarThenFilenameThenConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tagged = common::create_test_file(temp_dir.path(), "talk.ja.vtt", "WEBVTT\n")?;
    let plain = common::create_test_file(temp_dir.path(), "plain.vtt", "WEBVTT\n")?;
    let with_sidecar = common::create_test_file(temp_dir.path(), "meta.de.vtt", "WEBVTT\n")?;
    common::create_test_file(temp_dir.path(), "meta.info.json", r#"{"language": "ko"}"#)?;

    let mut config = Config::default();
    config.language = Some("fr".to_string());
    let controller = Controller::with_config(config)?;

    assert_eq!(controller.resolve_language_hint(&with_sidecar).as_deref(), Some("ko"));
    assert_eq!(controller.resolve_language_hint(&tagged).as_deref(), Some("ja"));
    assert_eq!(controller.resolve_language_hint(&plain).as_deref(), Some("fr"));

    let overriding = controller.with_language_override(Some("zh".to_string()));
    assert_eq!(overriding.resolve_language_hint(&tagged).as_deref(), Some("zh"));
    Ok(())
}

/// Test that a file name tag switches Latin-looking text to CJK formatting
#[test]
fn test_cleanFile_withCjkFilenameTag_shouldUseCharacterLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let words = (1..=60).map(|n| format!("w{}", n)).collect::<Vec<_>>().join(" ");
    let input = common::create_test_file(
        temp_dir.path(),
        "romaji.ja.vtt",
        &format!("WEBVTT\n\n00:00.000 --> 00:30.000\n{}\n", words),
    )?;
    let controller = Controller::new_for_test()?;

    let cleaned = controller.clean_file(&input)?.unwrap_or_default();

    // Character units: 50 graphemes per line instead of 15 words
    let first_line = cleaned.lines().next().unwrap_or_default();
    assert_eq!(first_line.chars().filter(|c| !c.is_whitespace()).count(), 50);
    Ok(())
}

/// Test that invalid configuration is rejected before any work starts
#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.formatting.latin_line_limit = 0;

    assert!(Controller::with_config(config).is_err());
}
