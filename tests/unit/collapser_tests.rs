/*!
 * Tests for rolling-caption and phrase repetition collapsing
 */

use std::time::Duration;
use ytnote::transcript::{CaptionCue, CollapseConfig, RepetitionCollapser, TextSegment};

fn cue(start_ms: u64, end_ms: u64, text: &str) -> CaptionCue {
    CaptionCue::new(Duration::from_millis(start_ms), Duration::from_millis(end_ms), text)
}

fn texts(segments: &[TextSegment]) -> Vec<&str> {
    segments.iter().map(|s| s.text.as_str()).collect()
}

/// Test the two-cue rolling example from a typical auto-caption track
#[test]
fn test_collapse_withOverlappingCues_shouldKeepOnlyNewWords() {
    let cues = vec![cue(0, 2000, "hello world"), cue(1500, 3500, "world how are you")];

    let segments = RepetitionCollapser::default().collapse(&cues);

    assert_eq!(texts(&segments), vec!["hello world", "how are you"]);
}

/// Test that overlap matching ignores case
#[test]
fn test_collapse_withDifferentCase_shouldStillMatchOverlap() {
    let cues = vec![cue(0, 1000, "Hello World"), cue(1000, 2000, "hello world And More")];

    let segments = RepetitionCollapser::default().collapse(&cues);

    assert_eq!(texts(&segments), vec!["Hello World", "And More"]);
}

/// Test that a raised overlap threshold keeps short overlaps
#[test]
fn test_collapse_withHigherMinimumOverlap_shouldKeepSingleWordOverlap() {
    let collapser = RepetitionCollapser::new(CollapseConfig {
        min_overlap_tokens: 2,
        ..CollapseConfig::default()
    });
    let cues = vec![cue(0, 1000, "we went home"), cue(1000, 2000, "home sweet home")];

    let segments = collapser.collapse(&cues);

    assert_eq!(texts(&segments), vec!["we went home", "home sweet home"]);
}

/// Test that an overlap older than the window is not removed
#[test]
fn test_collapse_withSmallWindow_shouldOnlyCompareRecentTokens() {
    let collapser = RepetitionCollapser::new(CollapseConfig {
        overlap_window_tokens: 2,
        ..CollapseConfig::default()
    });
    let cues = vec![cue(0, 1000, "one two three four"), cue(1000, 2000, "two three four five")];

    let segments = collapser.collapse(&cues);

    // Only "three four" is in the window, and the cue does not start with it
    assert_eq!(texts(&segments), vec!["one two three four", "two three four five"]);
}

/// Test that a long phrase said twice in a row within one cue is kept once
#[test]
fn test_collapse_withRepeatedPhraseInsideCue_shouldKeepOneCopy() {
    let cues = vec![cue(
        0,
        5000,
        "thanks for watching and see you next time thanks for watching and see you next time",
    )];

    let segments = RepetitionCollapser::default().collapse(&cues);

    assert_eq!(texts(&segments), vec!["thanks for watching and see you next time"]);
}

/// Test that a CJK phrase of ten characters repeated back to back is kept once
#[test]
fn test_collapse_withRepeatedCjkPhrase_shouldKeepOneCopy() {
    let phrase = "今天我们来讨论字幕处理";
    let cues = vec![cue(0, 5000, &format!("{}{}", phrase, phrase))];

    let segments = RepetitionCollapser::default().collapse(&cues);

    assert_eq!(texts(&segments), vec![phrase]);
}

/// Test that collapsing the collapser's own output changes nothing
#[test]
fn test_collapseSegments_onCollapsedOutput_shouldBeNoOp() {
    let cues = vec![
        cue(0, 1000, "so today we talk"),
        cue(1000, 2000, "so today we talk about rolling captions"),
        cue(2000, 3000, "about rolling captions and why they repeat and why they repeat"),
        cue(3000, 4000, "no no no"),
    ];
    let collapser = RepetitionCollapser::default();

    let once = collapser.collapse(&cues);
    let twice = collapser.collapse_segments(&once);

    assert_eq!(once, twice);
}
