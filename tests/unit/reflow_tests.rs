/*!
 * Tests for line and chunk wrapping
 */

use ytnote::transcript::{FormattingPolicy, ReflowFormatter, TextSegment, UnitKind};

fn numbered_words(count: usize) -> String {
    (1..=count).map(|n| format!("w{}", n)).collect::<Vec<_>>().join(" ")
}

/// Test the default latin limits on a long transcript
#[test]
fn test_format_with250Words_shouldFillSixLineChunks() {
    let formatter = ReflowFormatter::new(FormattingPolicy::latin()).unwrap();

    let document = formatter.format_text(&numbered_words(250));

    // 16 full lines of 15 and one of 10; six lines fit in 100 units
    assert_eq!(document.line_count(), 17);
    let sizes: Vec<usize> = document.chunks.iter().map(|c| c.unit_count()).collect();
    assert_eq!(sizes, vec![90, 90, 70]);
    assert!(document.lines().all(|line| line.unit_count() <= 15));
    assert_eq!(document.lines().next().unwrap().text(), numbered_words(15));
}

/// Test that segments are joined with single spaces before wrapping
#[test]
fn test_format_withSegments_shouldJoinWithSpaces() {
    let formatter = ReflowFormatter::new(FormattingPolicy::latin()).unwrap();
    let segments = vec![TextSegment::new("first  part"), TextSegment::new(" second part ")];

    let document = formatter.format(&segments);

    assert_eq!(document.reconstruct(), "first part second part");
}

/// Test that Latin words inside CJK text are split into characters too
#[test]
fn test_format_withMixedTextInCharacterMode_shouldKeepWordSpacing() {
    let formatter = ReflowFormatter::new(FormattingPolicy {
        unit_kind: UnitKind::Character,
        line_limit: 4,
        chunk_limit: 100,
    })
    .unwrap();

    let document = formatter.format_text("我爱 Rust 语言");

    let lines: Vec<String> = document.lines().map(|line| line.text()).collect();
    assert_eq!(lines, vec!["我爱 Ru", "st 语言"]);
    assert_eq!(document.reconstruct(), "我爱 Rust 语言");
}

/// Test that a chunk never exceeds the limit when lines fit inside it
#[test]
fn test_format_withCustomLimits_shouldRespectChunkLimit() {
    let formatter = ReflowFormatter::new(FormattingPolicy {
        unit_kind: UnitKind::Word,
        line_limit: 4,
        chunk_limit: 10,
    })
    .unwrap();

    let document = formatter.format_text(&numbered_words(23));

    for chunk in &document.chunks {
        assert!(chunk.unit_count() <= 10);
        assert!(chunk.lines.iter().all(|line| line.unit_count() <= 4));
    }
    assert_eq!(document.unit_count(), 23);
    assert_eq!(document.to_string().split("\n\n").count(), document.chunk_count());
}

/// Test that whitespace-only input gives an empty document
#[test]
fn test_format_withWhitespaceOnly_shouldBeEmpty() {
    let formatter = ReflowFormatter::new(FormattingPolicy::cjk()).unwrap();

    let document = formatter.format_text(" \n\t ");

    assert!(document.is_empty());
    assert_eq!(document.to_string(), "");
}

/// Test that a line limit above the chunk limit is still accepted
#[test]
fn test_new_withLineLimitAboveChunkLimit_shouldSucceed() {
    let policy = FormattingPolicy {
        unit_kind: UnitKind::Word,
        line_limit: 20,
        chunk_limit: 5,
    };

    let formatter = ReflowFormatter::new(policy).unwrap();

    assert_eq!(formatter.policy(), &policy);
    let document = formatter.format_text(&numbered_words(30));
    let sizes: Vec<usize> = document.chunks.iter().map(|c| c.unit_count()).collect();
    assert_eq!(sizes, vec![20, 10]);
}
