/*!
 * Reflow formatting.
 *
 * Joins deduplicated segments into one normalized text and re-wraps it into
 * lines and chunks of bounded size. Units are words for space-separated
 * scripts and grapheme clusters for CJK. Every unit remembers whether a
 * space preceded it, so the document always reconstructs the joined text.
 */

use log::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::collapser::TextSegment;
use super::document::{Chunk, Document, Line, Unit};
use super::markup::normalize_whitespace;
use super::script::{FormattingPolicy, UnitKind};
use crate::errors::PipelineError;

/// Wraps text segments into a `Document`
#[derive(Debug, Clone, Copy)]
pub struct ReflowFormatter {
    policy: FormattingPolicy,
}

impl ReflowFormatter {
    /// Create a formatter, rejecting zero line or chunk limits
    pub fn new(policy: FormattingPolicy) -> Result<Self, PipelineError> {
        if policy.line_limit == 0 {
            return Err(PipelineError::FormatError("line limit must be at least 1".to_string()));
        }
        if policy.chunk_limit == 0 {
            return Err(PipelineError::FormatError("chunk limit must be at least 1".to_string()));
        }
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &FormattingPolicy {
        &self.policy
    }

    pub fn format(&self, segments: &[TextSegment]) -> Document {
        let joined = segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.format_text(&joined)
    }

    /// Wrap a single text, normalizing its whitespace first
    pub fn format_text(&self, text: &str) -> Document {
        let normalized = normalize_whitespace(text);
        let units = split_units(&normalized, self.policy.unit_kind);
        let lines = self.wrap_lines(units);
        let chunks = self.group_chunks(lines);

        let document = Document { chunks };
        debug!(
            "Reflowed {} units into {} lines and {} chunks",
            document.unit_count(),
            document.line_count(),
            document.chunk_count()
        );
        document
    }

    fn wrap_lines(&self, units: Vec<Unit>) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut current = Vec::with_capacity(self.policy.line_limit);

        for unit in units {
            if current.len() == self.policy.line_limit {
                lines.push(Line {
                    units: std::mem::take(&mut current),
                });
            }
            current.push(unit);
        }
        if !current.is_empty() {
            lines.push(Line { units: current });
        }

        lines
    }

    fn group_chunks(&self, lines: Vec<Line>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<Line> = Vec::new();
        let mut current_units = 0;

        for line in lines {
            let line_units = line.unit_count();
            // A line longer than the chunk limit still gets a chunk of its own
            if !current.is_empty() && current_units + line_units > self.policy.chunk_limit {
                chunks.push(Chunk {
                    lines: std::mem::take(&mut current),
                });
                current_units = 0;
            }
            current_units += line_units;
            current.push(line);
        }
        if !current.is_empty() {
            chunks.push(Chunk { lines: current });
        }

        chunks
    }
}

/// Split normalized text into formatting units
fn split_units(text: &str, unit_kind: UnitKind) -> Vec<Unit> {
    match unit_kind {
        UnitKind::Word => text
            .split_whitespace()
            .enumerate()
            .map(|(index, word)| Unit::new(word, index > 0))
            .collect(),
        UnitKind::Character => {
            let mut units = Vec::new();
            let mut spaced = false;
            for grapheme in text.graphemes(true) {
                if grapheme.chars().all(char::is_whitespace) {
                    spaced = !units.is_empty();
                    continue;
                }
                units.push(Unit::new(grapheme, spaced));
                spaced = false;
            }
            units
        }
    }
}
