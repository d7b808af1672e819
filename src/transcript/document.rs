use serde::Serialize;
use std::fmt;

// @module: Reflowed transcript document

/// Smallest formatting element: a word or a grapheme cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub text: String,
    /// Whitespace preceded this unit in the normalized text
    pub spaced: bool,
}

impl Unit {
    pub fn new(text: impl Into<String>, spaced: bool) -> Self {
        Self {
            text: text.into(),
            spaced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub units: Vec<Unit>,
}

impl Line {
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Line text; the first unit never carries its leading space
    pub fn text(&self) -> String {
        let mut text = String::new();
        for unit in &self.units {
            if unit.spaced && !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&unit.text);
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub lines: Vec<Line>,
}

impl Chunk {
    pub fn unit_count(&self) -> usize {
        self.lines.iter().map(Line::unit_count).sum()
    }
}

/// Ordered chunks of ordered lines, built once by the reflow formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Document {
    pub chunks: Vec<Chunk>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn line_count(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.lines.len()).sum()
    }

    pub fn unit_count(&self) -> usize {
        self.chunks.iter().map(Chunk::unit_count).sum()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.chunks.iter().flat_map(|chunk| chunk.lines.iter())
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.lines().flat_map(|line| line.units.iter())
    }

    /// The normalized text the document was built from
    pub fn reconstruct(&self) -> String {
        let mut text = String::new();
        for unit in self.units() {
            if unit.spaced && !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&unit.text);
        }
        text
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (chunk_index, chunk) in self.chunks.iter().enumerate() {
            if chunk_index > 0 {
                write!(f, "\n\n")?;
            }
            for (line_index, line) in chunk.lines.iter().enumerate() {
                if line_index > 0 {
                    writeln!(f)?;
                }
                write!(f, "{}", line.text())?;
            }
        }
        Ok(())
    }
}
