//! Byte offsets in document text and their line/column form.

use std::fmt;

pub use text_size::{TextRange, TextSize};

/// 0-based line and byte column. Displayed 1-based as `line:col`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Start offset of every line in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(offset, _)| TextSize::from(offset as u32 + 1)),
            )
            .collect();
        Self { line_starts }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line as u32,
            col: (offset - self.line_starts[line]).into(),
        }
    }

    /// `None` when the line does not exist.
    pub fn offset(&self, position: LineCol) -> Option<TextSize> {
        let start = self.line_starts.get(position.line as usize)?;
        Some(*start + TextSize::from(position.col))
    }

    /// Start of the line after the one holding `offset`; `None` on the last line.
    pub fn next_line_start(&self, offset: TextSize) -> Option<TextSize> {
        let line = self.line_col(offset).line as usize;
        self.line_starts.get(line + 1).copied()
    }
}
