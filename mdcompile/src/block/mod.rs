pub mod scanner;

use std::ops::Range;

use crate::directive::BlockConfig;

/// One fenced region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// 0-based index of the first content line (the line after the opening fence).
    pub start_line: usize,
    /// Number of content lines; 0 when the fences are adjacent.
    pub line_count: usize,
    /// Lower-cased language tag from the opening fence.
    pub language: Option<String>,
    /// Directive configuration attached to the opening fence.
    pub config: BlockConfig,
}

impl CodeBlock {
    /// Document line indices holding the block's content.
    pub fn content_range(&self) -> Range<usize> {
        self.start_line..self.start_line + self.line_count
    }

    /// 1-based document line of the first content line.
    pub fn first_line_number(&self) -> usize {
        self.start_line + 1
    }

    /// The block's content lines, verbatim.
    pub fn content<'a, L: AsRef<str>>(&self, lines: &'a [L]) -> Vec<&'a str> {
        lines
            .get(self.content_range())
            .unwrap_or_default()
            .iter()
            .map(AsRef::as_ref)
            .collect()
    }
}
