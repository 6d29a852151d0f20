use std::fmt;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// A markdown document held as an ordered sequence of lines.
///
/// The original text is kept alongside the split lines so diagnostics can
/// point at byte ranges of the source.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    source: String,
    lines: Vec<String>,
    /// Byte offset of the first character of each line in `source`.
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let source = source.into();
        let mut lines = Vec::new();
        let mut line_starts = Vec::new();
        let mut offset = 0;
        for raw in source.split_inclusive('\n') {
            line_starts.push(offset);
            offset += raw.len();
            let line = raw.strip_suffix('\n').unwrap_or(raw);
            let line = line.strip_suffix('\r').unwrap_or(line);
            lines.push(line.to_string());
        }
        Document {
            path: path.into(),
            source,
            lines,
            line_starts,
        }
    }

    /// Read a document from disk as UTF-8 text.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        Ok(Document::new(path, source))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The identity used in position markers and diagnostics.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Byte range of a line's content (terminator excluded).
    ///
    /// Indices past the end collapse to an empty range at the end of the source.
    pub fn line_span(&self, index: usize) -> Range<usize> {
        match (self.line_starts.get(index), self.lines.get(index)) {
            (Some(&start), Some(line)) => start..start + line.len(),
            _ => self.source.len()..self.source.len(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
