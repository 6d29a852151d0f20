pub mod block;
pub mod directive;
pub mod document;
pub mod group;
pub mod ids;
pub mod language;
pub mod synth;

pub use block::CodeBlock;
pub use block::scanner::{FenceScanner, scan_blocks};
pub use directive::{BlockConfig, DirectiveSyntaxError};
pub use document::Document;
pub use group::{Group, GroupKey, group_blocks};
pub use ids::{IdSource, RandomIds, SequentialIds};
pub use language::Language;
pub use synth::{SourceUnit, synthesize};

/// Scan a document and collect every fenced block.
///
/// Stops at the first malformed directive: a directive error aborts the whole
/// document, it never skips a single block.
pub fn extract_blocks(document: &Document) -> Result<Vec<CodeBlock>, DirectiveSyntaxError> {
    scan_blocks(document.lines()).collect()
}
