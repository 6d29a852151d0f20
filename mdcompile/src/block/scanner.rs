use tracing::debug;

use crate::block::CodeBlock;
use crate::directive::{self, BlockConfig, DirectiveSyntaxError};

/// Marker opening and closing a fenced block.
pub const FENCE: &str = "```";

/// Lazily scan `lines` for fenced blocks, in document order.
///
/// The scan is a pure function of its input: calling it again restarts from
/// the first line.
pub fn scan_blocks<L: AsRef<str>>(lines: &[L]) -> FenceScanner<'_, L> {
    FenceScanner {
        lines,
        index: 0,
        done: false,
    }
}

/// Forward-only fence scanner. See [`scan_blocks`].
pub struct FenceScanner<'a, L> {
    lines: &'a [L],
    index: usize,
    done: bool,
}

struct OpenBlock {
    start_line: usize,
    language: Option<String>,
    config: BlockConfig,
}

impl OpenBlock {
    fn close(self, end: usize) -> CodeBlock {
        CodeBlock {
            start_line: self.start_line,
            line_count: end - self.start_line,
            language: self.language,
            config: self.config,
        }
    }
}

impl<L: AsRef<str>> Iterator for FenceScanner<'_, L> {
    type Item = Result<CodeBlock, DirectiveSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let lines = self.lines;
        let mut open: Option<OpenBlock> = None;

        while self.index < lines.len() {
            let i = self.index;
            self.index += 1;

            let Some(rest) = lines[i].as_ref().trim().strip_prefix(FENCE) else {
                continue;
            };

            match open.take() {
                // Trailing text on a closing fence is ignored.
                Some(block) => {
                    let block = block.close(i);
                    debug!(
                        start_line = block.start_line,
                        line_count = block.line_count,
                        language = ?block.language,
                        "scanned block"
                    );
                    return Some(Ok(block));
                }
                None => {
                    let config = match directive::config_for_fence(lines, i) {
                        Ok(config) => config,
                        Err(err) => {
                            self.done = true;
                            return Some(Err(err));
                        }
                    };
                    let tag = rest.trim();
                    open = Some(OpenBlock {
                        start_line: i + 1,
                        language: (!tag.is_empty()).then(|| tag.to_lowercase()),
                        config,
                    });
                }
            }
        }

        self.done = true;
        open.map(|block| {
            debug!(start_line = block.start_line, "unterminated fence runs to end of document");
            Ok(block.close(lines.len()))
        })
    }
}
