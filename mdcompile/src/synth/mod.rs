//! Turns one scanned block into a self-contained C# compilation unit.
//!
//! The unit brackets the block's content with `#line` directives so that
//! compiler diagnostics inside the content point at the markdown document.

use tracing::debug;

use crate::block::CodeBlock;
use crate::document::Document;
use crate::ids::IdSource;

/// Namespace wrapping every unit when `wrapInNamespace` is set.
pub const NAMESPACE: &str = "MdCompile.Samples";

/// Prefix of the generated type name when `wrapInClass` is set.
pub const CLASS_PREFIX: &str = "Sample_";

pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const LINE_HIDDEN: &str = "#line hidden";
const LINE_DEFAULT: &str = "#line default";

/// A synthesized compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Unit text, lines joined with [`LINE_SEPARATOR`].
    pub text: String,
    /// For each synthesized line, the 1-based document line it came from.
    pub line_map: Vec<Option<usize>>,
}

impl SourceUnit {
    /// Map a 1-based line of the unit back to its 1-based document line.
    pub fn original_line(&self, unit_line: usize) -> Option<usize> {
        unit_line
            .checked_sub(1)
            .and_then(|index| self.line_map.get(index).copied().flatten())
    }

    pub fn line_count(&self) -> usize {
        self.line_map.len()
    }
}

#[derive(Default)]
struct UnitBuilder {
    lines: Vec<String>,
    line_map: Vec<Option<usize>>,
}

impl UnitBuilder {
    fn synthetic(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        self.line_map.push(None);
    }

    fn mapped(&mut self, line: &str, original: usize) {
        self.lines.push(line.to_string());
        self.line_map.push(Some(original));
    }

    fn finish(self) -> SourceUnit {
        SourceUnit {
            text: self.lines.join(LINE_SEPARATOR),
            line_map: self.line_map,
        }
    }
}

/// Build the compilation unit for `block`.
///
/// `ids` is only consulted when the block asks for a class wrapper.
pub fn synthesize(document: &Document, block: &CodeBlock, ids: &mut dyn IdSource) -> SourceUnit {
    let config = &block.config;
    let mut unit = UnitBuilder::default();

    unit.synthetic(LINE_HIDDEN);
    for import in &config.imports {
        unit.synthetic(format!("using {import};"));
    }
    if config.wrap_in_namespace {
        unit.synthetic(format!("namespace {NAMESPACE}"));
        unit.synthetic("{");
    }
    if config.wrap_in_class {
        unit.synthetic(format!("public class {CLASS_PREFIX}{}", ids.next_id()));
        unit.synthetic("{");
    }
    if let Some(prefix) = config.prefix.as_deref().filter(|p| !p.is_empty()) {
        unit.synthetic(prefix);
    }

    unit.synthetic(format!(
        "#line {} \"{}\"",
        block.first_line_number(),
        marker_path(&document.display_name())
    ));
    for (offset, line) in block.content(document.lines()).into_iter().enumerate() {
        unit.mapped(line, block.first_line_number() + offset);
    }
    unit.synthetic(LINE_HIDDEN);

    if let Some(suffix) = config.suffix.as_deref().filter(|s| !s.is_empty()) {
        unit.synthetic(suffix);
    }
    if config.wrap_in_class {
        unit.synthetic("}");
    }
    if config.wrap_in_namespace {
        unit.synthetic("}");
    }
    unit.synthetic(LINE_DEFAULT);

    debug!(
        start_line = block.start_line,
        lines = unit.lines.len(),
        "synthesized compilation unit"
    );
    unit.finish()
}

/// A `#line` file name cannot hold quotes or line breaks, so those are replaced.
fn marker_path(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' => '\'',
            '\r' | '\n' => ' ',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directive::BlockConfig;
    use crate::ids::SequentialIds;

    fn document() -> Document {
        Document::new(
            "docs/guide.md",
            "# Guide\n```csharp\nvar x = 1;\nConsole.WriteLine(x);\n```\n",
        )
    }

    fn block(config: BlockConfig) -> CodeBlock {
        CodeBlock {
            start_line: 2,
            line_count: 2,
            language: Some("csharp".into()),
            config,
        }
    }

    fn lines(unit: &SourceUnit) -> Vec<&str> {
        unit.text.split(LINE_SEPARATOR).collect()
    }

    #[test]
    fn default_config_wraps_in_namespace() {
        let unit = synthesize(&document(), &block(BlockConfig::default()), &mut SequentialIds::new());
        assert_eq!(
            lines(&unit),
            vec![
                "#line hidden",
                "namespace MdCompile.Samples",
                "{",
                "#line 3 \"docs/guide.md\"",
                "var x = 1;",
                "Console.WriteLine(x);",
                "#line hidden",
                "}",
                "#line default",
            ]
        );
    }

    #[test]
    fn full_config_orders_scopes_lifo() {
        let config = BlockConfig {
            imports: vec!["System".into(), "System.IO".into()],
            wrap_in_class: true,
            prefix: Some("void Run() {".into()),
            suffix: Some("}".into()),
            ..BlockConfig::default()
        };
        let unit = synthesize(&document(), &block(config), &mut SequentialIds::new());
        assert_eq!(
            lines(&unit),
            vec![
                "#line hidden",
                "using System;",
                "using System.IO;",
                "namespace MdCompile.Samples",
                "{",
                "public class Sample_1",
                "{",
                "void Run() {",
                "#line 3 \"docs/guide.md\"",
                "var x = 1;",
                "Console.WriteLine(x);",
                "#line hidden",
                "}",
                "}",
                "}",
                "#line default",
            ]
        );
    }

    #[test]
    fn no_wrapping_keeps_only_markers() {
        let config = BlockConfig {
            wrap_in_namespace: false,
            ..BlockConfig::default()
        };
        let unit = synthesize(&document(), &block(config), &mut SequentialIds::new());
        assert_eq!(
            lines(&unit),
            vec![
                "#line hidden",
                "#line 3 \"docs/guide.md\"",
                "var x = 1;",
                "Console.WriteLine(x);",
                "#line hidden",
                "#line default",
            ]
        );
    }

    #[test]
    fn line_map_points_content_at_document_lines() {
        let unit = synthesize(&document(), &block(BlockConfig::default()), &mut SequentialIds::new());
        assert_eq!(unit.line_count(), 9);
        assert_eq!(unit.original_line(1), None);
        assert_eq!(unit.original_line(4), None);
        assert_eq!(unit.original_line(5), Some(3));
        assert_eq!(unit.original_line(6), Some(4));
        assert_eq!(unit.original_line(7), None);
        assert_eq!(unit.original_line(0), None);
        assert_eq!(unit.original_line(99), None);
    }

    #[test]
    fn empty_block_still_synthesizes() {
        let doc = Document::new("a.md", "```cs\n```\n");
        let empty = CodeBlock {
            start_line: 1,
            line_count: 0,
            language: Some("cs".into()),
            config: BlockConfig::default(),
        };
        let unit = synthesize(&doc, &empty, &mut SequentialIds::new());
        assert!(unit.line_map.iter().all(Option::is_none));
        assert!(unit.text.contains("#line 2 \"a.md\""));
    }

    #[test]
    fn quotes_in_document_name_keep_marker_valid() {
        let doc = Document::new("docs/\"quoted\".md", "```cs\nA\n```\n");
        let b = CodeBlock {
            start_line: 1,
            line_count: 1,
            language: Some("cs".into()),
            config: BlockConfig::default(),
        };
        let unit = synthesize(&doc, &b, &mut SequentialIds::new());
        assert!(unit.text.contains("#line 2 \"docs/'quoted'.md\""));
        assert_eq!(marker_path("a\nb\r.md"), "a b .md");
    }

    #[test]
    fn synthesis_is_repeatable_without_class_wrapper() {
        let doc = document();
        let b = block(BlockConfig::default());
        let mut ids = SequentialIds::new();
        assert_eq!(synthesize(&doc, &b, &mut ids), synthesize(&doc, &b, &mut ids));
    }

    #[test]
    fn class_names_differ_between_syntheses() {
        let doc = document();
        let b = block(BlockConfig {
            wrap_in_class: true,
            ..BlockConfig::default()
        });
        let mut ids = SequentialIds::new();
        let first = synthesize(&doc, &b, &mut ids);
        let second = synthesize(&doc, &b, &mut ids);
        assert!(first.text.contains("Sample_1"));
        assert!(second.text.contains("Sample_2"));
        assert_eq!(first.text.replace("Sample_1", "Sample_2"), second.text);
    }
}
