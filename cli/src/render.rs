//! Diagnostic rendering for directive errors and failed groups.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use driver::{GroupOutcome, GroupReport, RunReport};
use mdcompile::{DirectiveSyntaxError, Document};

pub const LANGUAGE_MISMATCH_CODE: &str = "MDC0002";
pub const COMPILE_FAILED_CODE: &str = "MDC0003";
pub const COMPILER_UNAVAILABLE_CODE: &str = "MDC0004";

/// Writes codespan diagnostics for one document to stderr.
pub struct Reporter {
    files: SimpleFiles<String, String>,
    file_id: usize,
    writer: StandardStream,
    config: term::Config,
}

impl Reporter {
    pub fn new(document: &Document, color_choice: ColorChoice) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(document.display_name(), document.source().to_string());
        Reporter {
            files,
            file_id,
            writer: StandardStream::stderr(color_choice),
            config: term::Config::default(),
        }
    }

    pub fn directive_error(&self, error: &DirectiveSyntaxError, document: &Document) {
        self.emit(&error.to_diagnostic(self.file_id, document));
    }

    /// Emit one diagnostic per failed group, then the summary line.
    pub fn run_report(&self, report: &RunReport, document: &Document) {
        for group in report.failures() {
            if let Some(diagnostic) = group_diagnostic(self.file_id, document, group) {
                self.emit(&diagnostic);
            }
        }
        eprintln!("{}: {}", document.display_name(), summary(report));
    }

    fn emit(&self, diagnostic: &Diagnostic<usize>) {
        let _ = term::emit_to_write_style(
            &mut self.writer.lock(),
            &self.config,
            &self.files,
            diagnostic,
        );
    }
}

pub fn summary(report: &RunReport) -> String {
    format!(
        "{} group(s): {} passed, {} skipped, {} failed",
        report.groups.len(),
        report.passed(),
        report.skipped(),
        report.failed()
    )
}

/// Diagnostic for a failed group, positioned at its first block.
pub fn group_diagnostic(
    file_id: usize,
    document: &Document,
    group: &GroupReport,
) -> Option<Diagnostic<usize>> {
    let (code, message, mut notes) = match &group.outcome {
        GroupOutcome::Skipped | GroupOutcome::Passed => return None,
        GroupOutcome::LanguageMismatch { expected, found } => {
            let found = found
                .iter()
                .map(|tag| tag.as_deref().unwrap_or("(none)"))
                .collect::<Vec<_>>()
                .join(", ");
            (
                LANGUAGE_MISMATCH_CODE,
                format!("every block in a group must be tagged as {expected}"),
                vec![format!("found language tags: {found}")],
            )
        }
        GroupOutcome::CompileFailed { diagnostics } => (
            COMPILE_FAILED_CODE,
            "compilation failed".to_string(),
            diagnostics.clone(),
        ),
        GroupOutcome::DriverFailed(err) => (
            COMPILER_UNAVAILABLE_CODE,
            "compiler could not be run".to_string(),
            vec![err.to_string()],
        ),
    };
    notes.insert(
        0,
        format!("group: {} ({} block(s))", group.key.label(), group.block_count),
    );

    Some(
        Diagnostic::error()
            .with_code(code)
            .with_message(message)
            .with_labels(vec![
                Label::primary(file_id, document.line_span(group.start_line))
                    .with_message(format!("in group `{}`", group.key.label())),
            ])
            .with_notes(notes),
    )
}
