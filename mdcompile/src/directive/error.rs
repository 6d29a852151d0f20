use codespan_reporting::diagnostic::{Diagnostic, Label};

use crate::document::Document;

/// Diagnostic code for malformed directive lines.
pub const DIRECTIVE_SYNTAX_CODE: &str = "MDC0001";

/// A directive line that could not be parsed.
///
/// Fatal for the whole document. `line` is the 0-based index of the
/// directive line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveSyntaxError {
    #[error("unknown directive option `{option}`")]
    UnknownOption { line: usize, option: String },

    #[error("directive option `{option}` requires a value")]
    MissingValue { line: usize, option: String },

    #[error("invalid value `{value}` for directive flag `{option}`, expected `true` or `false`")]
    InvalidFlag {
        line: usize,
        option: String,
        value: String,
    },

    #[error("malformed directive option `{token}`")]
    Malformed { line: usize, token: String },
}

impl DirectiveSyntaxError {
    pub fn line(&self) -> usize {
        match self {
            DirectiveSyntaxError::UnknownOption { line, .. }
            | DirectiveSyntaxError::MissingValue { line, .. }
            | DirectiveSyntaxError::InvalidFlag { line, .. }
            | DirectiveSyntaxError::Malformed { line, .. } => *line,
        }
    }

    /// Convert to a codespan-reporting Diagnostic labelling the directive line.
    pub fn to_diagnostic(&self, file_id: usize, document: &Document) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(self.to_string())
            .with_code(DIRECTIVE_SYNTAX_CODE)
            .with_labels(vec![
                Label::primary(file_id, document.line_span(self.line()))
                    .with_message("in this directive"),
            ])
            .with_notes(vec![format!(
                "known options: {}",
                super::option_names().collect::<Vec<_>>().join(", ")
            )])
    }
}
