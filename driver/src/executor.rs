use std::path::PathBuf;

use mdcompile::{
    Document, DirectiveSyntaxError, Group, IdSource, Language, SourceUnit, extract_blocks,
    group_blocks, synthesize,
};
use tracing::{debug, info, warn};

use crate::compiler::{CompileOptions, Compiler};
use crate::report::{GroupOutcome, GroupReport, RunReport};

/// Run-wide settings shared by every group.
#[derive(Debug, Clone, Default)]
pub struct CheckSettings {
    pub language: Language,
    /// Assemblies referenced by every compilation job.
    pub references: Vec<PathBuf>,
}

/// Check every group of a document, one at a time, in first-seen order.
///
/// Only a malformed directive aborts the run. Every other failure is recorded
/// in the report and the remaining groups are still processed.
pub fn check_document(
    document: &Document,
    compiler: &mut dyn Compiler,
    settings: &CheckSettings,
    ids: &mut dyn IdSource,
) -> Result<RunReport, DirectiveSyntaxError> {
    let blocks = extract_blocks(document)?;
    let groups = group_blocks(&blocks, ids);
    debug!(document = %document, groups = groups.len(), "checking document");

    let mut report = RunReport::default();
    for group in &groups {
        let outcome = check_group(document, group, compiler, settings, ids);
        report.groups.push(GroupReport {
            key: group.key.clone(),
            start_line: group.representative().start_line,
            block_count: group.blocks.len(),
            outcome,
        });
    }
    Ok(report)
}

/// Synthesize one compilation unit per member, in document order.
pub fn synthesize_group(
    document: &Document,
    group: &Group<'_>,
    ids: &mut dyn IdSource,
) -> Vec<SourceUnit> {
    group
        .blocks
        .iter()
        .map(|block| synthesize(document, block, ids))
        .collect()
}

fn check_group(
    document: &Document,
    group: &Group<'_>,
    compiler: &mut dyn Compiler,
    settings: &CheckSettings,
    ids: &mut dyn IdSource,
) -> GroupOutcome {
    let line = group.representative().first_line_number();

    if !group.compiles() {
        info!(group = %group.key, line, "skipping group, compile disabled");
        return GroupOutcome::Skipped;
    }

    if let Some(found) = language_mismatch(group, &settings.language) {
        warn!(group = %group.key, line, ?found, "language mismatch");
        return GroupOutcome::LanguageMismatch {
            expected: settings.language.name().to_string(),
            found,
        };
    }

    let units = synthesize_group(document, group, ids);
    match compiler.compile(&units, &settings.references, CompileOptions::default()) {
        Ok(output) if output.is_clean() => {
            info!(group = %group.key, line, units = units.len(), "group compiled");
            GroupOutcome::Passed
        }
        Ok(output) => {
            warn!(group = %group.key, line, diagnostics = output.diagnostics.len(), "group failed to compile");
            GroupOutcome::CompileFailed {
                diagnostics: output.diagnostics,
            }
        }
        Err(err) => {
            warn!(group = %group.key, line, "compiler unavailable: {err}");
            GroupOutcome::DriverFailed(err)
        }
    }
}

/// The distinct tags of the group when they are not all the compilable language.
fn language_mismatch(group: &Group<'_>, language: &Language) -> Option<Vec<Option<String>>> {
    let recognized = group
        .blocks
        .iter()
        .all(|b| b.language.as_deref().is_some_and(|tag| language.recognizes(tag)));
    if recognized {
        return None;
    }

    let mut found: Vec<Option<String>> = Vec::new();
    for block in &group.blocks {
        if !found.contains(&block.language) {
            found.push(block.language.clone());
        }
    }
    Some(found)
}
