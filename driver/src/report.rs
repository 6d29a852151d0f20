use mdcompile::GroupKey;

use crate::error::DriverError;

/// What happened to one group.
#[derive(Debug)]
pub enum GroupOutcome {
    /// A member opted the group out with `compile=false`.
    Skipped,
    Passed,
    /// Members carry differing or unsupported language tags.
    LanguageMismatch {
        expected: String,
        found: Vec<Option<String>>,
    },
    /// The compiler reported errors or warnings.
    CompileFailed { diagnostics: Vec<String> },
    /// The compiler could not be run for this group.
    DriverFailed(DriverError),
}

impl GroupOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, GroupOutcome::Skipped | GroupOutcome::Passed)
    }
}

#[derive(Debug)]
pub struct GroupReport {
    pub key: GroupKey,
    /// 0-based start line of the group's first block.
    pub start_line: usize,
    pub block_count: usize,
    pub outcome: GroupOutcome,
}

impl GroupReport {
    /// 1-based document line used to position diagnostics for the group.
    pub fn line_number(&self) -> usize {
        self.start_line + 1
    }
}

/// Outcomes of every group in one document, in first-seen order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    /// True when every group passed or was skipped.
    pub fn success(&self) -> bool {
        self.groups.iter().all(|g| !g.outcome.is_failure())
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Passed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(GroupOutcome::is_failure)
    }

    pub fn failures(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| g.outcome.is_failure())
    }

    fn count(&self, predicate: impl Fn(&GroupOutcome) -> bool) -> usize {
        self.groups.iter().filter(|g| predicate(&g.outcome)).count()
    }
}
