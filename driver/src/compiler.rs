use std::path::PathBuf;

use mdcompile::SourceUnit;

use crate::error::DriverError;

/// Options passed with every compilation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub generate_in_memory: bool,
    pub treat_warnings_as_errors: bool,
    pub generate_executable: bool,
}

impl Default for CompileOptions {
    /// What a documentation check asks for: an in-memory library where any
    /// warning fails the build.
    fn default() -> Self {
        CompileOptions {
            generate_in_memory: true,
            treat_warnings_as_errors: true,
            generate_executable: false,
        }
    }
}

/// Result of one compilation job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    pub has_errors: bool,
    pub has_warnings: bool,
    /// Compiler messages, verbatim and in order.
    pub diagnostics: Vec<String>,
}

impl CompileOutput {
    /// Warnings count as failures, the same as errors.
    pub fn is_clean(&self) -> bool {
        !self.has_errors && !self.has_warnings
    }
}

/// The external compiler.
///
/// One value is constructed per run and reused for every group; whatever it
/// holds is released when it is dropped.
pub trait Compiler {
    /// Compile all units of one group as a single job.
    fn compile(
        &mut self,
        units: &[SourceUnit],
        references: &[PathBuf],
        options: CompileOptions,
    ) -> Result<CompileOutput, DriverError>;
}
