//! Compilation by running an external C# compiler (`csc` by default).

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use mdcompile::SourceUnit;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::compiler::{CompileOptions, CompileOutput, Compiler};
use crate::error::DriverError;

pub const DEFAULT_COMMAND: &str = "csc";

/// Runs a command-line compiler once per group.
///
/// Units are written to a scratch directory created with the compiler and
/// removed when it is dropped. A process cannot compile in memory, so
/// `generate_in_memory` only means the output assembly is written inside the
/// scratch directory and thrown away.
#[derive(Debug)]
pub struct ProcessCompiler {
    command: OsString,
    args: Vec<OsString>,
    work_dir: TempDir,
    jobs: usize,
}

impl ProcessCompiler {
    pub fn new(command: impl Into<OsString>) -> Result<Self, DriverError> {
        let work_dir = tempfile::Builder::new()
            .prefix("mdcompile-")
            .tempdir()
            .map_err(DriverError::WorkDir)?;
        Ok(ProcessCompiler {
            command: command.into(),
            args: Vec::new(),
            work_dir,
            jobs: 0,
        })
    }

    /// Arguments placed before the generated ones, e.g. a `dotnet` tool path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    fn command_name(&self) -> String {
        self.command.to_string_lossy().into_owned()
    }

    fn write_units(&self, job_dir: &Path, units: &[SourceUnit]) -> Result<Vec<PathBuf>, DriverError> {
        fs::create_dir_all(job_dir).map_err(|source| DriverError::WriteUnit {
            path: job_dir.to_path_buf(),
            source,
        })?;
        units
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                let path = job_dir.join(format!("unit{i}.cs"));
                fs::write(&path, &unit.text)
                    .map(|()| path.clone())
                    .map_err(|source| DriverError::WriteUnit { path, source })
            })
            .collect()
    }
}

impl Compiler for ProcessCompiler {
    fn compile(
        &mut self,
        units: &[SourceUnit],
        references: &[PathBuf],
        options: CompileOptions,
    ) -> Result<CompileOutput, DriverError> {
        self.jobs += 1;
        let job_dir = self.work_dir.path().join(format!("job{}", self.jobs));
        let files = self.write_units(&job_dir, units)?;

        let (target, extension) = if options.generate_executable {
            ("-target:exe", "exe")
        } else {
            ("-target:library", "dll")
        };
        let out = job_dir.join(format!("out.{extension}"));

        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg("-nologo")
            .arg(target)
            .arg(format!("-out:{}", out.display()));
        for reference in references {
            command.arg(format!("-reference:{}", reference.display()));
        }
        if options.treat_warnings_as_errors {
            command.arg("-warnaserror");
        }
        command.args(&files);

        debug!(command = %self.command_name(), units = units.len(), "invoking compiler");
        let output = command.output().map_err(|source| DriverError::Launch {
            command: self.command_name(),
            source,
        })?;

        if let Err(err) = fs::remove_dir_all(&job_dir) {
            warn!(dir = %job_dir.display(), "cannot clean compiler job directory: {err}");
        }

        let text = join_streams(&output.stdout, &output.stderr);
        Ok(classify_output(output.status.success(), &text))
    }
}

/// Stdout then stderr, always on separate lines.
fn join_streams(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(stderr));
    text
}

enum Severity {
    Error,
    Warning,
}

fn severity(line: &str) -> Option<Severity> {
    if line.contains(": error ") || line.starts_with("error ") {
        Some(Severity::Error)
    } else if line.contains(": warning ") || line.starts_with("warning ") {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Classify compiler output lines into errors and warnings.
///
/// A failing exit status always counts as an error; when no line looks like
/// a diagnostic, all of the output is kept so the failure is not silent.
pub fn classify_output(success: bool, text: &str) -> CompileOutput {
    let mut result = CompileOutput::default();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match severity(line) {
            Some(Severity::Error) => result.has_errors = true,
            Some(Severity::Warning) => result.has_warnings = true,
            None => continue,
        }
        result.diagnostics.push(line.to_string());
    }

    if !success {
        result.has_errors = true;
        if result.diagnostics.is_empty() {
            result.diagnostics = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
    result
}
