use std::io;
use std::path::PathBuf;

/// Failures of the compilation driver itself, as opposed to failed compilations.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("cannot create compiler work directory: {0}")]
    WorkDir(#[source] io::Error),

    #[error("cannot write compilation unit {}: {source}", path.display())]
    WriteUnit { path: PathBuf, source: io::Error },

    #[error("cannot launch compiler `{command}`: {source}")]
    Launch { command: String, source: io::Error },
}
