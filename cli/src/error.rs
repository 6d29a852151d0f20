//! CLI error types.

use std::io;
use std::path::PathBuf;

use driver::DriverError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("document '{}' does not exist", .0.display())]
    MissingDocument(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{0}")]
    Driver(#[from] DriverError),
}
