pub mod compiler;
pub mod error;
pub mod executor;
pub mod process;
pub mod report;

pub use compiler::{CompileOptions, CompileOutput, Compiler};
pub use error::DriverError;
pub use executor::{CheckSettings, check_document, synthesize_group};
pub use process::ProcessCompiler;
pub use report::{GroupOutcome, GroupReport, RunReport};
