mod config;
mod error;
mod render;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use codespan_reporting::term::termcolor::ColorChoice;
use driver::{CheckSettings, check_document, synthesize_group};
use mdcompile::{CodeBlock, Document, RandomIds, extract_blocks, group_blocks};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::CliError;
use render::Reporter;

#[derive(Parser)]
#[command(
    name = "mdcompile",
    version,
    about = "Compile the C# code blocks of a markdown document"
)]
struct Cli {
    /// Markdown document to check
    file: PathBuf,

    /// Reference assembly passed to the compiler. Repeatable.
    #[arg(short, long = "reference", value_name = "PATH")]
    references: Vec<PathBuf>,

    /// Log every block and group as it is processed
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (default: ./mdcompile.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List the document's code blocks and exit
    #[arg(long)]
    list: bool,

    /// Print the synthesized compilation units instead of compiling them
    #[arg(long, conflicts_with = "list")]
    emit: bool,

    /// Disable colored error output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    process::exit(exit_code(&cli));
}

/// 0 when every group passed or was skipped, 1 otherwise.
fn exit_code(cli: &Cli) -> i32 {
    match run(cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

/// `--verbose` forces debug logs, otherwise `RUST_LOG` or warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether the run succeeded.
fn run(cli: &Cli) -> Result<bool, CliError> {
    let config = Config::load(cli.config.as_deref())?;
    debug!(compiler = %config.compiler.command, language = %config.language.name, "configuration loaded");
    let document = read_document(&cli.file)?;

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let reporter = Reporter::new(&document, color_choice);

    if cli.list || cli.emit {
        let blocks = match extract_blocks(&document) {
            Ok(blocks) => blocks,
            Err(err) => {
                reporter.directive_error(&err, &document);
                return Ok(false);
            }
        };
        if cli.list {
            list_blocks(&blocks);
        } else {
            emit_units(&document, &blocks);
        }
        return Ok(true);
    }

    let settings = CheckSettings {
        language: config.language(),
        references: config.references(&cli.references),
    };
    let mut compiler = config.compiler()?;

    match check_document(&document, &mut compiler, &settings, &mut RandomIds) {
        Ok(report) => {
            reporter.run_report(&report, &document);
            Ok(report.success())
        }
        Err(err) => {
            reporter.directive_error(&err, &document);
            Ok(false)
        }
    }
}

fn read_document(path: &Path) -> Result<Document, CliError> {
    if !path.exists() {
        return Err(CliError::MissingDocument(path.to_path_buf()));
    }
    Document::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn list_blocks(blocks: &[CodeBlock]) {
    println!("{:>6}  {:<10}  {:<16}  compile", "line", "language", "group");
    for block in blocks {
        println!(
            "{:>6}  {:<10}  {:<16}  {}",
            block.first_line_number(),
            block.language.as_deref().unwrap_or("-"),
            block.config.explicit_group().unwrap_or(mdcompile::group::ANONYMOUS),
            if block.config.compile { "yes" } else { "no" }
        );
    }
}

fn emit_units(document: &Document, blocks: &[CodeBlock]) {
    let mut ids = RandomIds;
    for group in group_blocks(blocks, &mut ids) {
        let units = synthesize_group(document, &group, &mut ids);
        for (block, unit) in group.blocks.iter().zip(&units) {
            println!(
                "// group `{}`, block at line {}",
                group.key.label(),
                block.first_line_number()
            );
            println!("{}", unit.text);
        }
    }
}
