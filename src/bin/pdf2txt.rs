//! CLI binary for pdf2txt.
//!
//! A thin host: global flags and logging live here, and every subcommand is
//! a [`Command`] registered onto the root parser and dispatched by name.

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use pdf2txt::command::{Command, ExtractCommand};
use std::io;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Whole document to stdout
  pdf2txt extract report.pdf

  # Pages 1 to 4
  pdf2txt extract report.pdf -p 1-4

  # Union of ranges
  pdf2txt extract report.pdf -p 1-3 7

  # From a URL (cached for 24h)
  pdf2txt extract https://example.com/paper.pdf -o paper.txt

  # JSON with per-page text and cache outcome
  pdf2txt extract https://example.com/paper.pdf --json

ENVIRONMENT VARIABLES:
  PDF2TXT_CACHE_DIR         Directory for cached downloads
  PDF2TXT_CACHE_TTL_HOURS   Freshness window for cached downloads
  PDF2TXT_DOWNLOAD_TIMEOUT  HTTP download timeout in seconds
  PDFIUM_LIB_PATH           Path to an existing libpdfium
  RUST_LOG                  Overrides the log filter
"#;

/// Extract plain text from PDF files and URLs.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2txt",
    version,
    about = "Extract plain text from PDF files and URLs",
    arg_required_else_help = true,
    subcommand_required = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2TXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDF2TXT_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, global = true, env = "PDF2TXT_NO_PROGRESS")]
    no_progress: bool,
}

/// Build the command list; global flags decide how each command reports.
fn commands(show_progress: bool) -> Vec<Box<dyn Command>> {
    vec![Box::new(ExtractCommand::new(show_progress))]
}

/// Root parser with every command's subcommand registered on it.
fn root_command(commands: &[Box<dyn Command>]) -> clap::Command {
    commands
        .iter()
        .fold(Cli::command(), |root, cmd| cmd.register(root))
}

fn find_command<'a>(commands: &'a [Box<dyn Command>], name: &str) -> Result<&'a dyn Command> {
    commands
        .iter()
        .find(|c| c.name() == name)
        .map(|c| &**c)
        .with_context(|| format!("Unknown subcommand '{name}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = root_command(&commands(false)).get_matches();
    let cli = Cli::from_arg_matches(&matches).context("Invalid arguments")?;

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers the quiet stretch of an extraction; library INFO
    // lines would tear it, so they are only shown without it.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Dispatch ─────────────────────────────────────────────────────────
    let (name, sub_matches) = matches
        .subcommand()
        .context("No subcommand given")?;
    let commands = commands(show_progress && !cli.verbose);
    find_command(&commands, name)?.execute(sub_matches).await
}
