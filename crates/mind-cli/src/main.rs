//! # mind CLI entry point
//!
//! Parses command-line arguments, initialises tracing and dispatches to
//! the subcommand handler. Running `mind` with no subcommand validates
//! the default entries directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mind_cli::validate::{run_validate, ValidateArgs};

/// MIND thought entry tooling.
///
/// Validates the YAML front matter of thought entries against the
/// thought-entry schema and fails when any entry does not conform.
#[derive(Parser, Debug)]
#[command(name = "mind", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Repository root (default: nearest ancestor containing thoughts/entries).
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Diagnostic log format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate thought entry front matter against the schema.
    Validate(ValidateArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_format);

    let repo_root = match cli.root {
        Some(root) => root,
        None => resolve_repo_root(),
    };
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let result = match cli.command {
        Some(Commands::Validate(args)) => run_validate(&args, &repo_root),
        None => run_validate(&ValidateArgs::default(), &repo_root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Verbosity maps to a level; `RUST_LOG` wins when no `-v` is given.
fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn resolve_repo_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    mind_cli::find_repo_root(&cwd).unwrap_or_else(|| {
        tracing::warn!("could not locate repository root; using current directory");
        cwd
    })
}
