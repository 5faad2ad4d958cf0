//! depcache command-line interface.

mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use depcache_lib::config::Project;

use crate::output::OutputFormat;

/// depcache - Import dependency cache for incremental builds
#[derive(Parser)]
#[command(name = "depcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project root (default: current directory)
  #[arg(short = 'C', long = "root", global = true, default_value = ".")]
  root: PathBuf,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Bring dependency artifacts up to date
  Build {
    /// Source files, relative to the project root (default: every known source)
    files: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Print the imports of a source file
  Deps {
    /// Source file, relative to the project root
    file: PathBuf,

    /// Print the full transitive closure instead of direct imports
    #[arg(short, long)]
    transitive: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Remove artifacts whose source file no longer exists
  Gc {
    /// Show what would be removed without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show project and cache status
  Status {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  init_logging(cli.verbose);

  let project =
    Project::load(&cli.root).with_context(|| format!("Failed to load project at {}", cli.root.display()))?;
  debug!(
    root = %project.root().display(),
    output_root = %project.output_root().display(),
    "project loaded"
  );

  match cli.command {
    Commands::Build { files, output } => cmd::cmd_build(&project, &files, output),
    Commands::Deps {
      file,
      transitive,
      output,
    } => cmd::cmd_deps(&project, &file, transitive, output),
    Commands::Gc { dry_run, output } => cmd::cmd_gc(&project, dry_run, output),
    Commands::Status { output } => cmd::cmd_status(&project, output),
  }
}

/// Logs go to stderr. `RUST_LOG` is honored unless `-v` forces debug.
fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
