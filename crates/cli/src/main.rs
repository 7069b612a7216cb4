use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;
mod prompts;

use midigen_lib::generate::DEFAULT_INTERPRETER;

/// midigen - run a Lua script and save the MIDI file it produces
#[derive(Parser)]
#[command(name = "midigen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a script and save the resulting MIDI file
  Generate {
    /// Path to the Lua script
    script: PathBuf,

    /// Output MIDI file path (default: "<default output dir>/<script>.mid")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite an existing output file without prompting
    #[arg(long, conflicts_with = "auto_rename")]
    overwrite: bool,

    /// Auto-rename next to an existing output file without prompting
    #[arg(long)]
    auto_rename: bool,

    /// Interpreter for scripts without a generate_midi entry point
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    interpreter: String,

    /// Give up if the script process runs longer than this (e.g. "30s")
    #[arg(long)]
    timeout: Option<humantime::Duration>,

    /// Open the destination folder after a successful save
    #[arg(long)]
    reveal: bool,
  },

  /// Show or change persisted defaults
  #[command(subcommand)]
  Config(cmd::ConfigCommand),
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Generate {
      script,
      output,
      overwrite,
      auto_rename,
      interpreter,
      timeout,
      reveal,
    } => cmd::cmd_generate(cmd::GenerateArgs {
      script,
      output,
      overwrite,
      auto_rename,
      interpreter,
      timeout: timeout.map(Into::into),
      reveal,
    }),
    Commands::Config(command) => cmd::cmd_config(command),
  }
}
