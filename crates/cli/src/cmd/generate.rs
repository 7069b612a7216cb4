//! Implementation of the `midigen generate` command.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use tracing::info;

use midigen_lib::config::Config;
use midigen_lib::error::GenerateError;
use midigen_lib::generate::{GenerateOutcome, GenerateRequest, generate};
use midigen_lib::reveal;

use crate::output;
use crate::prompts::CliConflictPrompt;

pub struct GenerateArgs {
  pub script: PathBuf,
  pub output: Option<PathBuf>,
  pub overwrite: bool,
  pub auto_rename: bool,
  pub interpreter: String,
  pub timeout: Option<Duration>,
  pub reveal: bool,
}

// GenerateError holds mlua::Error, which is not Send + Sync, so it cannot
// cross into anyhow directly.
fn map_generate_err<T>(result: Result<T, GenerateError>) -> Result<T> {
  result.map_err(|e| anyhow::anyhow!("{}", e))
}

/// Execute the generate command: resolve the output path (falling back to the
/// configured default folder), run the attempt, and report the result.
pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
  let script = dunce::canonicalize(&args.script)
    .with_context(|| format!("script not found: {}", args.script.display()))?;

  let output_path = match args.output {
    Some(path) => path,
    None => {
      let config = Config::load(&Config::default_path()).context("Failed to read config")?;
      match config.output_for_script(&script) {
        Some(path) => path,
        None => bail!(
          "no --output given and no default output folder configured; \
           run `midigen config set-output-dir <dir>` or pass --output"
        ),
      }
    }
  };

  let mut request = GenerateRequest::new(script, output_path);
  request.interpreter = args.interpreter;
  request.timeout = args.timeout;

  let mut prompt = CliConflictPrompt::new(args.overwrite, args.auto_rename);

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = map_generate_err(rt.block_on(generate(&request, &mut prompt)))?;

  match outcome {
    GenerateOutcome::Cancelled => {
      // User-initiated, not a failure: stay quiet.
      info!("cancelled");
      Ok(())
    }
    GenerateOutcome::Saved(path) => {
      output::print_success(&format!(
        "MIDI saved to {} in {}",
        path.display(),
        output::format_duration(started.elapsed())
      ));

      if args.reveal {
        if let Some(dir) = path.parent() {
          if let Err(e) = reveal::reveal(dir) {
            output::print_warning(&format!("could not open {}: {}", dir.display(), e));
          }
        }
      }
      Ok(())
    }
  }
}
