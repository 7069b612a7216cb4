//! Running a standalone script under an external interpreter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::GenerateError;

/// Run `[interpreter, script]` with the script's directory as working
/// directory and wait for it to finish.
///
/// The child's stdout/stderr are debug-logged only; a failure surfaces as
/// [`GenerateError::Interpreter`] with the exit status. With a `timeout`,
/// an overrunning child is killed and reported as [`GenerateError::Timeout`].
pub async fn run_standalone(
  interpreter: &str,
  script: &Path,
  timeout: Option<Duration>,
) -> Result<(), GenerateError> {
  let workdir = script_workdir(script);
  info!(interpreter, script = %script.display(), "running script as a child process");

  let mut command = Command::new(interpreter);
  command.arg(script).current_dir(&workdir);
  // Dropping the output future on timeout must not leave the child running.
  command.kill_on_drop(true);

  let output = match timeout {
    Some(limit) => tokio::time::timeout(limit, command.output())
      .await
      .map_err(|_| GenerateError::Timeout(limit))?,
    None => command.output().await,
  }?;

  let stderr = String::from_utf8_lossy(&output.stderr);
  let stdout = String::from_utf8_lossy(&output.stdout);
  if !stderr.is_empty() {
    debug!(stderr = %stderr, "script stderr");
  }
  if !stdout.is_empty() {
    debug!(stdout = %stdout, "script stdout");
  }

  if !output.status.success() {
    return Err(GenerateError::Interpreter {
      code: output.status.code(),
    });
  }

  Ok(())
}

fn script_workdir(script: &Path) -> PathBuf {
  match script.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}
