//! One generation attempt, end to end.
//!
//! The flow is strictly linear: validate inputs, resolve a destination
//! conflict, load the script, then dispatch on its shape. A library script
//! writes the output itself through its `generate_midi` entry point; a
//! standalone script runs as a child process and the locator diffs the
//! candidate directories to find what it produced.

pub mod locate;
pub mod subprocess;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::conflict::{self, ConflictPrompt, Resolution};
use crate::error::GenerateError;
use crate::script::{self, LoadedScript};

/// Interpreter used for standalone scripts unless the caller overrides it.
pub const DEFAULT_INTERPRETER: &str = "lua";

/// Everything needed for one attempt. Nothing here outlives the call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
  pub script: PathBuf,
  pub output: PathBuf,
  pub interpreter: String,
  pub timeout: Option<Duration>,
}

impl GenerateRequest {
  pub fn new(script: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
    Self {
      script: script.into(),
      output: output.into(),
      interpreter: DEFAULT_INTERPRETER.to_string(),
      timeout: None,
    }
  }
}

/// How an attempt ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
  /// The MIDI file was saved here (the conflict-resolved path).
  Saved(PathBuf),
  /// The user cancelled at the conflict prompt. Silent, not a failure.
  Cancelled,
}

/// Run one generation attempt.
///
/// `prompt` is consulted only if `request.output` already exists. On any
/// error before the finalize step the destination is left untouched; in
/// particular a load failure creates no directories.
pub async fn generate(
  request: &GenerateRequest,
  prompt: &mut dyn ConflictPrompt,
) -> Result<GenerateOutcome, GenerateError> {
  if request.script.as_os_str().is_empty() {
    return Err(GenerateError::MissingScript);
  }
  if request.output.as_os_str().is_empty() {
    return Err(GenerateError::MissingOutput);
  }

  let output = match conflict::resolve(&request.output, prompt) {
    Resolution::Use(path) => path,
    Resolution::Cancelled => {
      debug!("cancelled at conflict prompt");
      return Ok(GenerateOutcome::Cancelled);
    }
  };

  let script_dir = parent_dir(&request.script);
  let lua = script::create_runtime(&script_dir).map_err(|source| GenerateError::Load {
    path: request.script.clone(),
    source,
  })?;

  match script::load_script(&lua, &request.script)? {
    LoadedScript::Library { entry } => {
      debug!("direct strategy: calling {} in-process", script::ENTRY_POINT);
      ensure_parent_dir(&output)?;
      entry
        .call::<()>(output.to_string_lossy().into_owned())
        .map_err(GenerateError::Script)?;
    }
    LoadedScript::Standalone { path } => {
      debug!(script = %path.display(), "subprocess strategy: no {} entry point", script::ENTRY_POINT);
      let cwd = std::env::current_dir()?;
      let search_dirs = [script_dir.as_path(), cwd.as_path()];

      let before = locate::DirectorySnapshot::capture(search_dirs);
      subprocess::run_standalone(&request.interpreter, &path, request.timeout).await?;
      let after = locate::DirectorySnapshot::capture(search_dirs);

      let produced =
        locate::pick_produced_file(before.new_files(&after)).ok_or(GenerateError::NoOutput)?;
      debug!(produced = %produced.display(), "located script output");

      ensure_parent_dir(&output)?;
      move_file(&produced, &output)?;
    }
  }

  info!(output = %output.display(), "MIDI file saved");
  Ok(GenerateOutcome::Saved(output))
}

fn parent_dir(path: &Path) -> PathBuf {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent)?;
    }
  }
  Ok(())
}

/// Move `from` to `to`, replacing `to` if present. Rename does not cross
/// filesystems, so fall back to copy + remove.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
  match std::fs::rename(from, to) {
    Ok(()) => Ok(()),
    Err(_) => {
      std::fs::copy(from, to)?;
      std::fs::remove_file(from)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::conflict::ConflictChoice;
  use std::path::Path;
  use tempfile::TempDir;

  /// Prompt that fails the test if it is ever consulted.
  struct NoPrompt;

  impl ConflictPrompt for NoPrompt {
    fn ask(&mut self, path: &Path) -> ConflictChoice {
      panic!("prompt shown for {}", path.display());
    }
  }

  fn write_script(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("gen.lua");
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Library script that writes its argument path.
  fn library_script(dir: &Path) -> PathBuf {
    write_script(
      dir,
      r#"
        local M = {}
        function M.generate_midi(path)
          local f = assert(io.open(path, "wb"))
          f:write("MThd")
          f:close()
        end
        return M
      "#,
    )
  }

  #[cfg(unix)]
  fn write_executable(dir: &Path, name: &str, content: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  #[tokio::test]
  async fn direct_strategy_end_to_end() {
    let temp = TempDir::new().unwrap();
    let script = library_script(temp.path());
    let output = temp.path().join("out.mid");

    let outcome = generate(&GenerateRequest::new(&script, &output), &mut NoPrompt)
      .await
      .unwrap();

    assert_eq!(outcome, GenerateOutcome::Saved(output.clone()));
    assert_eq!(std::fs::read(&output).unwrap(), b"MThd");
  }

  #[tokio::test]
  async fn direct_strategy_creates_destination_dirs() {
    let temp = TempDir::new().unwrap();
    let script = library_script(temp.path());
    let output = temp.path().join("nested").join("deep").join("out.mid");

    generate(&GenerateRequest::new(&script, &output), &mut NoPrompt)
      .await
      .unwrap();

    assert!(output.exists());
  }

  #[tokio::test]
  async fn global_entry_point_uses_direct_strategy() {
    let temp = TempDir::new().unwrap();
    let script = write_script(
      temp.path(),
      r#"
        function generate_midi(path)
          local f = assert(io.open(path, "wb"))
          f:write("MThd")
          f:close()
        end
      "#,
    );
    let output = temp.path().join("out.mid");

    let outcome = generate(&GenerateRequest::new(&script, &output), &mut NoPrompt)
      .await
      .unwrap();

    assert_eq!(outcome, GenerateOutcome::Saved(output));
  }

  #[tokio::test]
  async fn empty_script_path_is_validation_error() {
    let request = GenerateRequest::new("", "out.mid");
    let result = generate(&request, &mut NoPrompt).await;

    assert!(matches!(result, Err(GenerateError::MissingScript)));
  }

  #[tokio::test]
  async fn empty_output_path_is_validation_error() {
    let request = GenerateRequest::new("gen.lua", "");
    let result = generate(&request, &mut NoPrompt).await;

    assert!(matches!(result, Err(GenerateError::MissingOutput)));
  }

  #[tokio::test]
  async fn cancel_leaves_existing_file_untouched() {
    let temp = TempDir::new().unwrap();
    let script = library_script(temp.path());
    let output = temp.path().join("out.mid");
    std::fs::write(&output, b"original").unwrap();

    let outcome = generate(
      &GenerateRequest::new(&script, &output),
      &mut ConflictChoice::Cancel,
    )
    .await
    .unwrap();

    assert_eq!(outcome, GenerateOutcome::Cancelled);
    assert_eq!(std::fs::read(&output).unwrap(), b"original");
  }

  #[tokio::test]
  async fn auto_rename_saves_next_free_variant() {
    let temp = TempDir::new().unwrap();
    let script = library_script(temp.path());
    let output = temp.path().join("base.mid");
    for name in ["base.mid", "base_1.mid", "base_2.mid"] {
      std::fs::write(temp.path().join(name), b"x").unwrap();
    }

    let outcome = generate(
      &GenerateRequest::new(&script, &output),
      &mut ConflictChoice::AutoRename,
    )
    .await
    .unwrap();

    assert_eq!(outcome, GenerateOutcome::Saved(temp.path().join("base_3.mid")));
    assert_eq!(std::fs::read(temp.path().join("base_3.mid")).unwrap(), b"MThd");
  }

  #[tokio::test]
  async fn overwrite_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let script = library_script(temp.path());
    let output = temp.path().join("out.mid");
    std::fs::write(&output, b"stale").unwrap();

    generate(
      &GenerateRequest::new(&script, &output),
      &mut ConflictChoice::Overwrite,
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"MThd");
  }

  #[tokio::test]
  async fn load_error_creates_no_destination_dirs() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "this is not valid lua {{{");
    let output = temp.path().join("fresh_dir").join("out.mid");

    let result = generate(&GenerateRequest::new(&script, &output), &mut NoPrompt).await;

    assert!(matches!(result, Err(GenerateError::Load { .. })));
    assert!(!temp.path().join("fresh_dir").exists());
  }

  #[tokio::test]
  async fn entry_point_raise_is_script_error() {
    let temp = TempDir::new().unwrap();
    let script = write_script(
      temp.path(),
      r#"
        local M = {}
        function M.generate_midi(path)
          error("synth exploded")
        end
        return M
      "#,
    );
    let output = temp.path().join("out.mid");

    let result = generate(&GenerateRequest::new(&script, &output), &mut NoPrompt).await;

    let err = result.err().expect("generation should fail");
    assert!(matches!(err, GenerateError::Script(_)));
    assert!(err.to_string().contains("synth exploded"));
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn subprocess_strategy_moves_produced_file() {
    let scripts = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let script = write_script(scripts.path(), "local standalone = true");
    let interpreter = write_executable(
      scripts.path(),
      "fake-lua",
      "#!/bin/sh\nprintf 'MThd' > produced.mid\n",
    );
    let output = dest.path().join("out.mid");

    let mut request = GenerateRequest::new(&script, &output);
    request.interpreter = interpreter.to_string_lossy().into_owned();
    let outcome = generate(&request, &mut NoPrompt).await.unwrap();

    assert_eq!(outcome, GenerateOutcome::Saved(output.clone()));
    assert_eq!(std::fs::read(&output).unwrap(), b"MThd");
    // Moved, not copied.
    assert!(!scripts.path().join("produced.mid").exists());
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn subprocess_without_output_fails_and_moves_nothing() {
    let scripts = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let script = write_script(scripts.path(), "local standalone = true");
    let interpreter = write_executable(scripts.path(), "fake-lua", "#!/bin/sh\nexit 0\n");
    let output = dest.path().join("out.mid");

    let mut request = GenerateRequest::new(&script, &output);
    request.interpreter = interpreter.to_string_lossy().into_owned();
    let result = generate(&request, &mut NoPrompt).await;

    assert!(matches!(result, Err(GenerateError::NoOutput)));
    assert!(!output.exists());
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn subprocess_ignores_preexisting_midi_files() {
    let scripts = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    std::fs::write(scripts.path().join("already.mid"), b"old").unwrap();
    let script = write_script(scripts.path(), "local standalone = true");
    let interpreter = write_executable(
      scripts.path(),
      "fake-lua",
      "#!/bin/sh\nprintf 'MThd' > produced.mid\n",
    );
    let output = dest.path().join("out.mid");

    let mut request = GenerateRequest::new(&script, &output);
    request.interpreter = interpreter.to_string_lossy().into_owned();
    generate(&request, &mut NoPrompt).await.unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), b"MThd");
    assert!(scripts.path().join("already.mid").exists());
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn failing_interpreter_surfaces_exit_code() {
    let scripts = TempDir::new().unwrap();
    let script = write_script(scripts.path(), "local standalone = true");
    let interpreter = write_executable(scripts.path(), "fake-lua", "#!/bin/sh\nexit 7\n");
    let output = scripts.path().join("out.mid");

    let mut request = GenerateRequest::new(&script, &output);
    request.interpreter = interpreter.to_string_lossy().into_owned();
    let result = generate(&request, &mut NoPrompt).await;

    assert!(matches!(result, Err(GenerateError::Interpreter { code: Some(7) })));
  }
}
