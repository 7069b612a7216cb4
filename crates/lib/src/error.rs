//! Error types for a single generation attempt.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between picking a script and saving its MIDI
/// output. A cancelled conflict prompt is not an error; see
/// [`crate::generate::GenerateOutcome::Cancelled`].
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("no script selected")]
  MissingScript,

  #[error("no output path selected")]
  MissingOutput,

  /// The script could not be read, parsed, or its top level raised.
  /// The original Lua error text is preserved.
  #[error("failed to load script '{path}': {source}")]
  Load {
    path: PathBuf,
    #[source]
    source: mlua::Error,
  },

  /// The script's `generate_midi` entry point raised.
  #[error("generate_midi failed: {0}")]
  Script(#[source] mlua::Error),

  /// The interpreter process exited unsuccessfully.
  #[error("script interpreter exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}")))]
  Interpreter { code: Option<i32> },

  /// The interpreter process finished but no new MIDI file appeared in the
  /// script's directory or the working directory.
  #[error("the script finished but produced no new MIDI file")]
  NoOutput,

  #[error("the script did not finish within {0:?}")]
  Timeout(Duration),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
