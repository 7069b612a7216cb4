//! Persisted user defaults.
//!
//! A single JSON object at a well-known location. The core only cares about
//! the default output folder; everything else about the file is the CLI's
//! business.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generate::locate::MIDI_EXT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("malformed config: {0}")]
  Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Folder that generated MIDI files land in when no explicit output path
  /// is given.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default_output_dir: Option<PathBuf>,
}

impl Config {
  /// Well-known config location. `MIDIGEN_CONFIG` overrides it, which the
  /// tests rely on.
  pub fn default_path() -> PathBuf {
    if let Some(path) = std::env::var_os("MIDIGEN_CONFIG") {
      return PathBuf::from(path);
    }
    dirs::config_dir()
      .unwrap_or_else(|| PathBuf::from("."))
      .join("midigen")
      .join("config.json")
  }

  /// Load the config, treating a missing file as defaults.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    match std::fs::read_to_string(path) {
      Ok(text) => Ok(serde_json::from_str(&text)?),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        Ok(Self::default())
      }
      Err(e) => Err(e.into()),
    }
  }

  pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Default output path for `script`: `<default_output_dir>/<stem>.mid`.
  /// None when no default folder is configured.
  pub fn output_for_script(&self, script: &Path) -> Option<PathBuf> {
    let dir = self.default_output_dir.as_ref()?;
    let stem = script.file_stem()?;
    Some(dir.join(format!("{}.{MIDI_EXT}", stem.to_string_lossy())))
  }
}
