//! Output location for the subprocess strategy.
//!
//! A standalone script writes its MIDI file wherever it pleases, so the only
//! way to find the output is to snapshot the candidate directories before and
//! after execution and look at what appeared.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Extension of the files the locator watches for.
pub const MIDI_EXT: &str = "mid";

/// A point-in-time set of `*.mid` paths across a group of directories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
  files: BTreeSet<PathBuf>,
}

impl DirectorySnapshot {
  /// Capture the union of MIDI files in `dirs`. A directory that cannot be
  /// read counts as empty.
  pub fn capture<'a, I>(dirs: I) -> Self
  where
    I: IntoIterator<Item = &'a Path>,
  {
    let mut files = BTreeSet::new();
    for dir in dirs {
      let Ok(entries) = std::fs::read_dir(dir) else {
        debug!(dir = %dir.display(), "skipping unreadable directory");
        continue;
      };
      for entry in entries.flatten() {
        let path = entry.path();
        if is_midi_file(&path) {
          files.insert(path);
        }
      }
    }
    Self { files }
  }

  /// Files present in `after` but not in `self`.
  pub fn new_files(&self, after: &DirectorySnapshot) -> Vec<PathBuf> {
    after.files.difference(&self.files).cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

fn is_midi_file(path: &Path) -> bool {
  path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case(MIDI_EXT))
    && path.is_file()
}

/// Pick the file the script most plausibly just wrote.
///
/// With several candidates the most recently modified wins; `new_files`
/// arrives sorted and `max_by_key` keeps the last maximum, so equal mtimes
/// fall back to the lexicographically last path. Deterministic either way.
pub fn pick_produced_file(new_files: Vec<PathBuf>) -> Option<PathBuf> {
  new_files
    .into_iter()
    .max_by_key(|path| std::fs::metadata(path).and_then(|m| m.modified()).ok())
}
