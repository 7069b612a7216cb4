//! Resolution of destination filename collisions.
//!
//! When the chosen output path already exists the user decides what happens:
//! overwrite it, auto-rename to a numbered variant, or cancel the attempt.
//! The presentation layer supplies the decision through [`ConflictPrompt`];
//! this module never touches the filesystem beyond existence checks.

use std::path::{Path, PathBuf};

/// The user's decision for an existing output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
  Overwrite,
  AutoRename,
  Cancel,
}

/// Synchronous query hook called when the output path already exists.
/// Dismissing the prompt is equivalent to answering [`ConflictChoice::Cancel`].
pub trait ConflictPrompt {
  fn ask(&mut self, path: &Path) -> ConflictChoice;
}

/// A fixed decision, for callers that resolved the choice up front
/// (e.g. an `--overwrite` flag).
impl ConflictPrompt for ConflictChoice {
  fn ask(&mut self, _path: &Path) -> ConflictChoice {
    *self
  }
}

/// Result of conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Write to this path. May differ from the requested path after a rename.
  Use(PathBuf),
  /// The user cancelled; nothing is written and nothing is reported.
  Cancelled,
}

/// Resolve `path` against the filesystem.
///
/// A non-existing path is returned unchanged without consulting the prompt.
pub fn resolve(path: &Path, prompt: &mut dyn ConflictPrompt) -> Resolution {
  if !path.exists() {
    return Resolution::Use(path.to_path_buf());
  }

  match prompt.ask(path) {
    ConflictChoice::Overwrite => Resolution::Use(path.to_path_buf()),
    ConflictChoice::AutoRename => Resolution::Use(auto_rename(path)),
    ConflictChoice::Cancel => Resolution::Cancelled,
  }
}

/// First non-existing `{stem}_{n}{ext}` sibling of `path`, with `n` starting
/// at 1.
pub fn auto_rename(path: &Path) -> PathBuf {
  let parent = path.parent().unwrap_or(Path::new(""));
  let stem = path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  let ext = path
    .extension()
    .map(|e| format!(".{}", e.to_string_lossy()))
    .unwrap_or_default();

  let mut counter = 1u32;
  loop {
    let candidate = parent.join(format!("{stem}_{counter}{ext}"));
    if !candidate.exists() {
      return candidate;
    }
    counter += 1;
  }
}
