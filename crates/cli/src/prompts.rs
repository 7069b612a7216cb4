use std::io::{self, IsTerminal, Write};
use std::path::Path;

use midigen_lib::conflict::{ConflictChoice, ConflictPrompt};

/// Interactive tri-state prompt for an existing output file.
///
/// `--overwrite` / `--auto-rename` pre-resolve the choice without prompting.
/// In a non-interactive session an unresolved conflict counts as a dismissal,
/// which is a cancel.
pub struct CliConflictPrompt {
  overwrite: bool,
  auto_rename: bool,
}

impl CliConflictPrompt {
  pub fn new(overwrite: bool, auto_rename: bool) -> Self {
    Self {
      overwrite,
      auto_rename,
    }
  }
}

impl ConflictPrompt for CliConflictPrompt {
  fn ask(&mut self, path: &Path) -> ConflictChoice {
    if self.overwrite {
      return ConflictChoice::Overwrite;
    }
    if self.auto_rename {
      return ConflictChoice::AutoRename;
    }

    if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
      return ConflictChoice::Cancel;
    }

    loop {
      let _ = write!(
        io::stderr(),
        "'{}' already exists. [o]verwrite, [r]ename, [c]ancel? ",
        path.display()
      );
      let _ = io::stderr().flush();

      let mut input = String::new();
      // EOF counts as a dismissal.
      if io::stdin().read_line(&mut input).is_err() || input.is_empty() {
        return ConflictChoice::Cancel;
      }

      match input.trim().to_ascii_lowercase().as_str() {
        "o" | "overwrite" => return ConflictChoice::Overwrite,
        "r" | "rename" => return ConflictChoice::AutoRename,
        "c" | "cancel" | "" => return ConflictChoice::Cancel,
        _ => {}
      }
    }
  }
}
