//! Opening the destination folder in the host file browser.

use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(all(unix, not(target_os = "macos")))]
const OPENER: &str = "xdg-open";

/// Spawn the platform file browser on `dir` without waiting for it.
pub fn reveal(dir: &Path) -> io::Result<()> {
  debug!(dir = %dir.display(), opener = OPENER, "opening folder");
  Command::new(OPENER).arg(dir).spawn().map(|_| ())
}
