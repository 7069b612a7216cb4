//! Script loading and capability probing.
//!
//! A script is one of two shapes, and the user is not asked to know which:
//! a library that exposes a `generate_midi(path)` function (either returned
//! in a module table or defined as a global), or a standalone program that
//! writes a MIDI file somewhere when run. The probe happens after the chunk
//! has executed, so a script's top level runs with the host's privileges.
//! That is the original tool's trust model, kept on purpose.

use std::path::{Path, PathBuf};

use mlua::prelude::*;
use tracing::debug;

use crate::error::GenerateError;

/// Name of the entry point a library-shaped script exposes.
pub const ENTRY_POINT: &str = "generate_midi";

/// A loaded script, dispatched on the result of the capability probe.
pub enum LoadedScript {
  /// The script exposes `generate_midi`; invoke it in-process.
  Library { entry: LuaFunction },
  /// No entry point; run the script as a child process and diff directories.
  Standalone { path: PathBuf },
}

/// Read and execute the script at `path`, then probe for [`ENTRY_POINT`].
///
/// Parse errors and top-level raises become [`GenerateError::Load`] with the
/// original Lua message preserved.
pub fn load_script(lua: &Lua, path: &Path) -> Result<LoadedScript, GenerateError> {
  let load_err = |source: LuaError| GenerateError::Load {
    path: path.to_path_buf(),
    source,
  };

  let source = std::fs::read_to_string(path)
    .map_err(|e| load_err(LuaError::external(format!("cannot read '{}': {e}", path.display()))))?;

  let value = lua
    .load(&source)
    .set_name(format!("@{}", path.display()))
    .eval::<LuaValue>()
    .map_err(load_err)?;

  if let LuaValue::Table(module) = &value {
    if let Ok(entry) = module.get::<LuaFunction>(ENTRY_POINT) {
      debug!(path = %path.display(), "script module exposes {ENTRY_POINT}");
      return Ok(LoadedScript::Library { entry });
    }
  }

  if let Ok(entry) = lua.globals().get::<LuaFunction>(ENTRY_POINT) {
    debug!(path = %path.display(), "script defines global {ENTRY_POINT}");
    return Ok(LoadedScript::Library { entry });
  }

  debug!(path = %path.display(), "no {ENTRY_POINT} entry point, treating as standalone");
  Ok(LoadedScript::Standalone {
    path: path.to_path_buf(),
  })
}
