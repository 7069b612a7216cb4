use std::path::Path;

use mlua::prelude::*;
use tracing::debug;

/// Create a new Lua runtime for evaluating a user script.
/// Adds the script's directory to `package.path` so scripts can `require`
/// their neighbors, and registers a `midigen` global table.
pub fn create_runtime(script_dir: &Path) -> LuaResult<Lua> {
  let lua = Lua::new();

  let dir = script_dir.to_string_lossy().replace('\\', "/");

  let package = lua.globals().get::<LuaTable>("package")?;
  let current_path: String = package.get("path")?;
  package.set("path", format!("{dir}/?.lua;{dir}/?/init.lua;{current_path}"))?;

  let midigen = lua.create_table()?;
  midigen.set("version", env!("CARGO_PKG_VERSION"))?;
  midigen.set("dir", dir.as_str())?;
  lua.globals().set("midigen", midigen)?;

  debug!(dir = %dir, "created script runtime");
  Ok(lua)
}
