//! Implementation of the `midigen config` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use midigen_lib::config::Config;

use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommand {
  /// Print the persisted defaults
  Show,

  /// Set the default output folder for generated MIDI files
  SetOutputDir {
    /// Folder that generated files land in when --output is omitted
    dir: PathBuf,
  },
}

pub fn cmd_config(command: ConfigCommand) -> Result<()> {
  let path = Config::default_path();

  match command {
    ConfigCommand::Show => {
      let config = Config::load(&path).context("Failed to read config")?;
      output::print_info(&format!("config file: {}", path.display()));
      match config.default_output_dir {
        Some(dir) => output::print_stat("default output dir", &dir.display().to_string()),
        None => output::print_stat("default output dir", "(not set)"),
      }
      Ok(())
    }
    ConfigCommand::SetOutputDir { dir } => {
      let mut config = Config::load(&path).context("Failed to read config")?;
      config.default_output_dir = Some(dir.clone());
      config.save(&path).context("Failed to write config")?;
      output::print_success(&format!("default output dir set to {}", dir.display()));
      Ok(())
    }
  }
}
