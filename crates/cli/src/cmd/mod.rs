mod config;
mod generate;

pub use config::{ConfigCommand, cmd_config};
pub use generate::{GenerateArgs, cmd_generate};
