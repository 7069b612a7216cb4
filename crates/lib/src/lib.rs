//! midigen-lib: Core logic for midigen
//!
//! This crate implements everything behind the `midigen` binary:
//! - `conflict`: resolving destination collisions (overwrite / rename / cancel)
//! - `script`: loading Lua scripts and probing for the `generate_midi` entry point
//! - `generate`: the orchestrator plus both execution strategies
//! - `config`: persisted user defaults
//! - `reveal`: opening the saved file's folder in the host file browser

pub mod config;
pub mod conflict;
pub mod error;
pub mod generate;
pub mod reveal;
pub mod script;
