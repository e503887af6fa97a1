//! Curator CLI library.
//!
//! This library provides the core functionality for the Curator command-line interface,
//! including configuration management, command execution, output formatting and
//! interactive review of generated records.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod review;
pub mod state;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use state::AppState;
