//! CLI module
//!
//! Provides command-line interface for:
//! - check: compile every schema descriptor in the configured directory
//! - paths: print one module's schema outline

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, paths, run, run_command, Config};
pub use errors::{CliError, CliResult};
pub use io::{write_error, write_response};
