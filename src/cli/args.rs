//! CLI argument definitions using clap
//!
//! Commands:
//! - yangtree check --config <path>
//! - yangtree paths --config <path> --module <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// yangtree - schema-driven data trees for YANG and MIB modules
#[derive(Parser, Debug)]
#[command(name = "yangtree")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and compile every schema descriptor, then list the modules
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./yangtree.json")]
        config: PathBuf,
    },

    /// Print the schema path outline of one module
    Paths {
        /// Path to configuration file
        #[arg(long, default_value = "./yangtree.json")]
        config: PathBuf,

        /// Module name
        #[arg(long)]
        module: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
