//! CLI module for Reelsmith.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{truncate, Output};

use clap::{Parser, Subcommand};

/// Reelsmith - plan, search, and render narrated short videos with an LLM agent
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "REELSMITH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server exposing /simple and /tools
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a plan for the objective and print its steps
    Plan,

    /// Run the agent loop for the objective and print the conversation
    Agent {
        /// Print the full message history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
