//! CLI command definitions for the `gemchat` binary.
//!
//! Uses clap derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with Google Gemini from your browser.
#[derive(Parser)]
#[command(name = "gemchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to config.toml (defaults to ~/.gemchat/config.toml).
    #[arg(long, global = true, env = "GEMCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat web app.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host address to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["gemchat", "-v", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["gemchat", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Bash }));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
