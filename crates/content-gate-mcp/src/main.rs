// crates/content-gate-mcp/src/main.rs
// ============================================================================
// Module: Server Binary
// Description: Command-line entry point for the content-gate server.
// Purpose: Parse arguments, load configuration, and run the server.
// Dependencies: clap, content-gate-mcp, tokio
// ============================================================================

//! ## Overview
//! The `content-gate` binary loads its TOML configuration and runs the MCP
//! server on the configured transport. Errors are reported on stderr with a
//! non-zero exit code; normal shutdown (stdin closing on the stdio
//! transport) exits cleanly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use content_gate_mcp::config::ContentGateConfig;
use content_gate_mcp::server::McpServer;

// ============================================================================
// SECTION: CLI
// ============================================================================

/// MCP action gateway for a headless content platform.
#[derive(Debug, Parser)]
#[command(name = "content-gate", version, about)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the MCP server.
    Serve {
        /// Path to the TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(std::io::stderr(), "content-gate: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Parses arguments and runs the selected subcommand.
async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            config,
        } => {
            let config = ContentGateConfig::load(config.as_deref())
                .map_err(|err| err.to_string())?;
            let server = McpServer::from_config(config).map_err(|err| err.to_string())?;
            server.serve().await.map_err(|err| err.to_string())
        }
    }
}
