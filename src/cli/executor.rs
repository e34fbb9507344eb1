//! Command executor for dispatching CLI commands

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;

/// What `main` should do after a command has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Start the HTTP server with the merged settings
    StartServer,
    /// Nothing left to do
    Exit,
}

/// Execute a CLI command with the given settings
///
/// `serve --dry-run` is handled here; starting the server is left to the
/// caller so that the runtime owns the listener.
///
/// # Errors
/// Returns errors from command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<CommandOutcome> {
    match &cli.command {
        Some(Commands::Serve {
            host, port, dry_run, ..
        }) => {
            warn_on_privileged_bind(host.as_deref(), *port);
            if *dry_run {
                ServeCommandHandler::new(settings).validate_only()?;
                return Ok(CommandOutcome::Exit);
            }
            Ok(CommandOutcome::StartServer)
        }
        None => Ok(CommandOutcome::StartServer),
    }
}

fn warn_on_privileged_bind(host: Option<&str>, port: Option<u16>) {
    if let (Some(host), Some(port)) = (host, port)
        && port < 1024
        && host == "0.0.0.0"
    {
        eprintln!("Warning: Binding to 0.0.0.0 on port {port} requires root privileges");
    }
}
