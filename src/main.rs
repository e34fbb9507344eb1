use clap::Parser;

use manage_api::cli::{
    Cli, CommandOutcome, execute_command, init_logger_from_settings, load_and_merge_config,
};
use manage_api::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_and_merge_config(&cli)?;

    // A dry run only prints; it must not install a file logger
    if !cli.is_dry_run() {
        init_logger_from_settings(&settings)?;
    }

    match execute_command(&cli, settings.clone()).await? {
        CommandOutcome::Exit => Ok(()),
        CommandOutcome::StartServer => Server::new(settings).run().await,
    }
}
