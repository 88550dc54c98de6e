use anyhow::Result;
use clap::Parser;

use sado::cli::{Cli, Commands, disclaim, manage, name, run};
use sado::launch::{DisclaimSpawner, ExecLauncher};
use sado::store::{CommandStore, StoreScope};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let scope = match cli.bundle_id {
        Some(identifier) => StoreScope::Bundle { identifier },
        None => StoreScope::SharedSuite,
    };
    let store = CommandStore::new(scope)?;
    let launcher = ExecLauncher;
    let disclaimer = DisclaimSpawner;

    match cli.command {
        Commands::Run(args) => run::run(args, &store, &launcher, &disclaimer),
        Commands::Disclaim(args) => disclaim::run(args, &disclaimer),
        Commands::ListCommands => manage::list(&store),
        Commands::AddCommand(args) => manage::add(args, &store),
        Commands::ClearCommands => manage::clear(&store),
        Commands::Name(tokens) => name::run(tokens, &store, &launcher, &disclaimer),
    }
}
