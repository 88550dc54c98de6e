pub mod disclaim;
pub mod manage;
pub mod name;
pub mod run;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sado")]
#[command(author, version, about = "A signed app wrapper.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Bundle identifier to scope the command store to, for invocations made
    /// from inside an app bundle. Standalone invocations use the shared suite.
    #[arg(long, hide = true, env = "SADO_BUNDLE_ID")]
    pub bundle_id: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the given executable under our context
    Run(run::RunArgs),

    /// Run the following command after disclaiming responsibility
    Disclaim(disclaim::DisclaimArgs),

    /// List all allowed commands to run
    ListCommands,

    /// Add to the list of commands
    AddCommand(manage::AddCommandArgs),

    /// Clear the user-managed list of commands
    ClearCommands,

    /// Run the executable registered under a shortname (the default)
    #[command(external_subcommand)]
    Name(Vec<String>),
}
