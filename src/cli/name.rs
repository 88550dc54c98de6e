use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use crate::launch::{self, Disclaimer, Launcher};
use crate::store::{CommandStore, LookupError};

/// The default subcommand: `sado <name> [--claim]`.
///
/// Arrives as clap's external-subcommand token capture and is re-parsed here
/// so flag handling stays inside clap.
#[derive(Parser, Debug)]
#[command(name = "sado", no_binary_name = true)]
pub struct NameArgs {
    /// Re-spawn first so this process becomes the responsible one
    #[arg(long)]
    pub claim: bool,

    /// Registered shortname of the command to run
    pub name: String,
}

pub fn run(
    tokens: Vec<String>,
    store: &CommandStore,
    launcher: &dyn Launcher,
    disclaimer: &dyn Disclaimer,
) -> Result<()> {
    let args = NameArgs::try_parse_from(tokens)?;
    if args.claim {
        return Err(launch::claim_self(disclaimer).into());
    }

    let (executable, command_args) = match store.lookup(&args.name) {
        Ok(command) => command,
        Err(err @ LookupError::Missing(_)) => {
            error!(name = %args.name, "was asked to run a command that does not exist");
            eprintln!("{err}");
            return Ok(());
        }
        Err(err @ LookupError::Empty(_)) => {
            info!(name = %args.name, "command was empty");
            eprintln!("{err}");
            return Ok(());
        }
    };

    // Lookup by registered name is itself the authorization; there is no
    // second validation pass here.
    match launcher.exec(&executable, &command_args) {
        Ok(never) => match never {},
        Err(err) => Err(err.into()),
    }
}
