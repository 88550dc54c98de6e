use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::launch::Disclaimer;

#[derive(Args, Debug)]
pub struct DisclaimArgs {
    /// Absolute path of the executable
    pub executable: String,

    /// Additional arguments to the executable
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Disclaim responsibility and exec. Deliberately performs no allow-list
/// check: this path grants none of our privileges to the child, and gating
/// it would make it useless for testing, which is what it exists for.
pub fn run(args: DisclaimArgs, disclaimer: &dyn Disclaimer) -> Result<()> {
    info!(executable = %args.executable, args = ?args.args, "disclaim");

    let argv: Vec<String> = std::iter::once(args.executable.clone())
        .chain(args.args.iter().cloned())
        .collect();
    match disclaimer.disclaim_and_exec(&args.executable, &argv) {
        Ok(never) => match never {},
        Err(err) => Err(err.into()),
    }
}
