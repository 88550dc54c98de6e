use anyhow::{Context, Result};
use clap::Args;

use crate::store::CommandStore;

#[derive(Args, Debug)]
pub struct AddCommandArgs {
    /// Shortname to register the command under
    pub name: String,

    /// Full command as executable path plus arguments; may be empty
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn list(store: &CommandStore) -> Result<()> {
    let Some(list) = store.get() else {
        println!("No available commands.");
        return Ok(());
    };
    println!("Available commands:");
    for (name, command) in &list {
        println!("{name}: {command:?}");
    }
    Ok(())
}

pub fn add(args: AddCommandArgs, store: &CommandStore) -> Result<()> {
    // Upsert into whatever is currently persisted; an absent store starts
    // from an empty list. Last writer wins across concurrent invocations.
    let mut list = store.get().unwrap_or_default();
    list.insert(args.name, args.command);
    store.set(&list).context("failed to persist command list")
}

pub fn clear(store: &CommandStore) -> Result<()> {
    store.clear().context("failed to clear command list")
}
