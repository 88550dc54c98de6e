use anyhow::Result;
use clap::Args;
use tracing::{error, info};

use crate::launch::{self, Disclaimer, Launcher};
use crate::store::CommandStore;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Re-spawn first so this process becomes the responsible one
    #[arg(long)]
    pub claim: bool,

    /// Absolute path of the executable
    pub executable: String,

    /// Additional arguments to the executable
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn run(
    args: RunArgs,
    store: &CommandStore,
    launcher: &dyn Launcher,
    disclaimer: &dyn Disclaimer,
) -> Result<()> {
    if args.claim {
        return Err(launch::claim_self(disclaimer).into());
    }
    info!(executable = %args.executable, args = ?args.args, "run");

    // First, perform permissions checking against the full invocation.
    let command: Vec<String> = std::iter::once(args.executable.clone())
        .chain(args.args.iter().cloned())
        .collect();
    if !store.is_valid(&command) {
        error!(command = ?command, "unable to run command");
        eprintln!("`{command:?}` is not a valid command");
        return Ok(());
    }

    match launcher.exec(&args.executable, &args.args) {
        Ok(never) => match never {},
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::testing::{RecordingDisclaimer, RecordingLauncher};
    use crate::store::{CommandList, Defaults};

    fn temp_store() -> (tempfile::TempDir, CommandStore) {
        let dir = tempfile::tempdir().unwrap();
        let defaults = Defaults::at_path(dir.path().join("suite.json"));
        (dir, CommandStore::with_defaults(defaults))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run_args(executable: &str, args: &[&str]) -> RunArgs {
        RunArgs {
            claim: false,
            executable: executable.to_string(),
            args: strings(args),
        }
    }

    #[test]
    fn test_run_unrestricted_store_execs() {
        let (_dir, store) = temp_store();
        let launcher = RecordingLauncher::default();
        let disclaimer = RecordingDisclaimer::default();

        let result = run(run_args("/bin/ls", &["-la"]), &store, &launcher, &disclaimer);
        // The recording launcher "fails" the exec, which surfaces as an error.
        assert!(result.is_err());
        assert_eq!(
            launcher.calls.borrow()[0],
            ("/bin/ls".to_string(), strings(&["-la"]))
        );
        assert!(disclaimer.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_rejected_invocation_does_not_exec() {
        let (_dir, store) = temp_store();
        let mut list = CommandList::new();
        list.insert("make".to_string(), strings(&["/usr/bin/make", "-j8"]));
        store.set(&list).unwrap();

        let launcher = RecordingLauncher::default();
        let disclaimer = RecordingDisclaimer::default();
        let result = run(run_args("/bin/ls", &[]), &store, &launcher, &disclaimer);

        // Rejection is reported, not a crash.
        assert!(result.is_ok());
        assert!(launcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_allowed_invocation_execs() {
        let (_dir, store) = temp_store();
        let mut list = CommandList::new();
        list.insert("make".to_string(), strings(&["/usr/bin/make", "-j8"]));
        store.set(&list).unwrap();

        let launcher = RecordingLauncher::default();
        let disclaimer = RecordingDisclaimer::default();
        let result = run(
            run_args("/usr/bin/make", &["-j8"]),
            &store,
            &launcher,
            &disclaimer,
        );

        assert!(result.is_err());
        assert_eq!(
            launcher.calls.borrow()[0],
            ("/usr/bin/make".to_string(), strings(&["-j8"]))
        );
    }

    #[test]
    fn test_run_with_claim_respawns_self_and_never_execs() {
        let (_dir, store) = temp_store();
        let launcher = RecordingLauncher::default();
        let disclaimer = RecordingDisclaimer::default();

        let mut args = run_args("/bin/ls", &[]);
        args.claim = true;
        let result = run(args, &store, &launcher, &disclaimer);

        // The disclaimed self-spawn "returned" (double), which is fatal.
        assert!(result.is_err());
        assert_eq!(disclaimer.calls.borrow().len(), 1);
        assert!(launcher.calls.borrow().is_empty());
    }
}
