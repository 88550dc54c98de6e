mod disclaim;
mod exec;

pub use disclaim::DisclaimSpawner;
pub use exec::ExecLauncher;

use std::convert::Infallible;
use std::ffi::NulError;
use std::io;

use thiserror::Error;
use tracing::error;

/// Failures from the process-replacement primitives.
///
/// Success never produces a value: on the success path the calling process
/// image is gone. That is why the fallible operations here return
/// `Result<Infallible, LaunchError>` — there is no `Ok` to construct.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("unable to find the setdisclaim symbol")]
    SymbolResolution,

    #[error("setdisclaim failed with code {code}")]
    Disclaim { code: i32 },

    #[error("spawn returned with code {code}")]
    Spawn { code: i32 },

    #[error("execv failed: {0}")]
    Exec(nix::errno::Errno),

    #[error("argument contains an interior NUL byte: {0}")]
    NulByte(#[from] NulError),

    #[error("unable to determine the current executable: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("unable to spawn self to claim responsibility")]
    ClaimReturned,
}

/// Replaces the current process image with a target executable.
pub trait Launcher {
    /// Executes `executable` with `args` appended after the executable path
    /// in the new image's argument vector. Never returns on success.
    fn exec(&self, executable: &str, args: &[String]) -> Result<Infallible, LaunchError>;
}

/// Replaces the current process image while disclaiming responsibility for it.
///
/// The disclaim step relies on a platform-private symbol, so the whole
/// operation sits behind this trait and tests substitute a recording double.
pub trait Disclaimer {
    /// Spawns `executable` with the complete argument vector `argv`
    /// (argv[0] included) after marking the spawn attributes as disclaiming
    /// responsibility. Never returns on success.
    fn disclaim_and_exec(&self, executable: &str, argv: &[String])
    -> Result<Infallible, LaunchError>;
}

/// Re-invokes the current executable, disclaimed, so that the new image is
/// its own responsible process.
///
/// There is no public API to claim responsibility for oneself directly; the
/// only mechanism is to disclaim a fresh copy of ourselves and let control
/// transfer to it. Any return from this function is therefore a failure, and
/// the return type says so: callers get an error, never control on success.
pub fn claim_self(disclaimer: &dyn Disclaimer) -> LaunchError {
    let executable = match std::env::current_exe() {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(err) => return LaunchError::CurrentExe(err),
    };
    let argv: Vec<String> = std::env::args().collect();
    claim_with(disclaimer, &executable, argv)
}

fn claim_with(disclaimer: &dyn Disclaimer, executable: &str, mut argv: Vec<String>) -> LaunchError {
    // The re-invoked image must not claim again; strip the flag that got us
    // here. One occurrence only — anything past it belongs to the wrapped
    // command line.
    if let Some(index) = argv.iter().position(|arg| arg == "--claim") {
        argv.remove(index);
    }
    match disclaimer.disclaim_and_exec(executable, &argv) {
        Ok(never) => match never {},
        Err(err) => {
            error!(%err, "disclaimed self-spawn returned");
            LaunchError::ClaimReturned
        }
    }
}
