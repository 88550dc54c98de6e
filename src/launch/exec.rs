use std::convert::Infallible;
use std::ffi::CString;

use tracing::error;

use super::{LaunchError, Launcher};

/// Launches commands by replacing the current process image via `execv`.
pub struct ExecLauncher;

impl Launcher for ExecLauncher {
    fn exec(&self, executable: &str, args: &[String]) -> Result<Infallible, LaunchError> {
        let path = CString::new(executable)?;
        let argv = std::iter::once(executable)
            .chain(args.iter().map(String::as_str))
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()?;

        match nix::unistd::execv(&path, &argv) {
            Ok(never) => match never {},
            Err(errno) => {
                // If we're here, exec returned. Which means sadness.
                error!(executable, %errno, "execv failed");
                Err(LaunchError::Exec(errno))
            }
        }
    }
}
