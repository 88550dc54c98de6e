use std::convert::Infallible;

use super::{Disclaimer, LaunchError};

/// Spawns a target over the current process image with the "disclaim
/// responsibility" spawn attribute set, so the OS treats the new image as
/// its own responsible process rather than attributing it to our caller.
pub struct DisclaimSpawner;

impl Disclaimer for DisclaimSpawner {
    fn disclaim_and_exec(
        &self,
        executable: &str,
        argv: &[String],
    ) -> Result<Infallible, LaunchError> {
        spawn_disclaimed(executable, argv)
    }
}

#[cfg(target_os = "macos")]
fn spawn_disclaimed(executable: &str, argv: &[String]) -> Result<Infallible, LaunchError> {
    use std::ffi::CString;
    use std::ptr;

    use libc::{POSIX_SPAWN_SETEXEC, c_char, c_int, c_short, posix_spawnattr_t};
    use tracing::error;

    // responsibility_spawnattrs_setdisclaim has no public header, so it is
    // looked up by name in our own image at runtime rather than linked.
    type SetDisclaimFn = unsafe extern "C" fn(*mut posix_spawnattr_t, c_int) -> c_int;

    let set_disclaim: SetDisclaimFn = {
        let handle = unsafe { libc::dlopen(ptr::null(), libc::RTLD_NOW) };
        let symbol =
            unsafe { libc::dlsym(handle, c"responsibility_spawnattrs_setdisclaim".as_ptr()) };
        if symbol.is_null() {
            error!("unable to resolve responsibility_spawnattrs_setdisclaim");
            return Err(LaunchError::SymbolResolution);
        }
        unsafe { std::mem::transmute::<*mut libc::c_void, SetDisclaimFn>(symbol) }
    };

    let path = CString::new(executable)?;
    let c_argv = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let mut argv_ptrs: Vec<*mut c_char> = c_argv
        .iter()
        .map(|arg| arg.as_ptr().cast_mut())
        .collect();
    argv_ptrs.push(ptr::null_mut());

    unsafe {
        // Only the posix_spawn API is documented for setdisclaim, so the
        // exec-in-place behavior comes from POSIX_SPAWN_SETEXEC.
        let mut attr: posix_spawnattr_t = ptr::null_mut();
        libc::posix_spawnattr_init(&mut attr);
        libc::posix_spawnattr_setflags(&mut attr, POSIX_SPAWN_SETEXEC as c_short);

        let code = set_disclaim(&mut attr, 1);
        if code != 0 {
            error!(code, "setdisclaim failed");
            return Err(LaunchError::Disclaim { code });
        }

        let code = libc::posix_spawn(
            ptr::null_mut(),
            path.as_ptr(),
            ptr::null(),
            &attr,
            argv_ptrs.as_ptr(),
            *libc::_NSGetEnviron(),
        );
        // If we're here, the spawn did not replace us. Which means sadness.
        error!(code, executable, "posix_spawn returned");
        Err(LaunchError::Spawn { code })
    }
}

#[cfg(not(target_os = "macos"))]
fn spawn_disclaimed(_executable: &str, _argv: &[String]) -> Result<Infallible, LaunchError> {
    // Responsibility disclaim is a macOS concept; elsewhere the private
    // symbol simply does not exist.
    Err(LaunchError::SymbolResolution)
}
