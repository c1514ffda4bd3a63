#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::*;
#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::*;

use std::io;
use std::time::Duration;

/// How long a still-running start action may keep the runtime alive after the stop action
/// returns.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// The Windows service control manager does not set a working directory, so supervised
/// runs move to the executable's directory. Other service managers already do this.
pub(crate) fn correct_working_directory() -> io::Result<()> {
    #[cfg(windows)]
    {
        let exe = std::env::current_exe()?;
        std::env::set_current_dir(service_runner_core::executable_dir(&exe)?)?;
    }
    Ok(())
}
