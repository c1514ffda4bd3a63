#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix::*;
#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows::*;

use std::io;

use service_runner_core::ServiceConfiguration;

use crate::Manager;

/// Connects to the native service manager for `config`. Failing here is a registration
/// error: no lifecycle action should be attempted.
pub fn get_manager(config: ServiceConfiguration) -> io::Result<Box<dyn Manager>> {
    #[cfg(unix)]
    return Ok(Box::new(UnixServiceManager::from_config(config)?));
    #[cfg(windows)]
    return Ok(Box::new(WindowsServiceManager::from_config(config)?));
    #[cfg(not(any(unix, windows)))]
    return Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!(
            "No service manager is available for {}",
            config.identity.name()
        ),
    ));
}

#[cfg_attr(not(any(unix, windows)), allow(unused))]
pub(crate) fn io_error(message: String) -> io::Error {
    io::Error::other(message)
}
