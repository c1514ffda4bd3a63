use futures::StreamExt;
use service_runner_core::ServiceIdentity;
use signal_hook::consts::signal::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook_tokio::Signals;
#[cfg(target_os = "linux")]
use tap::TapFallible;
use tokio::runtime::Runtime;
#[cfg(target_os = "linux")]
use tracing::{error, warn};
use tracing::info;

use super::SHUTDOWN_TIMEOUT;
use crate::{Bridge, ServiceError, Workload};

/// A process started by init (or by a system service manager) is reparented to pid 1.
pub fn is_interactive() -> bool {
    std::os::unix::process::parent_id() != 1
}

/// Blocks for the lifetime of the service: starts the workload, then waits for a
/// termination signal before running the stop action.
pub fn run(identity: ServiceIdentity, workload: Workload) -> Result<(), ServiceError> {
    let rt = Runtime::new().map_err(ServiceError::RuntimeCreation)?;
    let bridge = Bridge::new(identity, workload, rt.handle().clone(), is_interactive());
    let result = rt.block_on(run_until_terminated(&bridge));
    rt.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}

async fn run_until_terminated(bridge: &Bridge) -> Result<(), ServiceError> {
    // Registered before starting so an early stop request is not lost
    let signals =
        Signals::new([SIGTERM, SIGINT, SIGQUIT]).map_err(ServiceError::SignalRegistration)?;
    let signals_handle = signals.handle();
    let mut signals = signals.fuse();

    let _workload = bridge.on_start();

    #[cfg(target_os = "linux")]
    sd_notify::notify(false, &[sd_notify::NotifyState::Ready])
        .tap_err(|e| error!("Error sending ready notification: {e:?}"))
        .ok();

    if let Some(signal) = signals.next().await {
        let signal_name = signal_hook::low_level::signal_name(signal).unwrap_or("unknown");
        info!("Received {signal_name}");
    }
    signals_handle.close();

    #[cfg(target_os = "linux")]
    sd_notify::notify(false, &[sd_notify::NotifyState::Stopping])
        .tap_err(|e| warn!("Error sending stopping notification: {e:?}"))
        .ok();

    bridge.on_stop();
    Ok(())
}

#[cfg(test)]
#[path = "./unix_test.rs"]
mod unix_test;
