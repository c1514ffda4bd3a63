use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use service_runner_core::ServiceIdentity;
use tap::TapFallible;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{Workload, WorkloadFault, platform};

/// Connects the service manager's start/stop callbacks to the caller's workload.
pub struct Bridge {
    identity: ServiceIdentity,
    workload: Workload,
    runtime: Handle,
    interactive: bool,
}

impl Bridge {
    pub fn new(
        identity: ServiceIdentity,
        workload: Workload,
        runtime: Handle,
        interactive: bool,
    ) -> Self {
        Self {
            identity,
            workload,
            runtime,
            interactive,
        }
    }

    /// Launches the start action on the blocking pool and returns immediately. A panic in
    /// the start action is caught at the task boundary and logged; it never reaches the
    /// caller. Dropping the returned handle detaches the task.
    pub fn on_start(&self) -> JoinHandle<Result<(), WorkloadFault>> {
        if self.interactive {
            info!("Running in terminal");
        } else {
            info!("Running under service manager");
            platform::correct_working_directory()
                .tap_err(|e| warn!("Error changing to the executable directory: {e:?}"))
                .ok();
        }

        let workload = self.workload.clone();
        let identity = self.identity.clone();
        self.runtime.spawn_blocking(move || {
            panic::catch_unwind(AssertUnwindSafe(|| workload.start()))
                .map_err(|payload| WorkloadFault::Panicked(panic_message(payload.as_ref())))
                .tap_err(|e| error!("{identity}: {e}"))
        })
    }

    /// Runs the stop action to completion. The start action is not cancelled or joined.
    pub fn on_stop(&self) {
        info!("{} service is stopping", self.identity);
        self.workload.stop();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
#[path = "./bridge_test.rs"]
mod bridge_test;
