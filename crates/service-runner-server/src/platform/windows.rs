use std::ffi::OsString;
use std::sync::{OnceLock, mpsc};
use std::time::Duration;

use service_runner_core::ServiceIdentity;
use tap::TapFallible;
use tokio::runtime::Runtime;
use tracing::{error, info};
use windows_service::service::{
    ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
    ServiceType,
};
use windows_service::service_control_handler::{
    self, ServiceControlHandlerResult, ServiceStatusHandle,
};
use windows_service::{define_windows_service, service_dispatcher};
use windows_sys::Win32::System::RemoteDesktop::ProcessIdToSessionId;
use windows_sys::Win32::System::Threading::GetCurrentProcessId;

use super::SHUTDOWN_TIMEOUT;
use crate::{Bridge, ServiceError, Workload};

static SERVICE: OnceLock<(ServiceIdentity, Workload)> = OnceLock::new();

define_windows_service!(ffi_service_main, service_main);

/// Services run in session 0; interactive logons never do.
pub fn is_interactive() -> bool {
    let mut session_id = 0u32;
    // SAFETY: session_id outlives the call and is the only pointer passed
    let succeeded = unsafe { ProcessIdToSessionId(GetCurrentProcessId(), &mut session_id) };
    succeeded == 0 || session_id != 0
}

/// Hands the current thread to the service control dispatcher. Returns once the service
/// has stopped.
pub fn run(identity: ServiceIdentity, workload: Workload) -> Result<(), ServiceError> {
    let name = identity.name().to_owned();
    SERVICE
        .set((identity, workload))
        .map_err(|_| ServiceError::AlreadyRunning)?;
    service_dispatcher::start(&name, ffi_service_main).map_err(|e| {
        ServiceError::InitializationFailure(
            format!("Error starting service dispatcher for {name}"),
            Box::new(e),
        )
    })
}

fn service_main(_arguments: Vec<OsString>) {
    let Some((identity, workload)) = SERVICE.get() else {
        error!("Service main was invoked without a registered service");
        return;
    };
    if let Err(e) = run_service(identity.clone(), workload.clone()) {
        error!("{e}");
    }
}

fn run_service(identity: ServiceIdentity, workload: Workload) -> Result<(), ServiceError> {
    let (stop_tx, stop_rx) = mpsc::channel();

    let event_handler = move |control_event| -> ServiceControlHandlerResult {
        match control_event {
            // Notifies a service to report its current status information to the service
            // control manager. Always return NoError even if not implemented.
            ServiceControl::Interrogate => ServiceControlHandlerResult::NoError,
            ServiceControl::Stop | ServiceControl::Shutdown => {
                info!("Received stop command from service manager");
                stop_tx
                    .send(())
                    .tap_err(|e| error!("Error sending stop signal: {e:?}"))
                    .ok();
                ServiceControlHandlerResult::NoError
            }
            _ => ServiceControlHandlerResult::NotImplemented,
        }
    };

    let status_handle = service_control_handler::register(identity.name(), event_handler)
        .map_err(|e| {
            ServiceError::InitializationFailure(
                "Error registering control handler".to_owned(),
                Box::new(e),
            )
        })?;

    set_status(&status_handle, ServiceState::StartPending, 0);
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            set_status(&status_handle, ServiceState::Stopped, 1);
            return Err(ServiceError::RuntimeCreation(e));
        }
    };

    let bridge = Bridge::new(identity, workload, rt.handle().clone(), is_interactive());
    let _workload = bridge.on_start();
    set_status(&status_handle, ServiceState::Running, 0);

    stop_rx.recv().ok();

    set_status(&status_handle, ServiceState::StopPending, 0);
    bridge.on_stop();
    rt.shutdown_timeout(SHUTDOWN_TIMEOUT);
    set_status(&status_handle, ServiceState::Stopped, 0);
    Ok(())
}

fn set_status(status_handle: &ServiceStatusHandle, current_state: ServiceState, exit_code: u32) {
    let controls_accepted = if current_state == ServiceState::Running {
        ServiceControlAccept::STOP | ServiceControlAccept::SHUTDOWN
    } else {
        ServiceControlAccept::empty()
    };
    status_handle
        .set_service_status(ServiceStatus {
            service_type: ServiceType::OWN_PROCESS,
            current_state,
            controls_accepted,
            exit_code: ServiceExitCode::Win32(exit_code),
            checkpoint: 0,
            wait_hint: Duration::default(),
            process_id: None,
        })
        .tap_err(|e| error!("Error setting status to {current_state:?}: {e:?}"))
        .ok();
}
