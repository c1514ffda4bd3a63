use std::io;

use service_runner_client::Manager;
use service_runner_core::{ServiceConfiguration, ServiceIdentity};
use service_runner_server::{ServiceError, Workload};

/// The OS facilities the adapter depends on.
pub trait Backend {
    fn is_interactive(&self) -> bool;

    fn manager(&self, config: ServiceConfiguration) -> io::Result<Box<dyn Manager>>;

    /// Blocks until the service manager stops the service.
    fn run(&self, identity: ServiceIdentity, workload: Workload) -> Result<(), ServiceError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    fn is_interactive(&self) -> bool {
        service_runner_server::platform::is_interactive()
    }

    fn manager(&self, config: ServiceConfiguration) -> io::Result<Box<dyn Manager>> {
        service_runner_client::get_manager(config)
    }

    fn run(&self, identity: ServiceIdentity, workload: Workload) -> Result<(), ServiceError> {
        service_runner_server::platform::run(identity, workload)
    }
}
