mod adapter;
pub use adapter::*;

mod backend;
pub use backend::*;

pub use service_runner_cli as cli;
pub use service_runner_client as client;
pub use service_runner_core as core;
pub use service_runner_logging as logging;
pub use service_runner_server as server;

pub use service_runner_core::ServiceIdentity;
pub use service_runner_server::Workload;

/// Runs the current executable as the service `name`.
///
/// Depending on how the process was launched this either calls `on_start` directly
/// (interactive, no arguments), performs the `install`, `uninstall`, `start` or `stop`
/// subcommand and returns, or blocks under the OS service manager until it stops the
/// service.
pub fn run_as_service<S, T>(
    name: &str,
    display_name: &str,
    description: &str,
    on_start: S,
    on_stop: T,
) where
    S: Fn() + Send + Sync + 'static,
    T: Fn() + Send + Sync + 'static,
{
    ServiceAdapter::new(
        ServiceIdentity::new(name, display_name, description),
        Workload::new(on_start, on_stop),
    )
    .run();
}
