use std::ffi::OsString;
use std::io;

use service_runner_cli::{RunState, dispatch};
use service_runner_client::{Report, execute};
use service_runner_core::{LifecycleAction, ServiceConfiguration, ServiceIdentity};
use service_runner_logging::tracing_subscriber::util::SubscriberInitExt;
use service_runner_logging::{GlobalLoggerGuard, LoggerBuilder};
use service_runner_server::{ServiceError, Workload};
use tap::TapFallible;
use tracing::{debug, error};

use crate::{Backend, NativeBackend};

/// What a single invocation ended up doing.
#[derive(Debug)]
pub enum Completion {
    /// The start action ran to completion on the calling thread.
    Workload,
    Lifecycle(Report),
    /// The service manager binding could not be created, so no action was attempted.
    RegistrationFailed(String),
    Ignored(String),
    Managed(Result<(), ServiceError>),
}

pub struct ServiceAdapter<B = NativeBackend> {
    identity: ServiceIdentity,
    workload: Workload,
    backend: B,
    logging: bool,
}

impl ServiceAdapter<NativeBackend> {
    pub fn new(identity: ServiceIdentity, workload: Workload) -> Self {
        Self {
            identity,
            workload,
            backend: NativeBackend,
            logging: true,
        }
    }
}

impl<B: Backend> ServiceAdapter<B> {
    pub fn with_backend<B2: Backend>(self, backend: B2) -> ServiceAdapter<B2> {
        ServiceAdapter {
            identity: self.identity,
            workload: self.workload,
            backend,
            logging: self.logging,
        }
    }

    /// Installs the global log subscriber for supervised runs. Disable this when the
    /// start action installs its own subscriber.
    pub fn with_logging(self, logging: bool) -> Self {
        Self { logging, ..self }
    }

    pub fn run(self) {
        let interactive = self.backend.is_interactive();
        match self.run_with(std::env::args_os(), interactive) {
            Completion::Lifecycle(report) => println!("{report}"),
            Completion::RegistrationFailed(e) => println!("{e}"),
            Completion::Managed(Err(e)) => {
                error!("{e}");
                eprintln!("{e}");
            }
            Completion::Workload | Completion::Ignored(_) | Completion::Managed(Ok(())) => {}
        }
    }

    pub fn run_with<I, T>(&self, args: I, interactive: bool) -> Completion
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match dispatch(args, interactive) {
            RunState::Interactive => {
                self.workload.start();
                Completion::Workload
            }
            RunState::Lifecycle(action) => self.run_lifecycle(action),
            RunState::Unrecognized(arg) => {
                debug!("No lifecycle action matches {arg:?}");
                Completion::Ignored(arg)
            }
            RunState::ManagedRun => self.run_managed(),
        }
    }

    fn run_lifecycle(&self, action: LifecycleAction) -> Completion {
        let manager = match ServiceConfiguration::discover(self.identity.clone())
            .map_err(io::Error::from)
            .and_then(|config| self.backend.manager(config))
        {
            Ok(manager) => manager,
            Err(e) => return Completion::RegistrationFailed(e.to_string()),
        };

        let report = execute(manager.as_ref(), action, self.identity.display_name());
        if report.is_success() && self.logging {
            self.update_log_source(action);
        }
        Completion::Lifecycle(report)
    }

    fn update_log_source(&self, action: LifecycleAction) {
        let logger = LoggerBuilder::new(self.identity.clone());
        match action {
            LifecycleAction::Install => logger
                .register()
                .tap_err(|e| eprintln!("Error registering log source: {e}"))
                .ok(),
            LifecycleAction::Uninstall => logger
                .deregister()
                .tap_err(|e| eprintln!("Error removing log source: {e}"))
                .ok(),
            LifecycleAction::Start | LifecycleAction::Stop => None,
        };
    }

    fn run_managed(&self) -> Completion {
        let _guard = if self.logging {
            self.init_logging()
        } else {
            None
        };
        Completion::Managed(
            self.backend
                .run(self.identity.clone(), self.workload.clone()),
        )
    }

    fn init_logging(&self) -> Option<GlobalLoggerGuard> {
        let subscriber = LoggerBuilder::new(self.identity.clone())
            .load_config()
            .and_then(LoggerBuilder::build)
            .tap_err(|e| eprintln!("Error creating logger: {e}"))
            .ok()?;
        subscriber
            .try_init()
            .tap_err(|e| eprintln!("Error installing logger: {e}"))
            .ok()?;
        Some(service_runner_logging::init())
    }
}

#[cfg(test)]
#[path = "./adapter_test.rs"]
mod adapter_test;
