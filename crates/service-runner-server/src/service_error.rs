use std::io;

use service_runner_core::BoxedError;

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("Error creating the async runtime: {0}")]
    RuntimeCreation(#[source] io::Error),
    #[error("Error registering termination signals: {0}")]
    SignalRegistration(#[source] io::Error),
    #[error("Service manager failed during initialization: {0}: {1:?}")]
    InitializationFailure(String, #[source] BoxedError),
    #[error("A service run loop was already started in this process")]
    AlreadyRunning,
}

/// A failure raised inside the isolated start action.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkloadFault {
    #[error("Workload panicked: {0}")]
    Panicked(String),
}
