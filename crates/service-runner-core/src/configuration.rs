use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ServiceIdentity;

const RESTART_DELAY: Duration = Duration::from_secs(120);
const START_LIMIT_INTERVAL: Duration = Duration::from_secs(3);
const START_LIMIT_BURST: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartMode {
    OnFailure,
}

/// Restart the service when it exits with a failure, allowing at most `burst` starts
/// within `interval`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestartPolicy {
    pub mode: RestartMode,
    pub delay: Duration,
    pub interval: Duration,
    pub burst: u32,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            mode: RestartMode::OnFailure,
            delay: RESTART_DELAY,
            interval: START_LIMIT_INTERVAL,
            burst: START_LIMIT_BURST,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Account {
    /// `root` on unix, `LocalSystem` on Windows.
    Privileged,
}

impl Account {
    pub fn unix_user(&self) -> &'static str {
        match self {
            Account::Privileged => "root",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceType {
    Simple,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Unable to locate the running executable: {0}")]
    CurrentExe(#[source] io::Error),
    #[error("Executable path {0:?} has no parent directory")]
    NoParent(PathBuf),
}

impl From<ConfigurationError> for io::Error {
    fn from(value: ConfigurationError) -> Self {
        match value {
            ConfigurationError::CurrentExe(e) => e,
            e @ ConfigurationError::NoParent(_) => io::Error::new(io::ErrorKind::NotFound, e),
        }
    }
}

/// Everything the service manager needs to register this executable. Built once per
/// process invocation and never persisted here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfiguration {
    pub identity: ServiceIdentity,
    pub program: PathBuf,
    pub working_directory: PathBuf,
    pub account: Account,
    pub service_type: ServiceType,
    pub autostart: bool,
    pub restart_policy: RestartPolicy,
}

impl ServiceConfiguration {
    pub fn discover(identity: ServiceIdentity) -> Result<Self, ConfigurationError> {
        let program = std::env::current_exe().map_err(ConfigurationError::CurrentExe)?;
        Self::for_executable(identity, program)
    }

    pub fn for_executable(
        identity: ServiceIdentity,
        program: impl Into<PathBuf>,
    ) -> Result<Self, ConfigurationError> {
        let program = program.into();
        let working_directory = executable_dir(&program)?;
        Ok(Self {
            identity,
            program,
            working_directory,
            account: Account::Privileged,
            service_type: ServiceType::Simple,
            autostart: true,
            restart_policy: RestartPolicy::default(),
        })
    }
}

pub fn executable_dir(program: &Path) -> Result<PathBuf, ConfigurationError> {
    program
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigurationError::NoParent(program.to_path_buf()))
}

#[cfg(test)]
#[path = "./configuration_test.rs"]
mod configuration_test;
