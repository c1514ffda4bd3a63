use std::fmt;

use service_runner_core::LifecycleAction;
use tap::TapFallible;
use tracing::{info, warn};

use crate::Manager;

/// Outcome of a single lifecycle action, rendered as the operator-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    action: LifecycleAction,
    display_name: String,
    error: Option<String>,
}

impl Report {
    pub fn action(&self) -> LifecycleAction {
        self.action
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(
                f,
                "{} service [{}] succeeded",
                self.action.verb(),
                self.display_name
            ),
            Some(e) => write!(
                f,
                "{} service [{}] failed: {e}",
                self.action.verb(),
                self.display_name
            ),
        }
    }
}

/// Runs exactly one manager operation for `action`. Failures are captured in the report,
/// never retried.
pub fn execute(manager: &dyn Manager, action: LifecycleAction, display_name: &str) -> Report {
    let result = match action {
        LifecycleAction::Install => manager.install(),
        LifecycleAction::Uninstall => manager.uninstall(),
        LifecycleAction::Start => manager.start(),
        LifecycleAction::Stop => manager.stop(),
    }
    .tap_ok(|_| info!("{action} succeeded for {display_name}"))
    .tap_err(|e| warn!("{action} failed for {display_name}: {e:?}"));

    Report {
        action,
        display_name: display_name.to_owned(),
        error: result.err().map(|e| e.to_string()),
    }
}

#[cfg(test)]
#[path = "./lifecycle_test.rs"]
mod lifecycle_test;
