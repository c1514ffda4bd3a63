use std::io;

use service_manager::{
    ServiceInstallCtx, ServiceLabel, ServiceLevel, ServiceManager, ServiceStartCtx,
    ServiceStopCtx, ServiceUninstallCtx,
};
use service_runner_core::ServiceConfiguration;
use tracing::debug;

use super::io_error;
use crate::Manager;

pub struct UnixServiceManager {
    config: ServiceConfiguration,
    label: ServiceLabel,
    client: Box<dyn ServiceManager>,
    render_systemd_unit: bool,
}

impl UnixServiceManager {
    pub(crate) fn from_config(config: ServiceConfiguration) -> io::Result<Self> {
        let label: ServiceLabel = config.identity.name().parse().map_err(|e| {
            io_error(format!(
                "Invalid service name {:?}: {e}",
                config.identity.name()
            ))
        })?;

        let (mut client, render_systemd_unit) = native_client()?;
        client
            .set_level(ServiceLevel::System)
            .map_err(|e| io_error(format!("Error selecting system service level: {e}")))?;

        if !client
            .available()
            .map_err(|e| io_error(format!("Error detecting service manager: {e}")))?
        {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "No supported service manager was found on this system",
            ));
        }

        Ok(Self {
            config,
            label,
            client,
            render_systemd_unit,
        })
    }
}

/// Restart-on-failure is carried by the rendered systemd unit. Other service managers
/// apply their own default.
pub(crate) fn install_ctx(
    config: &ServiceConfiguration,
    label: ServiceLabel,
    render_systemd_unit: bool,
) -> ServiceInstallCtx {
    let contents = render_systemd_unit.then(|| crate::systemd::render_unit(config));
    ServiceInstallCtx {
        label,
        program: config.program.clone(),
        args: vec![],
        contents,
        username: Some(config.account.unix_user().to_owned()),
        working_directory: Some(config.working_directory.clone()),
        environment: None,
        autostart: config.autostart,
    }
}

#[cfg(target_os = "linux")]
fn native_client() -> io::Result<(Box<dyn ServiceManager>, bool)> {
    let systemd = service_manager::SystemdServiceManager::system();
    if systemd.available().unwrap_or(false) {
        return Ok((Box::new(systemd), true));
    }
    debug!("systemd not detected, falling back to the native service manager");
    Ok((<dyn ServiceManager>::native()?, false))
}

#[cfg(not(target_os = "linux"))]
fn native_client() -> io::Result<(Box<dyn ServiceManager>, bool)> {
    debug!("Using the native service manager");
    Ok((<dyn ServiceManager>::native()?, false))
}

impl Manager for UnixServiceManager {
    fn install(&self) -> io::Result<()> {
        self.client
            .install(install_ctx(
                &self.config,
                self.label.clone(),
                self.render_systemd_unit,
            )).map_err(|e| {
            io_error(format!(
                "Error installing service {}: {e}",
                self.config.identity.name()
            ))
        })
    }

    fn uninstall(&self) -> io::Result<()> {
        self.client
            .uninstall(ServiceUninstallCtx {
                label: self.label.clone(),
            })
            .map_err(|e| {
                io_error(format!(
                    "Error uninstalling service {}: {e}",
                    self.config.identity.name()
                ))
            })
    }

    fn start(&self) -> io::Result<()> {
        self.client
            .start(ServiceStartCtx {
                label: self.label.clone(),
            })
            .map_err(|e| {
                io_error(format!(
                    "Error starting service {}: {e}",
                    self.config.identity.name()
                ))
            })
    }

    fn stop(&self) -> io::Result<()> {
        self.client
            .stop(ServiceStopCtx {
                label: self.label.clone(),
            })
            .map_err(|e| {
                io_error(format!(
                    "Error stopping service {}: {e}",
                    self.config.identity.name()
                ))
            })
    }
}

#[cfg(test)]
#[path = "./unix_test.rs"]
mod unix_test;
