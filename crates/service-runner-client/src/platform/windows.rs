use std::ffi::OsString;
use std::io;

use service_runner_core::ServiceConfiguration;
use windows_service::service::{
    Service, ServiceAccess, ServiceAction, ServiceActionType, ServiceErrorControl,
    ServiceFailureActions, ServiceFailureResetPeriod, ServiceInfo, ServiceStartType, ServiceState,
    ServiceType,
};
use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};

use super::io_error;
use crate::Manager;

pub struct WindowsServiceManager {
    config: ServiceConfiguration,
}

impl WindowsServiceManager {
    pub(crate) fn from_config(config: ServiceConfiguration) -> io::Result<Self> {
        Ok(Self { config })
    }

    fn name(&self) -> &str {
        self.config.identity.name()
    }

    fn get_manager(&self, access: ServiceManagerAccess) -> io::Result<ServiceManager> {
        ServiceManager::local_computer(None::<&str>, access)
            .map_err(|e| io_error(format!("Error connecting to local service manager: {e:?}")))
    }

    fn open_service(&self, access: ServiceAccess) -> io::Result<Service> {
        self.get_manager(ServiceManagerAccess::CONNECT)?
            .open_service(self.name(), access)
            .map_err(|e| io_error(format!("Error opening service {}: {e:?}", self.name())))
    }

    fn current_state(&self, service: &Service) -> io::Result<ServiceState> {
        service
            .query_status()
            .map(|status| status.current_state)
            .map_err(|e| {
                io_error(format!(
                    "Error getting status for service {}: {e:?}",
                    self.name()
                ))
            })
    }

    fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            name: self.name().into(),
            display_name: self.config.identity.display_name().into(),
            service_type: ServiceType::OWN_PROCESS,
            start_type: if self.config.autostart {
                ServiceStartType::AutoStart
            } else {
                ServiceStartType::OnDemand
            },
            error_control: ServiceErrorControl::Normal,
            executable_path: self.config.program.clone(),
            launch_arguments: vec![],
            dependencies: vec![],
            account_name: None, // run as LocalSystem
            account_password: None,
        }
    }

    fn failure_actions(&self) -> ServiceFailureActions {
        let policy = &self.config.restart_policy;
        ServiceFailureActions {
            reset_period: ServiceFailureResetPeriod::After(policy.interval),
            reboot_msg: None,
            command: None::<OsString>,
            actions: Some(vec![ServiceAction {
                action_type: ServiceActionType::Restart,
                delay: policy.delay,
            }]),
        }
    }
}

impl Manager for WindowsServiceManager {
    fn install(&self) -> io::Result<()> {
        let service_info = self.service_info();
        let service = self
            .get_manager(ServiceManagerAccess::CONNECT | ServiceManagerAccess::CREATE_SERVICE)?
            .create_service(
                &service_info,
                ServiceAccess::CHANGE_CONFIG | ServiceAccess::START,
            )
            .map_err(|e| {
                io_error(format!(
                    "Error creating service {:#?}: {e:?}",
                    service_info.name
                ))
            })?;

        service
            .set_description(self.config.identity.description())
            .map_err(|e| {
                io_error(format!(
                    "Error setting service description to \"{}\": {e:?}",
                    self.config.identity.description()
                ))
            })?;

        service
            .update_failure_actions(self.failure_actions())
            .map_err(|e| io_error(format!("Error setting service failure actions: {e:?}")))?;
        // Without this flag, failure actions only apply when the process crashes
        service
            .set_failure_actions_on_non_crash_failures(true)
            .map_err(|e| io_error(format!("Error enabling non-crash failure actions: {e:?}")))?;
        Ok(())
    }

    fn uninstall(&self) -> io::Result<()> {
        let service = self.open_service(ServiceAccess::DELETE)?;
        service
            .delete()
            .map_err(|e| io_error(format!("Error deleting service {}: {e:?}", self.name())))
    }

    fn start(&self) -> io::Result<()> {
        let service = self.open_service(ServiceAccess::QUERY_STATUS | ServiceAccess::START)?;
        if self.current_state(&service)? == ServiceState::Running {
            return Ok(());
        }
        service
            .start::<&str>(&[])
            .map_err(|e| io_error(format!("Error starting service: {e:?}")))
    }

    fn stop(&self) -> io::Result<()> {
        let service = self.open_service(ServiceAccess::QUERY_STATUS | ServiceAccess::STOP)?;
        if self.current_state(&service)? == ServiceState::Stopped {
            return Ok(());
        }
        service
            .stop()
            .map(|_| ())
            .map_err(|e| io_error(format!("Error stopping service: {e:?}")))
    }
}
