use std::path::PathBuf;

use service_manager::ServiceLabel;
use service_runner_core::{ServiceConfiguration, ServiceIdentity};

use super::install_ctx;

fn config() -> ServiceConfiguration {
    ServiceConfiguration::for_executable(
        ServiceIdentity::new("worker", "Worker Service", "Background worker"),
        "/opt/worker/bin/worker",
    )
    .unwrap()
}

fn label() -> ServiceLabel {
    "worker".parse().unwrap()
}

#[test]
fn test_systemd_install_carries_restart_policy() {
    let ctx = install_ctx(&config(), label(), true);

    let contents = ctx.contents.unwrap();
    assert!(contents.contains("Restart=on-failure\n"));
    assert!(contents.contains("RestartSec=120\n"));
    assert!(contents.contains("StartLimitBurst=100\n"));
    assert_eq!(PathBuf::from("/opt/worker/bin/worker"), ctx.program);
    assert_eq!(Some(PathBuf::from("/opt/worker/bin")), ctx.working_directory);
    assert_eq!(Some("root".to_owned()), ctx.username);
    assert!(ctx.args.is_empty());
    assert!(ctx.autostart);
}

#[test]
fn test_other_managers_use_generated_definition() {
    let ctx = install_ctx(&config(), label(), false);

    assert!(ctx.contents.is_none());
    assert_eq!(Some(PathBuf::from("/opt/worker/bin")), ctx.working_directory);
    assert!(ctx.environment.is_none());
}
