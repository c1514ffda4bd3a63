use service_runner_core::{ServiceConfiguration, ServiceIdentity};

use crate::systemd::render_unit;

fn config(program: &str) -> ServiceConfiguration {
    ServiceConfiguration::for_executable(
        ServiceIdentity::new("Worker", "Worker Service", "Processes jobs"),
        program,
    )
    .unwrap()
}

#[test]
fn test_unit_carries_fixed_policy() {
    let unit = render_unit(&config("/opt/worker/worker"));
    let lines: Vec<_> = unit.lines().collect();
    for expected in [
        "Description=Processes jobs",
        "Type=simple",
        "ExecStart=/opt/worker/worker",
        "WorkingDirectory=/opt/worker",
        "User=root",
        "Restart=on-failure",
        "StartLimitIntervalSec=3",
        "StartLimitBurst=100",
        "WantedBy=multi-user.target",
    ] {
        assert!(lines.contains(&expected), "missing {expected:?} in\n{unit}");
    }
}

#[test]
fn test_paths_with_spaces_are_quoted() {
    let unit = render_unit(&config("/opt/my worker/worker"));
    assert!(unit.contains("ExecStart=\"/opt/my worker/worker\""));
    assert!(unit.contains("WorkingDirectory=\"/opt/my worker\""));
}
