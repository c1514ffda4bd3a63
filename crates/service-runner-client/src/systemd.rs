//! Renders the systemd unit carrying the fixed service policy.

use std::path::Path;

use service_runner_core::{RestartMode, ServiceConfiguration, ServiceType};

pub fn render_unit(config: &ServiceConfiguration) -> String {
    let policy = &config.restart_policy;
    let service_type = match config.service_type {
        ServiceType::Simple => "simple",
    };
    let restart = match policy.mode {
        RestartMode::OnFailure => "on-failure",
    };

    // https://www.freedesktop.org/wiki/Software/systemd/NetworkTarget/
    format!(
        "[Unit]
Description={description}
ConditionFileIsExecutable={program}
After=network-online.target syslog.target
Wants=network-online.target
StartLimitIntervalSec={interval}
StartLimitBurst={burst}

[Service]
Type={service_type}
ExecStart={exec_start}
WorkingDirectory={working_directory}
User={user}
Restart={restart}
RestartSec={delay}

[Install]
WantedBy=multi-user.target
",
        description = config.identity.description(),
        program = config.program.display(),
        interval = policy.interval.as_secs(),
        burst = policy.burst,
        exec_start = quote(&config.program),
        working_directory = quote(&config.working_directory),
        user = config.account.unix_user(),
        delay = policy.delay.as_secs(),
    )
}

fn quote(path: &Path) -> String {
    let path = path.display().to_string();
    if path.chars().any(char::is_whitespace) {
        format!("\"{}\"", path.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        path
    }
}

#[cfg(test)]
#[path = "./systemd_test.rs"]
mod systemd_test;
