use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use service_runner_client::Manager;
use service_runner_core::{
    LifecycleAction, RestartMode, ServiceConfiguration, ServiceIdentity, executable_dir,
};
use service_runner_server::{ServiceError, Workload};

use crate::{Backend, Completion, ServiceAdapter};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Install(ServiceConfiguration),
    Uninstall,
    Start,
    Stop,
    Run,
}

#[derive(Clone, Default)]
struct RecordingBackend {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_registration: bool,
    fail_action: bool,
}

impl RecordingBackend {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

struct RecordingManager {
    config: ServiceConfiguration,
    calls: Arc<Mutex<Vec<Call>>>,
    fail: bool,
}

impl RecordingManager {
    fn record(&self, call: Call) -> io::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"))
        } else {
            Ok(())
        }
    }
}

impl Manager for RecordingManager {
    fn install(&self) -> io::Result<()> {
        self.record(Call::Install(self.config.clone()))
    }

    fn uninstall(&self) -> io::Result<()> {
        self.record(Call::Uninstall)
    }

    fn start(&self) -> io::Result<()> {
        self.record(Call::Start)
    }

    fn stop(&self) -> io::Result<()> {
        self.record(Call::Stop)
    }
}

impl Backend for RecordingBackend {
    fn is_interactive(&self) -> bool {
        true
    }

    fn manager(&self, config: ServiceConfiguration) -> io::Result<Box<dyn Manager>> {
        if self.fail_registration {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "no service manager available",
            ));
        }
        Ok(Box::new(RecordingManager {
            config,
            calls: self.calls.clone(),
            fail: self.fail_action,
        }))
    }

    fn run(&self, _identity: ServiceIdentity, _workload: Workload) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(Call::Run);
        Ok(())
    }
}

struct Counters {
    started: Arc<AtomicUsize>,
    stopped: Arc<AtomicUsize>,
}

fn build_adapter(backend: RecordingBackend) -> (ServiceAdapter<RecordingBackend>, Counters) {
    let started = Arc::new(AtomicUsize::new(0));
    let stopped = Arc::new(AtomicUsize::new(0));
    let workload = {
        let started = started.clone();
        let stopped = stopped.clone();
        Workload::new(
            move || {
                thread::sleep(Duration::from_millis(50));
                started.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                stopped.fetch_add(1, Ordering::SeqCst);
            },
        )
    };
    let adapter = ServiceAdapter::new(
        ServiceIdentity::new("worker", "Worker Service", "Background worker"),
        workload,
    )
    .with_logging(false)
    .with_backend(backend);
    (adapter, Counters { started, stopped })
}

#[test]
fn test_interactive_runs_start_action_to_completion() {
    let backend = RecordingBackend::default();
    let (adapter, counters) = build_adapter(backend.clone());

    let completion = adapter.run_with(["worker"], true);

    assert!(matches!(completion, Completion::Workload));
    assert_eq!(1, counters.started.load(Ordering::SeqCst));
    assert_eq!(0, counters.stopped.load(Ordering::SeqCst));
    assert!(backend.calls().is_empty());
}

#[test]
fn test_install_registers_with_fixed_policy() {
    let backend = RecordingBackend::default();
    let (adapter, counters) = build_adapter(backend.clone());

    let completion = adapter.run_with(["worker", "install"], true);

    let Completion::Lifecycle(report) = completion else {
        panic!("expected a lifecycle report, got {completion:?}");
    };
    assert!(report.is_success());
    assert_eq!("Install service [Worker Service] succeeded", report.to_string());

    let calls = backend.calls();
    assert_eq!(1, calls.len());
    let Call::Install(config) = &calls[0] else {
        panic!("expected install, got {:?}", calls[0]);
    };
    let exe = std::env::current_exe().unwrap();
    assert_eq!(executable_dir(&exe).unwrap(), config.working_directory);
    assert_eq!(exe, config.program);
    assert_eq!(RestartMode::OnFailure, config.restart_policy.mode);
    assert_eq!(Duration::from_secs(120), config.restart_policy.delay);
    assert_eq!(Duration::from_secs(3), config.restart_policy.interval);
    assert_eq!(100, config.restart_policy.burst);
    assert!(config.autostart);
    assert_eq!(0, counters.started.load(Ordering::SeqCst));
}

#[test]
fn test_each_action_invokes_one_operation() {
    for (arg, expected) in [
        ("uninstall", Call::Uninstall),
        ("start", Call::Start),
        ("stop", Call::Stop),
    ] {
        let backend = RecordingBackend::default();
        let (adapter, _) = build_adapter(backend.clone());

        let completion = adapter.run_with(["worker", arg], true);

        assert!(matches!(completion, Completion::Lifecycle(ref r) if r.is_success()));
        assert_eq!(vec![expected], backend.calls());
    }
}

#[test]
fn test_lifecycle_ignores_interactivity() {
    let backend = RecordingBackend::default();
    let (adapter, _) = build_adapter(backend.clone());

    let completion = adapter.run_with(["worker", "start"], false);

    let Completion::Lifecycle(report) = completion else {
        panic!("expected a lifecycle report, got {completion:?}");
    };
    assert_eq!(LifecycleAction::Start, report.action());
    assert_eq!(vec![Call::Start], backend.calls());
}

#[test]
fn test_failed_action_reports_error() {
    let backend = RecordingBackend {
        fail_action: true,
        ..Default::default()
    };
    let (adapter, _) = build_adapter(backend.clone());

    let completion = adapter.run_with(["worker", "stop"], true);

    let Completion::Lifecycle(report) = completion else {
        panic!("expected a lifecycle report, got {completion:?}");
    };
    assert!(!report.is_success());
    assert_eq!(
        "Stop service [Worker Service] failed: access denied",
        report.to_string()
    );
    assert_eq!(vec![Call::Stop], backend.calls());
}

#[test]
fn test_registration_failure_attempts_nothing() {
    let backend = RecordingBackend {
        fail_registration: true,
        ..Default::default()
    };
    let (adapter, counters) = build_adapter(backend.clone());

    let completion = adapter.run_with(["worker", "install"], true);

    let Completion::RegistrationFailed(message) = completion else {
        panic!("expected a registration failure, got {completion:?}");
    };
    assert_eq!("no service manager available", message);
    assert!(backend.calls().is_empty());
    assert_eq!(0, counters.started.load(Ordering::SeqCst));
}

#[test]
fn test_unrecognized_subcommand_is_silent() {
    let backend = RecordingBackend::default();
    let (adapter, counters) = build_adapter(backend.clone());

    let completion = adapter.run_with(["worker", "frobnicate"], true);

    assert!(matches!(completion, Completion::Ignored(ref arg) if arg == "frobnicate"));
    assert!(backend.calls().is_empty());
    assert_eq!(0, counters.started.load(Ordering::SeqCst));
}

#[test]
fn test_supervised_run_hands_off_to_backend() {
    let backend = RecordingBackend::default();
    let (adapter, counters) = build_adapter(backend.clone());

    let completion = adapter.run_with(["worker"], false);

    assert!(matches!(completion, Completion::Managed(Ok(()))));
    assert_eq!(vec![Call::Run], backend.calls());
    assert_eq!(0, counters.started.load(Ordering::SeqCst));
}
