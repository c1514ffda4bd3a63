use service_runner_core::LifecycleAction;

use crate::{RunState, dispatch};

#[test]
fn test_interactive_without_subcommand() {
    assert_eq!(RunState::Interactive, dispatch(["prog"], true));
}

#[test]
fn test_managed_without_subcommand() {
    assert_eq!(RunState::ManagedRun, dispatch(["prog"], false));
}

#[test]
fn test_empty_args() {
    assert_eq!(RunState::Interactive, dispatch(Vec::<String>::new(), true));
    assert_eq!(RunState::ManagedRun, dispatch(Vec::<String>::new(), false));
}

#[test]
fn test_lifecycle_actions() {
    for (arg, action) in [
        ("install", LifecycleAction::Install),
        ("uninstall", LifecycleAction::Uninstall),
        ("start", LifecycleAction::Start),
        ("stop", LifecycleAction::Stop),
    ] {
        assert_eq!(RunState::Lifecycle(action), dispatch(["prog", arg], true));
        assert_eq!(RunState::Lifecycle(action), dispatch(["prog", arg], false));
    }
}

#[test]
fn test_extra_args_ignored() {
    assert_eq!(
        RunState::Lifecycle(LifecycleAction::Install),
        dispatch(["prog", "install", "--force", "extra"], false)
    );
}

#[test]
fn test_unrecognized() {
    for arg in ["restart", "Install", "--help", "-V", "help", ""] {
        assert_eq!(
            RunState::Unrecognized(arg.to_owned()),
            dispatch(["prog", arg], true),
            "{arg:?}"
        );
    }
}
