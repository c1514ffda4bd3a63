use std::ffi::OsString;
use std::str::FromStr;

use clap::{Arg, ArgAction, Command};
use service_runner_core::LifecycleAction;
use strum::IntoEnumIterator;
use tracing::debug;

const EXTRA_ARGS_ID: &str = "args";

/// The branch a process invocation commits to. Chosen once, never revisited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Interactive,
    Lifecycle(LifecycleAction),
    Unrecognized(String),
    ManagedRun,
}

pub fn command() -> Command {
    let cmd = Command::new("service")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .allow_external_subcommands(true);

    LifecycleAction::iter().fold(cmd, |cmd, action| {
        cmd.subcommand(
            Command::new(action.name()).arg(
                Arg::new(EXTRA_ARGS_ID)
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true)
                    .action(ArgAction::Append)
                    .hide(true),
            ),
        )
    })
}

/// Picks the run state from the process arguments (program name first) and whether the
/// process is attached to an interactive session.
pub fn dispatch<I, T>(args: I, interactive: bool) -> RunState
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        return if interactive {
            RunState::Interactive
        } else {
            RunState::ManagedRun
        };
    }

    let requested = args[1].to_string_lossy().into_owned();
    let matches = match command().try_get_matches_from(&args) {
        Ok(matches) => matches,
        Err(e) => {
            debug!("Ignoring unrecognized subcommand {requested:?}: {:?}", e.kind());
            return RunState::Unrecognized(requested);
        }
    };

    match matches
        .subcommand_name()
        .and_then(|name| LifecycleAction::from_str(name).ok())
    {
        Some(action) => RunState::Lifecycle(action),
        None => {
            debug!("Ignoring unrecognized subcommand {requested:?}");
            RunState::Unrecognized(requested)
        }
    }
}

#[cfg(test)]
#[path = "./dispatcher_test.rs"]
mod dispatcher_test;
