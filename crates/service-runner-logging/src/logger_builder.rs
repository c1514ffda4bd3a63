use std::collections::HashMap;
use std::io::{Write, stderr, stdout};
use std::sync::{Mutex, OnceLock};

use service_runner_core::{BoxedError, ServiceIdentity};
use time::UtcOffset;
use time::format_description::well_known::{self, Rfc3339};
use tracing::metadata::LevelFilter;
use tracing::{Subscriber, debug};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer as SubscriberLayer};

use crate::{Timezone, UserConfig};

static WRITER_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());

static LOCAL_TIME: OnceLock<Result<OffsetTime<Rfc3339>, time::error::IndeterminateOffset>> =
    OnceLock::new();

/// Keeps the non-blocking writers alive. Dropping it flushes buffered output.
#[must_use]
pub struct GlobalLoggerGuard;

impl Drop for GlobalLoggerGuard {
    fn drop(&mut self) {
        debug!("Flushing log writers");
        if let Ok(mut guards) = WRITER_GUARDS.lock() {
            guards.clear();
        }
    }
}

// The local offset can only be read soundly while the process is single-threaded
#[ctor::ctor]
fn init_time() {
    LOCAL_TIME.set(OffsetTime::local_rfc_3339()).ok();
}

pub fn init() -> GlobalLoggerGuard {
    GlobalLoggerGuard
}

#[derive(thiserror::Error, Debug)]
pub enum LoggerCreationError {
    #[error("Error loading logging configuration: {0}")]
    ConfigFailure(#[from] confique::Error),
    #[cfg(feature = "windows-eventlog")]
    #[error("Error creating event log layer: {0}")]
    EventLogError(String),
}

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub enum LogTarget {
    EventLog,
    JournalD,
    OsLog,
    Stdout,
    Stderr,
}

/// Builds the subscriber that stands in for the service manager's log: the platform's system
/// log when the matching feature is enabled, plus stderr unless journald already collects it.
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    identity: ServiceIdentity,
    timezone: Timezone,
    output_buffer_limit: usize,
    user_config: UserConfig,
    target_directives: HashMap<LogTarget, Vec<Directive>>,
    env_filter_directives: Vec<Directive>,
    log_to_stdout: bool,
    log_to_stderr: Option<bool>,
}

impl LoggerBuilder {
    pub fn new(identity: ServiceIdentity) -> Self {
        Self {
            identity,
            timezone: Timezone::Local,
            // The default number of buffered lines is quite large and uses a ton of memory
            output_buffer_limit: 256,
            user_config: Default::default(),
            log_to_stdout: false,
            log_to_stderr: None,
            target_directives: Default::default(),
            env_filter_directives: vec![],
        }
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_log_to_stdout(mut self, log_to_stdout: bool) -> Self {
        self.log_to_stdout = log_to_stdout;
        self
    }

    /// Overrides the default, which logs to stderr unless the journald layer is active.
    pub fn with_log_to_stderr(mut self, log_to_stderr: bool) -> Self {
        self.log_to_stderr = Some(log_to_stderr);
        self
    }

    pub fn with_output_buffer_limit(mut self, output_buffer_limit: usize) -> Self {
        self.output_buffer_limit = output_buffer_limit;
        self
    }

    pub fn with_config(mut self, user_config: UserConfig) -> Self {
        self.user_config = user_config;
        self
    }

    /// Replaces the configuration with the one found in the environment and the optional
    /// config file next to the executable.
    pub fn load_config(mut self) -> Result<Self, LoggerCreationError> {
        self.user_config = UserConfig::load(&self.identity)?;
        Ok(self)
    }

    pub fn with_env_filter_directive(mut self, directive: Directive) -> Self {
        self.env_filter_directives.push(directive);
        self
    }

    pub fn with_target_directive(mut self, target: LogTarget, directive: Directive) -> Self {
        self.target_directives
            .entry(target)
            .or_default()
            .push(directive);
        self
    }

    fn base_filter(&self) -> EnvFilter {
        EnvFilter::from_default_env()
            .add_directive(self.user_config.log_level.to_level_filter().into())
    }

    fn get_filter_for_target(&self, target: LogTarget) -> EnvFilter {
        let mut env_filter = self.base_filter();
        if let Some(directives) = self.target_directives.get(&target) {
            for directive in directives {
                env_filter = env_filter.add_directive(directive.clone());
            }
        }
        env_filter
    }

    // systemd forwards stderr to the journal, so both sinks would record every event
    fn stderr_enabled(&self, journald_active: bool) -> bool {
        self.log_to_stderr.unwrap_or(!journald_active)
    }

    fn disabled_filter() -> EnvFilter {
        EnvFilter::from_default_env().add_directive(LevelFilter::OFF.into())
    }

    /// Registers the event log source. Only has an effect on Windows with the
    /// `windows-eventlog` feature, where it requires administrator rights.
    pub fn register(&self) -> Result<(), BoxedError> {
        #[cfg(all(windows, feature = "windows-eventlog"))]
        {
            use tracing_eventlog::EventLogRegistry;
            let log_source = tracing_eventlog::LogSource::application(self.identity.name());
            log_source.register()?;
        }
        Ok(())
    }

    pub fn deregister(&self) -> Result<(), BoxedError> {
        #[cfg(all(windows, feature = "windows-eventlog"))]
        {
            use tracing_eventlog::EventLogRegistry;
            let log_source = tracing_eventlog::LogSource::application(self.identity.name());
            log_source.deregister().ok();
        }
        Ok(())
    }

    pub fn build(
        self,
    ) -> Result<impl SubscriberInitExt + Subscriber + for<'a> LookupSpan<'a>, LoggerCreationError>
    {
        let offset = match (&self.timezone, LOCAL_TIME.get()) {
            (Timezone::Local, Some(Ok(offset))) => offset.to_owned(),
            (Timezone::Local, Some(Err(e))) => {
                eprintln!("Error getting local time: {e}");
                OffsetTime::new(UtcOffset::UTC, well_known::Rfc3339)
            }
            _ => OffsetTime::new(UtcOffset::UTC, well_known::Rfc3339),
        };

        let mut env_filter = self.base_filter();
        for directive in &self.env_filter_directives {
            env_filter = env_filter.add_directive(directive.clone());
        }

        let stdout_filter = if self.log_to_stdout {
            self.get_filter_for_target(LogTarget::Stdout)
        } else {
            Self::disabled_filter()
        };
        #[cfg(all(target_os = "linux", feature = "linux-journald"))]
        let journald = match tracing_journald::layer() {
            Ok(layer) => Some(layer),
            Err(e) => {
                eprintln!("Error creating journald logging layer, continuing without it: {e}");
                None
            }
        };
        #[cfg(all(target_os = "linux", feature = "linux-journald"))]
        let journald_active = journald.is_some();
        #[cfg(not(all(target_os = "linux", feature = "linux-journald")))]
        let journald_active = false;

        let stderr_filter = if self.stderr_enabled(journald_active) {
            self.get_filter_for_target(LogTarget::Stderr)
        } else {
            Self::disabled_filter()
        };

        let collector = tracing_subscriber::registry().with(env_filter);
        let (collector, stdout_guard) = with_console_layer(
            collector,
            stdout(),
            offset.clone(),
            stdout_filter,
            self.output_buffer_limit,
        );
        let (collector, stderr_guard) = with_console_layer(
            collector,
            stderr(),
            offset,
            stderr_filter,
            self.output_buffer_limit,
        );
        let collector = collector.with(tracing_error::ErrorLayer::default());

        #[cfg(all(target_os = "linux", feature = "linux-journald"))]
        let collector = collector.with(journald.map(|layer| {
            layer
                .with_syslog_identifier(self.identity.name().to_owned())
                .with_filter(self.get_filter_for_target(LogTarget::JournalD))
        }));

        #[cfg(all(target_os = "macos", feature = "mac-oslog"))]
        let collector = collector.with(
            tracing_oslog::OsLogger::new(self.identity.name(), "default")
                .with_filter(self.get_filter_for_target(LogTarget::OsLog)),
        );

        #[cfg(all(windows, feature = "windows-eventlog"))]
        let collector = collector.with(
            tracing_eventlog::EventLogLayer::pretty(self.identity.name().to_owned())
                .map_err(|e| LoggerCreationError::EventLogError(e.to_string()))?
                .with_filter(self.get_filter_for_target(LogTarget::EventLog)),
        );

        if let Ok(mut guards) = WRITER_GUARDS.lock() {
            *guards = vec![stdout_guard, stderr_guard];
        }
        Ok(collector)
    }
}

fn with_console_layer<S, W>(
    collector: S,
    writer: W,
    offset: OffsetTime<Rfc3339>,
    filter: EnvFilter,
    buffered_lines_limit: usize,
) -> (
    impl Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
    WorkerGuard,
)
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
    W: Write + Send + 'static,
{
    let (non_blocking, guard) = NonBlockingBuilder::default()
        .buffered_lines_limit(buffered_lines_limit)
        .finish(writer);
    let layer = Layer::new()
        .pretty()
        .with_timer(offset)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_writer(non_blocking)
        .with_filter(filter);
    (collector.with(layer), guard)
}

#[cfg(test)]
#[path = "./logger_builder_test.rs"]
mod logger_builder_test;
