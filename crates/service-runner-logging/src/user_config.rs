use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use confique::Config;
use service_runner_core::{ServiceIdentity, executable_dir};
use tracing::Level;
use tracing::metadata::LevelFilter;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LogLevel(pub Level);

impl LogLevel {
    pub(crate) fn to_level_filter(self) -> LevelFilter {
        LevelFilter::from_level(self.0)
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(Level::INFO)
    }
}

impl Deref for LogLevel {
    type Target = Level;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> serde::Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let val = String::deserialize(deserializer)?;
        let level = Level::from_str(&val).map_err(serde::de::Error::custom)?;
        Ok(LogLevel(level))
    }
}

/// Logging settings read from the environment and an optional `<name>.toml` next to the
/// executable. The environment wins.
#[derive(Debug, Clone, PartialEq, Eq, Config)]
pub struct UserConfig {
    #[config(env = "SERVICE_RUNNER_LOG_LEVEL", default = "info")]
    pub log_level: LogLevel,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
        }
    }
}

impl UserConfig {
    pub fn load(identity: &ServiceIdentity) -> Result<Self, confique::Error> {
        match config_file(identity) {
            Some(path) => Self::load_from(path),
            None => Self::builder().env().load(),
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, confique::Error> {
        Self::builder().env().file(path.as_ref()).load()
    }
}

pub fn config_file(identity: &ServiceIdentity) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = executable_dir(&exe).ok()?;
    Some(dir.join(format!("{}.toml", identity.name())))
}

#[cfg(test)]
#[path = "./user_config_test.rs"]
mod user_config_test;
