use serde::Serialize;
use std::{env, path::PathBuf, time::Duration};

use crate::logging::Level;

pub const MODE_ENV_VAR: &str = "APP_ENV";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_ERROR_LOG: &str = "errors.log";
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    /// Only the exact value `production` selects production; anything else,
    /// including an unset variable, is development.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Mode::Production,
            _ => Mode::Development,
        }
    }

    pub fn from_env() -> Self {
        Self::from_value(env::var(MODE_ENV_VAR).ok().as_deref())
    }

    /// Minimum level a record needs to get past the gate.
    pub fn threshold(&self) -> Level {
        match self {
            Mode::Production => Level::Info,
            Mode::Development => Level::Debug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub mode: Mode,
    pub listen_address: String,
    pub error_log: PathBuf,
    pub workers: usize,
    /// How long a connection may stay silent while its request is read.
    pub read_timeout: Duration,
}

impl Config {
    pub fn new(mode: Mode) -> Self {
        Config {
            mode,
            listen_address: DEFAULT_LISTEN_ADDRESS.to_owned(),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
            workers: DEFAULT_WORKERS,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn from_env() -> Self {
        Self::new(Mode::from_env())
    }

    pub fn threshold(&self) -> Level {
        self.mode.threshold()
    }
}
