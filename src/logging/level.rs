use anyhow::bail;
use colored::Color;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Severity of a log record. Variants are declared in rank order so the
/// derived ordering matches `rank()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Http,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Http,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Fatal,
    ];

    pub fn rank(&self) -> u8 {
        match self {
            Level::Debug => 0,
            Level::Http => 1,
            Level::Info => 2,
            Level::Warning => 3,
            Level::Error => 4,
            Level::Fatal => 5,
        }
    }

    /// Display color used by the console sink.
    pub fn color(&self) -> Color {
        match self {
            Level::Debug => Color::Blue,
            Level::Http => Color::Green,
            Level::Info => Color::Cyan,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
            Level::Fatal => Color::Magenta,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Http => "http",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    pub fn passes(&self, threshold: Level) -> bool {
        self.rank() >= threshold.rank()
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "debug" => Level::Debug,
            "http" => Level::Http,
            "info" => Level::Info,
            "warning" => Level::Warning,
            "error" => Level::Error,
            "fatal" => Level::Fatal,
            value => bail!("unknown log level: {}", value),
        })
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
