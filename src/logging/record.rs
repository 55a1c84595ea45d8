use chrono::{DateTime, Local};
use colored::Colorize;

use super::Level;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl Record {
    pub fn new(level: Level, message: &str) -> Self {
        Record {
            timestamp: Local::now(),
            level,
            message: message.to_owned(),
        }
    }

    /// `[YYYY-MM-DD HH:mm:ss] level: message`, optionally with the level name
    /// painted in its console color.
    pub fn format(&self, colorize: bool) -> String {
        let timestamp = self.timestamp.format(TIMESTAMP_FORMAT);
        if colorize {
            let level = self.level.as_str().color(self.level.color());
            format!("[{}] {}: {}", timestamp, level, self.message)
        } else {
            format!("[{}] {}: {}", timestamp, self.level, self.message)
        }
    }
}
