use anyhow::Result;
use std::sync::Arc;

use super::{Level, Record, Sink, Sinks};
use crate::config::Config;

/// The gate every log call goes through. A record is forwarded to the sink
/// only when its level ranks at or above the threshold; the sink then
/// applies its own minimum level.
#[derive(Clone)]
pub struct Logger {
    threshold: Level,
    sink: Arc<dyn Sink>,
}

impl Logger {
    pub fn new(config: &Config, sinks: &Sinks) -> Self {
        Self::with_sink(config.threshold(), sinks.select(config.mode))
    }

    pub fn with_sink(threshold: Level, sink: Arc<dyn Sink>) -> Self {
        Logger { threshold, sink }
    }

    pub fn enabled(&self, level: Level) -> bool {
        level.passes(self.threshold)
    }

    /// Returns whether a line reached the sink.
    pub fn try_log(&self, level: Level, message: &str) -> Result<bool> {
        if !self.enabled(level) {
            return Ok(false);
        }

        self.sink.emit(&Record::new(level, message))
    }

    pub fn log(&self, level: Level, message: &str) {
        // The sink itself is broken, so stderr is the only place left.
        if let Err(e) = self.try_log(level, message) {
            eprintln!("failed to write {} record: {:#}", level, e);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn http(&self, message: &str) {
        self.log(Level::Http, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn fatal(&self, message: &str) {
        self.log(Level::Fatal, message);
    }
}
