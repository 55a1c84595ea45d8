use anyhow::{Context, Result};
use log::trace;
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use super::{Level, Record};
use crate::config::{Config, Mode};

/// A destination for formatted records with its own minimum level.
pub trait Sink: Send + Sync {
    fn level(&self) -> Level;

    fn write(&self, record: &Record) -> Result<()>;

    /// Writes the record if it clears this sink's own minimum level.
    /// Returns whether a line was written.
    fn emit(&self, record: &Record) -> Result<bool> {
        if !record.level.passes(self.level()) {
            return Ok(false);
        }

        self.write(record)?;
        Ok(true)
    }
}

pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    colorize: bool,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()), true)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, colorize: bool) -> Self {
        ConsoleSink {
            out: Mutex::new(out),
            colorize,
        }
    }
}

impl Sink for ConsoleSink {
    fn level(&self) -> Level {
        Level::Debug
    }

    fn write(&self, record: &Record) -> Result<()> {
        let line = record.format(self.colorize);
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("console sink lock poisoned"))?;

        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

/// Append-only file sink. Only error and fatal records are persisted.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;

        trace!("opened log file {}", path.display());

        Ok(FileSink {
            path: path.to_owned(),
            file: Mutex::new(file),
        })
    }
}

impl Sink for FileSink {
    fn level(&self) -> Level {
        Level::Error
    }

    fn write(&self, record: &Record) -> Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow::anyhow!("file sink lock poisoned"))?;

        writeln!(file, "{}", record.format(false))
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        Ok(())
    }
}

/// Both sinks, created once at startup and kept for the whole process.
#[derive(Clone)]
pub struct Sinks {
    pub console: Arc<dyn Sink>,
    pub file: Arc<dyn Sink>,
}

impl Sinks {
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Sinks {
            console: Arc::new(ConsoleSink::stdout()),
            file: Arc::new(FileSink::open(&config.error_log)?),
        })
    }

    pub fn select(&self, mode: Mode) -> Arc<dyn Sink> {
        match mode {
            Mode::Production => Arc::clone(&self.file),
            Mode::Development => Arc::clone(&self.console),
        }
    }
}
