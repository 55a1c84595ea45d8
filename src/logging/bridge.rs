use anyhow::{Context, Result};
use log::{debug, LevelFilter, Log, Metadata, Record};
use std::panic;

use super::Console;

/// Routes the `log` facade through the gate: `error!` behaves like
/// `Console::error`, every other record like `Console::log`.
struct GateBridge {
    console: Console,
}

impl Log for GateBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        match record.level() {
            log::Level::Error => self.console.error(&message),
            _ => self.console.log(&message),
        }
    }

    fn flush(&self) {}
}

/// Installs the bridge as the process-wide `log` backend and replaces the
/// panic hook so panic reports go through the gate instead of stderr. Can
/// only succeed once per process.
pub fn install(console: Console) -> Result<()> {
    log::set_boxed_logger(Box::new(GateBridge { console }))
        .context("a log backend is already installed")?;
    log::set_max_level(LevelFilter::Debug);

    // Panics are caught and reported at error level by the router and the
    // worker pool, so the hook only adds the location at debug level.
    panic::set_hook(Box::new(|info| debug!("{}", info)));
    Ok(())
}
