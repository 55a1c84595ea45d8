use super::Logger;

/// Stand-in for the two generic print entry points: plain output goes through
/// the gate at debug, error output at error.
#[derive(Clone)]
pub struct Console {
    logger: Logger,
}

impl Console {
    pub fn new(logger: Logger) -> Self {
        Console { logger }
    }

    pub fn log(&self, message: &str) {
        self.logger.debug(message);
    }

    pub fn error(&self, message: &str) {
        self.logger.error(message);
    }
}
