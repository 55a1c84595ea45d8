pub mod bridge;
pub mod console;
pub mod level;
pub mod logger;
pub mod record;
pub mod sink;

pub use self::console::Console;
pub use self::level::Level;
pub use self::logger::Logger;
pub use self::record::Record;
pub use self::sink::{ConsoleSink, FileSink, Sink, Sinks};
