//! Console logger for the `log` facade.
use core::fmt::Write;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, set_logger, set_max_level};
use spin::{Mutex, Once};

/// Anything a log line can be written to, usually the boot console.
pub type Console = Mutex<dyn Write + Send>;

pub struct Logger {
    console: Once<&'static Console>,
}

impl Logger {
    pub const fn new() -> Logger {
        Logger {
            console: Once::new(),
        }
    }

    /// Attach the console. Only the first call has effect.
    pub fn attach(&self, console: &'static Console) {
        self.console.call_once(|| console);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

fn level_color(level: Level) -> u8 {
    match level {
        Level::Error => 31, // Red
        Level::Warn => 93,  // BrightYellow
        Level::Info => 37,  // White
        Level::Debug => 32, // Green
        Level::Trace => 90, // BrightBlack
    }
}

impl Log for Logger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        self.console.is_completed()
    }

    fn log(&self, record: &Record) {
        let Some(console) = self.console.get() else {
            return;
        };
        let mut out = console.lock();
        // Nowhere to report a failing console.
        let _ = out.write_fmt(format_args!(
            "\u{1B}[{}m[{:}] {}\u{1B}[0m\n",
            level_color(record.level()),
            record.level(),
            record.args(),
        ));
    }

    fn flush(&self) {}
}

static LOGGER: Logger = Logger::new();

/// Install the console logger as the global `log` backend.
pub fn init(console: &'static Console, level: LevelFilter) -> Result<(), SetLoggerError> {
    set_logger(&LOGGER)?;
    LOGGER.attach(console);
    set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{boxed::Box, string::String};

    #[test]
    fn writes_colored_level_line() {
        let console: &'static Mutex<String> = Box::leak(Box::new(Mutex::new(String::new())));
        let logger = Logger::new();
        logger.attach(console);
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("Not found any machine"))
                .build(),
        );
        assert_eq!(
            console.lock().as_str(),
            "\u{1B}[93m[WARN] Not found any machine\u{1B}[0m\n"
        );
    }

    #[test]
    fn detached_logger_is_disabled() {
        let logger = Logger::new();
        assert!(!logger.enabled(&Metadata::builder().level(Level::Error).build()));
    }
}
