use std::thread;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: Logger = Logger;

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

struct Logger;

fn prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[1;31mERROR:",
        Level::Warn => "\x1b[1;33mWARNING:",
        Level::Info => "\x1b[0;32mINFO:",
        Level::Debug => "\x1b[0;37mDEBUG:",
        Level::Trace => "\x1b[0;90mTRACE:",
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let current = thread::current();
        eprintln!(
            "{} [{}] {}\x1b[0m",
            prefix(record.level()),
            current.name().unwrap_or("main"),
            record.args()
        );
    }

    fn flush(&self) {}
}
