//! Stderr logger with a level picked from flags or the environment.

use std::sync::OnceLock;

use clap::ArgMatches;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the logger. `--quiet` silences everything, `--verbose` enables
/// debug output, otherwise `RUST_LOG` picks the level and Info is the
/// default.
pub fn init(args: &ArgMatches) {
    let filter = if args.get_flag("quiet") {
        LevelFilter::Off
    } else if args.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        match std::env::var("RUST_LOG") {
            Ok(value) => match value.to_lowercase().as_str() {
                "error" => LevelFilter::Error,
                "warn" => LevelFilter::Warn,
                "debug" => LevelFilter::Debug,
                "trace" => LevelFilter::Trace,
                _ => LevelFilter::Info,
            },
            Err(_) => LevelFilter::Info,
        }
    };

    let logger = LOGGER.get_or_init(|| StderrLogger {
        level: filter.to_level().unwrap_or(Level::Error),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(filter);
    }
}
