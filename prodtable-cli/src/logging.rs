//! Logger setup

use std::fs;
use std::fs::File;

use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::ConfigBuilder;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::paths;

/// Log target reaching the log file only.
///
/// `main` reports fatal errors on stderr itself and logs them here.
pub const FILE_ONLY_TARGET: &str = "prodtable::file";

/// Terminal logger config; drops [`FILE_ONLY_TARGET`] records.
fn terminal_config() -> Config {
    ConfigBuilder::new().add_filter_ignore_str(FILE_ONLY_TARGET).build()
}

/// Maps the `-v` count to a terminal log level.
fn terminal_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs to stderr at the requested verbosity and to `latest.log` in the
/// cache directory at debug level.
pub fn init(verbosity: u8) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        terminal_level(verbosity),
        terminal_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    paths::rotate_logs();
    if let Some(path) = paths::log_file() {
        let created = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| File::create(&path));
        match created {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("Warning: cannot write log file {}: {}", path.display(), e),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Warning: logger already initialized: {}", e);
    }
}
