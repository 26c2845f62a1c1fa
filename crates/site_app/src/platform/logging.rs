//! Logging initialization for the site binary.
//!
//! Terminal output goes to stderr so rendered screens on stdout stay clean;
//! the optional file destination is `./site.log`.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub enum LogDestination {
    Terminal,
    /// Terminal and `./site.log`.
    Both,
}

pub fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let LogDestination::Both = destination {
        if let Some(file_logger) = create_file_logger(LevelFilter::Debug, config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from("./site.log");
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
