//! Logger setup for the dashboard binary.
//!
//! Terminal output is kept to warnings so it does not drown the rendered
//! dashboard; the file log under the data directory gets everything from
//! info up.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILENAME: &str = "dashboard.log";

pub enum LogDestination {
    Terminal,
    /// Terminal plus `dashboard.log` in the data directory.
    Both,
}

pub fn initialize(destination: LogDestination, data_dir: &Path) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let LogDestination::Both = destination {
        if let Some(file_logger) = create_file_logger(LevelFilter::Info, config, data_dir) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    data_dir: &Path,
) -> Option<Box<WriteLogger<File>>> {
    if let Err(err) = dashboard_engine::ensure_data_dir(data_dir) {
        eprintln!("Warning: Could not prepare data dir {:?}: {}", data_dir, err);
        return None;
    }
    let log_path = data_dir.join(LOG_FILENAME);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
