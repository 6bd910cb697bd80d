//! Log setup for the two entry points.
//!
//! The terminal UI owns the screen, so it only writes to a file. The
//! listener runs in a plain terminal and echoes to it as well.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const UI_LOG_FILE: &str = "horn-ui.log";
pub const LISTENER_LOG_FILE: &str = "horn-listen.log";

/// Start logging to `<log_dir>/<file_name>`, optionally echoing info and
/// above to the terminal. Returns the log file path.
pub fn init(
    log_dir: &Path,
    file_name: &str,
    echo_to_terminal: bool,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(log_dir)?;
    let log_file = log_dir.join(file_name);

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![WriteLogger::new(
        LevelFilter::Debug,
        Config::default(),
        File::create(&log_file)?,
    )];
    if echo_to_terminal {
        loggers.push(TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(log_file)
}
