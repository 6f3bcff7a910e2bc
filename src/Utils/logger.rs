use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot create log file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Install a terminal logger and, if `file` is given, a second logger writing to that file.
/// Can succeed only once per process.
pub fn init_logger(level: LevelFilter, file: Option<&Path>) -> Result<(), LoggerError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = file {
        let f = File::create(path).map_err(|source| LoggerError::File {
            path: path.display().to_string(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), f));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}
