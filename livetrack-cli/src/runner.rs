//! Shared command setup: config loading and logging.

use std::path::Path;

use livetrack::config::ConfigFile;
use livetrack::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Holds the loaded config and keeps logging alive for the command.
pub struct CliRunner {
    _logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (default path unless `config_path` is given) and start
    /// logging as configured.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!("LiveTrack v{}", livetrack::VERSION);
        info!(
            log_file = %self.config.logging.directory.join(&self.config.logging.file).display(),
            "LiveTrack CLI: {} command",
            command
        );
    }
}
