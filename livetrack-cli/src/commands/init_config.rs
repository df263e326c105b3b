//! Init-config command - write a default config file.

use std::path::{Path, PathBuf};

use livetrack::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Write the default config to `path` (or `~/.livetrack/config.ini`).
///
/// Returns the path written.
pub fn run(path: Option<PathBuf>, force: bool) -> Result<PathBuf, CliError> {
    let path = path.unwrap_or_else(config_file_path);
    write_default(&path, force)?;
    println!("Wrote default configuration to {}", path.display());
    println!("Set [assignment] url before running `livetrack serve`.");
    Ok(path)
}

fn write_default(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::ConfigExists(path.to_path_buf()));
    }
    ConfigFile::default().save_to(path)?;
    Ok(())
}
