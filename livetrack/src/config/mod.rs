//! Service configuration.
//!
//! Settings come from an INI file (`~/.livetrack/config.ini` by default),
//! overlaid on built-in defaults. Missing files and missing keys are not
//! errors; malformed values are.
//!
//! # Example
//!
//! ```
//! use livetrack::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.tracking.stale_after_secs, 90);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use file::{
    config_directory, config_file_path, AssignmentSettings, ConfigFile, ConfigFileError,
    LoggingSettings, NotifySettings, ServerSettings, TrackingSettings, DEFAULT_ASSIGNMENT_TIMEOUT_SECS,
    DEFAULT_BIND, DEFAULT_EVICT_GRACE_SECS, DEFAULT_LOOKUP_TIMEOUT_MS, DEFAULT_NEARBY_LIMIT,
    DEFAULT_NOTIFY_QUEUE_CAPACITY, DEFAULT_PORT, DEFAULT_STALE_AFTER_SECS,
    DEFAULT_SWEEP_INTERVAL_SECS, MAX_STALE_AFTER_SECS, MIN_STALE_AFTER_SECS,
};
