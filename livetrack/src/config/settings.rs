//! Settings structs, one per `[section]` of the INI file.
//!
//! Plain data only. Parsing lives in [`super::parser`], serialization in
//! [`super::writer`].

use std::path::PathBuf;

/// Complete service configuration loaded from `config.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub tracking: TrackingSettings,
    pub assignment: AssignmentSettings,
    pub notify: NotifySettings,
    pub logging: LoggingSettings,
}

/// HTTP listener.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Interface address to bind
    pub bind: String,
    /// TCP port
    pub port: u16,
}

/// Position store and lookup tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    /// Seconds after which a position is hidden from reads
    pub stale_after_secs: u64,
    /// Extra seconds past staleness before an entry is evicted
    pub evict_grace_secs: u64,
    /// Seconds between eviction sweeps
    pub sweep_interval_secs: u64,
    /// Upper bound on the assignment lookup, in milliseconds
    pub lookup_timeout_ms: u64,
    /// Maximum drivers returned by a nearby query
    pub nearby_limit: usize,
}

/// Order service connection.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentSettings {
    /// Base URL of the order service; `None` means not configured
    pub url: Option<String>,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

/// Driver lifecycle notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifySettings {
    /// Webhook receiving driver online/offline/expired events
    pub webhook_url: Option<String>,
    /// Event channel capacity
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
