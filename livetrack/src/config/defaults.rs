//! Default values and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::logging::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};

// =============================================================================
// [server]
// =============================================================================

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// [tracking]
// =============================================================================

/// Staleness threshold (90s covers several missed pings at the usual
/// 10-30s reporting interval).
pub const DEFAULT_STALE_AFTER_SECS: u64 = 90;
pub const MIN_STALE_AFTER_SECS: u64 = 10;
pub const MAX_STALE_AFTER_SECS: u64 = 3600;

pub const DEFAULT_EVICT_GRACE_SECS: u64 = 3600;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_NEARBY_LIMIT: usize = 20;

// =============================================================================
// [assignment] / [notify]
// =============================================================================

pub const DEFAULT_ASSIGNMENT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_NOTIFY_QUEUE_CAPACITY: usize = 64;

/// Clamps the staleness threshold and warns if the configured value was
/// out of range.
pub(super) fn clamp_stale_after(value: u64) -> u64 {
    let clamped = value.clamp(MIN_STALE_AFTER_SECS, MAX_STALE_AFTER_SECS);
    if clamped != value {
        tracing::warn!(
            requested = value,
            min = MIN_STALE_AFTER_SECS,
            max = MAX_STALE_AFTER_SECS,
            "stale_after_secs out of range, clamping to {}",
            clamped
        );
    }
    clamped
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind: DEFAULT_BIND.to_string(),
                port: DEFAULT_PORT,
            },
            tracking: TrackingSettings {
                stale_after_secs: DEFAULT_STALE_AFTER_SECS,
                evict_grace_secs: DEFAULT_EVICT_GRACE_SECS,
                sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
                lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
                nearby_limit: DEFAULT_NEARBY_LIMIT,
            },
            assignment: AssignmentSettings {
                url: None,
                timeout_secs: DEFAULT_ASSIGNMENT_TIMEOUT_SECS,
            },
            notify: NotifySettings {
                webhook_url: None,
                queue_capacity: DEFAULT_NOTIFY_QUEUE_CAPACITY,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_stale_after() {
        assert_eq!(clamp_stale_after(90), 90);
        assert_eq!(clamp_stale_after(0), MIN_STALE_AFTER_SECS);
        assert_eq!(clamp_stale_after(86_400), MAX_STALE_AFTER_SECS);
    }
}
