//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::defaults::{MAX_STALE_AFTER_SECS, MIN_STALE_AFTER_SECS};
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to the commented INI text written by
/// `livetrack init-config`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let assignment_url = config.assignment.url.as_deref().unwrap_or("");
    let webhook_url = config.notify.webhook_url.as_deref().unwrap_or("");

    format!(
        r#"[server]
; Interface and port for the tracking API
bind = {}
port = {}

[tracking]
; Seconds without a report before a driver's position is hidden from
; customers ({}-{})
stale_after_secs = {}
; Extra seconds past staleness before the entry is dropped from memory
evict_grace_secs = {}
; Seconds between eviction sweeps
sweep_interval_secs = {}
; Upper bound on the order service lookup per tracking request
lookup_timeout_ms = {}
; Maximum drivers returned by /drivers/nearby
nearby_limit = {}

[assignment]
; Order service base URL; the service must answer
;   GET <url>/orders/<order_id>/assignment
; Required for `livetrack serve` unless --demo is given
url = {}
; HTTP client timeout in seconds
timeout_secs = {}

[notify]
; Optional webhook receiving driver online/offline/expired events as JSON
webhook_url = {}
; Event buffer size before slow consumers start losing events
queue_capacity = {}

[logging]
directory = {}
file = {}
"#,
        config.server.bind,
        config.server.port,
        MIN_STALE_AFTER_SECS,
        MAX_STALE_AFTER_SECS,
        config.tracking.stale_after_secs,
        config.tracking.evict_grace_secs,
        config.tracking.sweep_interval_secs,
        config.tracking.lookup_timeout_ms,
        config.tracking.nearby_limit,
        assignment_url,
        config.assignment.timeout_secs,
        webhook_url,
        config.notify.queue_capacity,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
