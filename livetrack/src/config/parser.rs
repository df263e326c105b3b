//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The only place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::clamp_stale_after;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
/// Unknown sections and keys are ignored.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = non_empty(section, "bind") {
            config.server.bind = v.to_string();
        }
        if let Some(v) = section.get("port") {
            config.server.port = parse_value("server", "port", v, "must be a port number (0-65535)")?;
        }
    }

    // [tracking] section
    if let Some(section) = ini.section(Some("tracking")) {
        if let Some(v) = section.get("stale_after_secs") {
            let secs = parse_value(
                "tracking",
                "stale_after_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
            config.tracking.stale_after_secs = clamp_stale_after(secs);
        }
        if let Some(v) = section.get("evict_grace_secs") {
            config.tracking.evict_grace_secs = parse_value(
                "tracking",
                "evict_grace_secs",
                v,
                "must be a non-negative integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("sweep_interval_secs") {
            config.tracking.sweep_interval_secs = parse_positive(
                "tracking",
                "sweep_interval_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("lookup_timeout_ms") {
            config.tracking.lookup_timeout_ms = parse_positive(
                "tracking",
                "lookup_timeout_ms",
                v,
                "must be a positive integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("nearby_limit") {
            config.tracking.nearby_limit =
                parse_positive("tracking", "nearby_limit", v, "must be a positive integer")?
                    as usize;
        }
    }

    // [assignment] section
    if let Some(section) = ini.section(Some("assignment")) {
        if let Some(v) = non_empty(section, "url") {
            config.assignment.url = Some(parse_url("assignment", "url", v)?);
        }
        if let Some(v) = section.get("timeout_secs") {
            config.assignment.timeout_secs = parse_positive(
                "assignment",
                "timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [notify] section
    if let Some(section) = ini.section(Some("notify")) {
        if let Some(v) = non_empty(section, "webhook_url") {
            config.notify.webhook_url = Some(parse_url("notify", "webhook_url", v)?);
        }
        if let Some(v) = section.get("queue_capacity") {
            config.notify.queue_capacity =
                parse_positive("notify", "queue_capacity", v, "must be a positive integer")?
                    as usize;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

/// A trimmed value, treating blank entries as unset.
fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<u64, ConfigFileError> {
    match parse_value::<u64>(section, key, value, reason)? {
        0 => Err(invalid(section, key, value, reason)),
        n => Ok(n),
    }
}

fn parse_url(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.to_string())
    } else {
        Err(invalid(
            section,
            key,
            value,
            "must start with http:// or https://",
        ))
    }
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
