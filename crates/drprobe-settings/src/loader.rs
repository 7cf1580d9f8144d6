//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`Settings::default()`]
//! 2. If a settings file is given, deep-merge its values over the defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Environment lookups go through a caller-supplied function so the override
//! rules can be tested without mutating the process environment.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::Settings;

/// Environment variable that points at an optional JSON settings file.
pub const CONFIG_PATH_ENV: &str = "DRPROBE_CONFIG";

/// Load settings from an optional file, then apply process env overrides.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Load settings using `lookup` to read environment variables.
///
/// A given path must exist and contain valid JSON.
pub fn load_settings_with<F>(path: Option<&Path>, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(Settings::default())?;

    let merged = match path {
        Some(path) => {
            debug!(?path, "loading settings from file");
            let content = std::fs::read_to_string(path)?;
            let user: Value = serde_json::from_str(&content)?;
            deep_merge(defaults, user)
        }
        None => defaults,
    };

    let mut settings: Settings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, lookup);
    validate(&settings)?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Empty strings count as unset, except `DB_PASS` where an empty password is
/// a legitimate value. Invalid numbers are ignored with a warning.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // ── Database ────────────────────────────────────────────────────
    if let Some(v) = non_empty(lookup("DB_HOST")) {
        settings.database.host = v;
    }
    if let Some(v) = read_u16(&lookup, "DB_PORT") {
        settings.database.port = v;
    }
    if let Some(v) = non_empty(lookup("DB_NAME")) {
        settings.database.name = v;
    }
    if let Some(v) = non_empty(lookup("DB_USER")) {
        settings.database.user = v;
    }
    if let Some(v) = lookup("DB_PASS") {
        settings.database.password = v;
    }

    // ── Node identity ───────────────────────────────────────────────
    if let Some(v) = non_empty(lookup("NODE_NAME")) {
        settings.node_name = Some(v);
    }

    // ── Listener ────────────────────────────────────────────────────
    if let Some(v) = non_empty(lookup("DRPROBE_HOST")) {
        settings.server.host = v;
    }
    if let Some(v) = read_u16(&lookup, "DRPROBE_PORT") {
        settings.server.port = v;
    }
}

/// Reject settings that cannot produce a working node.
pub fn validate(settings: &Settings) -> Result<()> {
    if settings.database.host.trim().is_empty() {
        return Err(SettingsError::InvalidValue("database host is empty".into()));
    }
    if settings.database.port == 0 {
        return Err(SettingsError::InvalidValue("database port must be non-zero".into()));
    }
    if settings.database.connect_timeout_secs == 0 {
        return Err(SettingsError::InvalidValue(
            "connect timeout must be at least one second".into(),
        ));
    }
    Ok(())
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn non_empty(val: Option<String>) -> Option<String> {
    val.filter(|v| !v.is_empty())
}

fn read_u16<F>(lookup: &F, name: &str) -> Option<u16>
where
    F: Fn(&str) -> Option<String>,
{
    let val = lookup(name)?;
    let result = parse_u16_range(&val, 1, u16::MAX);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid port env var, ignoring");
    }
    result
}
