//! Settings type definitions.
//!
//! Field names are camelCase in the JSON file. Every section implements
//! [`Default`] and is `#[serde(default)]`, so a partial file only overrides
//! what it names.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root settings for a drprobe node.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Explicit node identity. When unset the host's network name is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    /// PostgreSQL connection parameters.
    pub database: DatabaseSettings,
    /// HTTP listener settings.
    pub server: ServerSettings,
}

/// Connection parameters for the shared event store.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Database host name or address.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Login role.
    pub user: String,
    /// Login password (may be empty).
    pub password: String,
    /// Upper bound on establishing a connection, in seconds.
    pub connect_timeout_secs: u64,
}

impl DatabaseSettings {
    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            connect_timeout_secs: 3,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            // All interfaces, not only the VIP: on a primary/standby pair both
            // nodes answer regardless of role.
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_defaults() {
        let db = DatabaseSettings::default();
        assert_eq!(db.host, "127.0.0.1");
        assert_eq!(db.port, 5432);
        assert_eq!(db.name, "postgres");
        assert_eq!(db.user, "postgres");
        assert!(db.password.is_empty());
        assert_eq!(db.connect_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn server_binds_all_interfaces_by_default() {
        let server = ServerSettings::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn debug_redacts_password() {
        let db = DatabaseSettings {
            password: "hunter2".to_string(),
            ..DatabaseSettings::default()
        };
        let printed = format!("{db:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn camel_case_partial_json() {
        let json = r#"{"nodeName":"pg-a","database":{"connectTimeoutSecs":5}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.node_name.as_deref(), Some("pg-a"));
        assert_eq!(settings.database.connect_timeout_secs, 5);
        assert_eq!(settings.database.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn node_name_omitted_when_unset() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json.get("nodeName").is_none());
    }
}
