//! Server configuration.

use std::time::Duration;

use drprobe_settings::{Settings, ServerSettings};

/// Listener configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind (default `"0.0.0.0"`, every interface).
    pub host: String,
    /// Port to bind (`0` for auto-assign).
    pub port: u16,
    /// How long in-flight requests may run after shutdown starts.
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

/// Identity shared by every handler, fixed at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    /// Name this instance reports and stamps on events.
    pub node: String,
    /// Configured database host, echoed by `/status`.
    pub db_host: String,
}

impl NodeInfo {
    /// Identity from explicit values.
    pub fn new(node: impl Into<String>, db_host: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            db_host: db_host.into(),
        }
    }

    /// Build from loaded settings, resolving the node name.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            drprobe_settings::resolve_node_name(settings.node_name.as_deref()),
            settings.database.host.clone(),
        )
    }
}
