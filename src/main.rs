//! # drprobe
//!
//! Node identity and primary/standby probe. Wires settings, logging, the
//! event store and the HTTP server together.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use drprobe_server::{AppState, NodeInfo, ServerConfig};
use drprobe_settings::{CONFIG_PATH_ENV, Settings};
use drprobe_store::{EventStore, MemoryEventStore, PgEventStore};
use drprobe_telemetry::TelemetryConfig;

/// drprobe server.
#[derive(Parser, Debug)]
#[command(name = "drprobe", about = "Reports node role and records events in PostgreSQL")]
struct Cli {
    /// Optional JSON settings file.
    #[arg(long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Name this node reports (overrides `NODE_NAME`).
    #[arg(long)]
    node_name: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Serve from an in-process store instead of PostgreSQL.
    #[arg(long)]
    in_memory: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(name) = &self.node_name {
            settings.node_name = Some(name.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut settings =
        drprobe_settings::load_settings(args.config.as_deref()).context("Failed to load settings")?;
    args.apply(&mut settings);

    drprobe_telemetry::init_telemetry(&TelemetryConfig {
        json: args.log_json,
        ..TelemetryConfig::default()
    })
    .context("Failed to initialize logging")?;

    let info = NodeInfo::from_settings(&settings);
    tracing::info!(node = %info.node, database = ?settings.database, "settings loaded");

    let store: Arc<dyn EventStore> = if args.in_memory {
        tracing::warn!("serving from an in-memory store, nothing is persisted");
        Arc::new(MemoryEventStore::primary())
    } else {
        Arc::new(PgEventStore::new(&settings.database))
    };

    let config = ServerConfig::from(&settings.server);
    if config.host == "0.0.0.0" {
        // Both nodes answer on every interface, not only on the VIP.
        tracing::warn!("listening on all interfaces, role routing is left to the load balancer");
    }

    let handle = drprobe_server::start(config, AppState::new(info, store))
        .await
        .context("Failed to start server")?;
    tracing::info!(port = handle.port(), "drprobe ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl+c")?;

    tracing::info!("Shutting down");
    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["drprobe"]).unwrap();
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.log_json);
        assert!(!cli.in_memory);
    }

    #[test]
    fn cli_overrides_win_over_settings() {
        let cli = Cli::try_parse_from([
            "drprobe",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--node-name",
            "pg-b",
        ])
        .unwrap();
        let mut settings = Settings::default();
        settings.node_name = Some("from-env".into());
        cli.apply(&mut settings);

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.node_name.as_deref(), Some("pg-b"));
    }

    #[test]
    fn cli_keeps_settings_when_flags_absent() {
        let cli = Cli::try_parse_from(["drprobe", "--in-memory", "--log-json"]).unwrap();
        let mut settings = Settings::default();
        settings.server.port = 7000;
        cli.apply(&mut settings);

        assert_eq!(settings.server.port, 7000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(cli.in_memory);
        assert!(cli.log_json);
    }

    #[test]
    fn cli_rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["drprobe", "--port", "70000"]).is_err());
    }
}
