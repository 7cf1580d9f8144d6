//! Router assembly and listener lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use drprobe_store::EventStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::{NodeInfo, ServerConfig};
use crate::handlers;

/// Shared state accessible from Axum handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Node name and configured database host.
    pub info: Arc<NodeInfo>,
    /// Store every data endpoint goes through.
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    /// Wrap startup values for sharing across handlers.
    pub fn new(info: NodeInfo, store: Arc<dyn EventStore>) -> Self {
        Self {
            info: Arc::new(info),
            store,
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route("/write", post(handlers::write))
        .route("/last", get(handlers::last))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind the listener and serve in a background task.
pub async fn start(config: ServerConfig, state: AppState) -> Result<ServerHandle, std::io::Error> {
    let node = state.info.node.clone();
    let router = build_router(state);

    // Binds every interface by default, not only the VIP. Routing writes to
    // the primary is the load balancer's job.
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, node = %node, "drprobe server started");

    let token = CancellationToken::new();
    let cancelled = token.clone();
    let server = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move { cancelled.cancelled().await })
            .await;
        if let Err(e) = result {
            error!(error = %e, "server terminated");
        }
    });

    Ok(ServerHandle {
        addr: local_addr,
        token,
        shutdown_timeout: config.shutdown_timeout,
        server,
    })
}

/// Handle returned by [`start`]; keeps the server task alive.
pub struct ServerHandle {
    addr: SocketAddr,
    token: CancellationToken,
    shutdown_timeout: Duration,
    server: JoinHandle<()>,
}

impl ServerHandle {
    /// The bound address (useful with port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The bound port.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Stop accepting connections and drain in-flight requests. Requests
    /// still running after the shutdown timeout are dropped.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        info!(
            timeout_secs = self.shutdown_timeout.as_secs(),
            "waiting for in-flight requests"
        );

        if tokio::time::timeout(self.shutdown_timeout, &mut self.server)
            .await
            .is_err()
        {
            warn!("shutdown timed out after {:?}, aborting", self.shutdown_timeout);
            self.server.abort();
        }
        info!("drprobe server stopped");
    }
}
