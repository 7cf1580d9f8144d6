//! # drprobe-server
//!
//! Axum HTTP surface for a drprobe node.
//!
//! - `GET /health` answers without touching the database
//! - `GET /status` reports `primary` or `standby` from `pg_is_in_recovery()`
//! - `POST /write` and `GET /last` append to and list `dr_events`
//!
//! Every store failure becomes `{node, error}` with status 500, so a client
//! polling a standby sees its writes rejected the same way it sees an outage.

#![deny(unsafe_code)]

pub mod config;
pub mod handlers;
pub mod responses;
pub mod server;

pub use config::{NodeInfo, ServerConfig};
pub use server::{AppState, ServerHandle, build_router, start};
