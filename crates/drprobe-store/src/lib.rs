//! # drprobe-store
//!
//! Access to the shared `dr_events` table. [`PgEventStore`] talks to
//! PostgreSQL with one connection per call; [`MemoryEventStore`] stands in for
//! it in tests and demos.

#![deny(unsafe_code)]

pub mod error;
pub mod event;
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use event::{Event, EventLimit, InsertedEvent, Role};
pub use memory::{MemoryEventStore, MemoryMode};
pub use postgres::PgEventStore;
pub use store::EventStore;
