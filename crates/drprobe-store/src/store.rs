//! The store seam used by the HTTP handlers.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::event::{Event, EventLimit, InsertedEvent};

/// Access to the shared event store.
///
/// Each call is one self-contained round trip: implementations acquire their
/// own connection, release it before returning, and keep no state about
/// earlier calls (including whether the table is known to exist).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Whether the store is currently a read-only replica.
    async fn is_in_recovery(&self) -> Result<bool, StoreError>;

    /// Ensure the table exists, then append one event attributed to `node`.
    async fn record_event(&self, node: &str, note: &str) -> Result<InsertedEvent, StoreError>;

    /// Ensure the table exists, then return up to `limit` events, newest first.
    async fn recent_events(&self, limit: EventLimit) -> Result<Vec<Event>, StoreError>;
}
