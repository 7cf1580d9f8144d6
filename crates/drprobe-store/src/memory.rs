//! In-process [`EventStore`] that mimics the observable behaviour of a
//! PostgreSQL primary or standby.
//!
//! Used by tests and by `drprobe --in-memory` for demos without a database.
//! A standby rejects the schema-ensure statement the same way PostgreSQL
//! does, so writes and lists both fail with [`StoreError::ReadOnly`].

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::StoreError;
use crate::event::{Event, EventLimit, InsertedEvent, Role};
use crate::store::EventStore;

/// What the in-memory store pretends to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryMode {
    /// Accepts writes.
    Primary,
    /// In recovery; rejects the schema-ensure statement.
    Standby,
    /// Every connection attempt is refused.
    Unreachable,
}

#[derive(Debug)]
struct State {
    mode: MemoryMode,
    table_exists: bool,
    next_id: i64,
    events: Vec<Event>,
    connections: u64,
}

/// [`EventStore`] kept in process memory.
#[derive(Debug)]
pub struct MemoryEventStore {
    state: Mutex<State>,
}

impl MemoryEventStore {
    /// Empty store in `mode`, without the table.
    pub fn new(mode: MemoryMode) -> Self {
        Self {
            state: Mutex::new(State {
                mode,
                table_exists: false,
                next_id: 1,
                events: Vec::new(),
                connections: 0,
            }),
        }
    }

    /// Shorthand for [`MemoryMode::Primary`].
    pub fn primary() -> Self {
        Self::new(MemoryMode::Primary)
    }

    /// Shorthand for [`MemoryMode::Standby`].
    pub fn standby() -> Self {
        Self::new(MemoryMode::Standby)
    }

    /// Shorthand for [`MemoryMode::Unreachable`].
    pub fn unreachable() -> Self {
        Self::new(MemoryMode::Unreachable)
    }

    /// Switch role, e.g. to simulate promotion or a lost link.
    pub fn set_mode(&self, mode: MemoryMode) {
        self.state.lock().mode = mode;
    }

    /// Current mode.
    pub fn mode(&self) -> MemoryMode {
        self.state.lock().mode
    }

    /// Rows stored so far.
    pub fn row_count(&self) -> usize {
        self.state.lock().events.len()
    }

    /// Whether a call has created the table yet.
    pub fn table_exists(&self) -> bool {
        self.state.lock().table_exists
    }

    /// Number of successful connection attempts so far.
    pub fn connections(&self) -> u64 {
        self.state.lock().connections
    }

    /// Preload rows as if replicated from a primary, creating the table.
    pub fn seed(&self, node: &str, notes: &[&str]) {
        let mut state = self.state.lock();
        state.table_exists = true;
        for note in notes {
            let _ = state.append(node, note);
        }
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::primary()
    }
}

impl State {
    fn connect(&mut self) -> Result<(), StoreError> {
        if self.mode == MemoryMode::Unreachable {
            return Err(StoreError::Connect("connection refused".into()));
        }
        self.connections += 1;
        Ok(())
    }

    fn role(&self) -> Role {
        Role::from_recovery(self.mode == MemoryMode::Standby)
    }

    fn ensure_table(&mut self) -> Result<(), StoreError> {
        if self.role() == Role::Standby {
            return Err(StoreError::ReadOnly(
                "cannot execute CREATE TABLE in a read-only transaction".into(),
            ));
        }
        self.table_exists = true;
        Ok(())
    }

    fn append(&mut self, node: &str, note: &str) -> InsertedEvent {
        let now = Utc::now();
        // Keep ts monotonic even if the wall clock steps back.
        let ts = self.events.last().map_or(now, |last| last.ts.max(now));
        let id = self.next_id;
        self.next_id += 1;
        self.events.push(Event {
            id,
            ts,
            node: node.to_string(),
            note: note.to_string(),
        });
        InsertedEvent { id, ts }
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn is_in_recovery(&self) -> Result<bool, StoreError> {
        let mut state = self.state.lock();
        state.connect()?;
        Ok(state.role() == Role::Standby)
    }

    async fn record_event(&self, node: &str, note: &str) -> Result<InsertedEvent, StoreError> {
        let mut state = self.state.lock();
        state.connect()?;
        state.ensure_table()?;
        Ok(state.append(node, note))
    }

    async fn recent_events(&self, limit: EventLimit) -> Result<Vec<Event>, StoreError> {
        let mut state = self.state.lock();
        state.connect()?;
        state.ensure_table()?;
        let take = usize::try_from(limit.get()).unwrap_or(0);
        Ok(state.events.iter().rev().take(take).cloned().collect())
    }
}
