//! PostgreSQL store over one `PgConnection` per call.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drprobe_settings::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::event::{Event, EventLimit, InsertedEvent};
use crate::schema;
use crate::store::EventStore;

/// PostgreSQL-backed [`EventStore`].
///
/// Opens a fresh connection per call, bounded by the connect timeout. There
/// is no pool and no statement timeout.
pub struct PgEventStore {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgEventStore {
    /// Build connect options from settings. Nothing is opened yet.
    pub fn new(settings: &DatabaseSettings) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.name)
            .username(&settings.user)
            .application_name("drprobe");
        if !settings.password.is_empty() {
            options = options.password(&settings.password);
        }

        Self {
            options,
            connect_timeout: settings.connect_timeout(),
        }
    }

    /// Bound on each connection attempt.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    async fn connect(&self) -> Result<PgConnection, StoreError> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(StoreError::connect(e)),
            Err(_) => Err(StoreError::Timeout(self.connect_timeout)),
        }
    }
}

/// Close a connection on the normal exit path. Early returns and panics
/// drop it instead, which also closes the socket.
async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "closing connection failed");
    }
}

async fn ensure_table(conn: &mut PgConnection) -> Result<(), StoreError> {
    let _ = sqlx::query(schema::CREATE_EVENTS_TABLE).execute(&mut *conn).await?;
    Ok(())
}

async fn insert_event(
    conn: &mut PgConnection,
    node: &str,
    note: &str,
) -> Result<InsertedEvent, StoreError> {
    ensure_table(conn).await?;

    let mut tx = conn.begin().await?;
    let (id, ts): (i64, DateTime<Utc>) = sqlx::query_as(schema::INSERT_EVENT)
        .bind(node)
        .bind(note)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(InsertedEvent { id, ts })
}

async fn select_recent(conn: &mut PgConnection, limit: EventLimit) -> Result<Vec<Event>, StoreError> {
    ensure_table(conn).await?;

    let rows: Vec<(i64, DateTime<Utc>, String, String)> =
        sqlx::query_as(schema::SELECT_RECENT_EVENTS)
            .bind(limit.get())
            .fetch_all(&mut *conn)
            .await?;

    Ok(rows.into_iter().map(Event::from).collect())
}

#[async_trait]
impl EventStore for PgEventStore {
    #[instrument(skip(self))]
    async fn is_in_recovery(&self) -> Result<bool, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_scalar::<_, bool>(schema::SELECT_IN_RECOVERY)
            .fetch_one(&mut conn)
            .await
            .map_err(StoreError::from);
        release(conn).await;
        result
    }

    #[instrument(skip(self, note), fields(note_len = note.len()))]
    async fn record_event(&self, node: &str, note: &str) -> Result<InsertedEvent, StoreError> {
        let mut conn = self.connect().await?;
        let result = insert_event(&mut conn, node, note).await;
        release(conn).await;
        result
    }

    #[instrument(skip(self), fields(limit = limit.get()))]
    async fn recent_events(&self, limit: EventLimit) -> Result<Vec<Event>, StoreError> {
        let mut conn = self.connect().await?;
        let result = select_recent(&mut conn, limit).await;
        release(conn).await;
        result
    }
}
