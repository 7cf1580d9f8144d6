//! Store failures as values.

use std::time::Duration;

/// SQLSTATE for `read_only_sql_transaction`, raised by a hot standby.
pub const READ_ONLY_SQLSTATE: &str = "25006";

/// Why a store call failed. `Display` is the message returned to clients.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not reach or authenticate to the store.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Connecting took longer than the configured timeout.
    #[error("timeout expired after {}s connecting to the database", .0.as_secs())]
    Timeout(Duration),

    /// The store refused a mutating statement because it is read-only.
    #[error("{0}")]
    ReadOnly(String),

    /// Any other error reported by the server.
    #[error("{message}")]
    Database {
        /// SQLSTATE, when the server sent one.
        code: Option<String>,
        /// Server message, verbatim.
        message: String,
    },

    /// Client-side driver failure.
    #[error("database driver error: {0}")]
    Driver(String),
}

impl StoreError {
    /// Classify an error raised while establishing a connection.
    ///
    /// Everything at this stage, including authentication failures reported
    /// by the server, is a connectivity failure.
    pub fn connect(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => StoreError::Connect(db.message().to_string()),
            other => StoreError::Connect(other.to_string()),
        }
    }

    /// Whether the store rejected the statement for being on a standby.
    pub fn is_read_only(&self) -> bool {
        matches!(self, StoreError::ReadOnly(_))
    }

    /// Whether the failure happened before any statement reached the store.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Connect(_) | StoreError::Timeout(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db) => {
                let code = db.code().map(|c| c.into_owned());
                let message = db.message().to_string();
                if code.as_deref() == Some(READ_ONLY_SQLSTATE) {
                    StoreError::ReadOnly(message)
                } else {
                    StoreError::Database { code, message }
                }
            }
            sqlx::Error::Io(io) => StoreError::Connect(io.to_string()),
            other => StoreError::Driver(other.to_string()),
        }
    }
}
