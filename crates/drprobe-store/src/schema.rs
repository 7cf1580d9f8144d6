//! SQL for the `dr_events` table.

/// Name of the event table.
pub const EVENTS_TABLE: &str = "dr_events";

/// Issued before every write and list; idempotent by construction.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS dr_events (
    id BIGSERIAL PRIMARY KEY,
    ts TIMESTAMPTZ NOT NULL DEFAULT now(),
    node TEXT NOT NULL,
    note TEXT
)
"#;

/// Append one event; the store assigns `id` and `ts`.
pub const INSERT_EVENT: &str = "INSERT INTO dr_events (node, note) VALUES ($1, $2) RETURNING id, ts";

/// Newest events first, bounded by `$1`. A NULL note reads back as `''`.
pub const SELECT_RECENT_EVENTS: &str =
    "SELECT id, ts, node, COALESCE(note, '') FROM dr_events ORDER BY id DESC LIMIT $1";

/// `true` on a hot standby.
pub const SELECT_IN_RECOVERY: &str = "SELECT pg_is_in_recovery()";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_is_idempotent() {
        assert!(CREATE_EVENTS_TABLE.contains("CREATE TABLE IF NOT EXISTS dr_events"));
    }

    #[test]
    fn insert_lets_store_assign_id_and_ts() {
        assert!(!INSERT_EVENT.contains("(id"));
        assert!(INSERT_EVENT.ends_with("RETURNING id, ts"));
    }

    #[test]
    fn recent_orders_newest_first() {
        assert!(SELECT_RECENT_EVENTS.contains("ORDER BY id DESC"));
        assert!(SELECT_RECENT_EVENTS.contains(EVENTS_TABLE));
    }
}
