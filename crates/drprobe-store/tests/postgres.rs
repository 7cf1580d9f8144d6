//! Live PostgreSQL tests. Skipped unless `DRPROBE_TEST_DB_HOST` is set; the
//! other `DRPROBE_TEST_DB_*` variables follow the same naming as the service
//! (`DRPROBE_TEST_DB_PORT`, `DRPROBE_TEST_DB_NAME`, ...). Point them at a
//! writable primary.

#![allow(missing_docs)]

use drprobe_store::{EventLimit, EventStore, PgEventStore};

const GATE_ENV: &str = "DRPROBE_TEST_DB_HOST";

/// The store under test, or `None` (with a skip line on stderr) when no live
/// database is configured. Invalid `DRPROBE_TEST_DB_*` values fail the test.
fn live_store() -> Option<PgEventStore> {
    if std::env::var_os(GATE_ENV).is_none() {
        eprintln!("skipped: {GATE_ENV} is not set, no live PostgreSQL to test against");
        return None;
    }
    let settings = drprobe_settings::load_settings_with(None, |name: &str| {
        std::env::var(format!("DRPROBE_TEST_{name}")).ok()
    })
    .unwrap();
    Some(PgEventStore::new(&settings.database))
}

#[tokio::test]
async fn primary_is_not_in_recovery() {
    let Some(store) = live_store() else { return };
    assert!(!store.is_in_recovery().await.unwrap());
}

#[tokio::test]
async fn successive_writes_increase() {
    let Some(store) = live_store() else { return };
    let first = store.record_event("it-node", "first").await.unwrap();
    let second = store.record_event("it-node", "second").await.unwrap();
    assert!(second.id > first.id);
    assert!(second.ts >= first.ts);
}

#[tokio::test]
async fn note_round_trips_verbatim() {
    let Some(store) = live_store() else { return };
    let note = format!("ünïcode 'quotes' \"and\" ; DROP -- {}", std::process::id());
    let inserted = store.record_event("it-node", &note).await.unwrap();

    let rows = store.recent_events(EventLimit::clamped(EventLimit::MAX)).await.unwrap();
    let row = rows.iter().find(|e| e.id == inserted.id).expect("row in window");
    assert_eq!(row.note, note);
    assert_eq!(row.node, "it-node");
    assert_eq!(row.ts, inserted.ts);
}

#[tokio::test]
async fn empty_note_round_trips() {
    let Some(store) = live_store() else { return };
    let inserted = store.record_event("it-node", "").await.unwrap();
    let rows = store.recent_events(EventLimit::clamped(EventLimit::MAX)).await.unwrap();
    let row = rows.iter().find(|e| e.id == inserted.id).expect("row in window");
    assert_eq!(row.note, "");
}

#[tokio::test]
async fn recent_is_bounded_and_descending() {
    let Some(store) = live_store() else { return };
    for i in 0..3 {
        let _ = store.record_event("it-node", &i.to_string()).await.unwrap();
    }
    let rows = store.recent_events(EventLimit::clamped(2)).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].id > rows[1].id);
}
