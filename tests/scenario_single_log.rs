//! One log survives a real flush cycle end-to-end — one `Formats` row, one
//! `Arguments` row, one `Logs` row with matching foreign keys, one
//! `LogIntervalStats` row with count 1.

use formatlog::prelude::*;
use formatlog::store::day_store_path;
use rusqlite::Connection;

#[test]
fn single_log_round_trips_through_a_real_flush() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::default();
    config.store.base_dir = dir.path().to_path_buf();
    config.flush.poll_granularity_ms = 10;
    config.flush.max_wait_ms = 50;

    let engine = engine(config.clone());
    engine.add(
        LogBuilder::new(Level::Info, "hello {0}")
            .arg(0, "world")
            .unwrap()
            .build(),
    );

    std::thread::sleep(std::time::Duration::from_millis(500));
    let info = engine.flush_info();
    assert_eq!(info.log_count, 1);
    assert!(info.flushed_at.is_some());
    engine.stop();

    let today = chrono::Utc::now().date_naive();
    let path = day_store_path(&config.log_dir(), today, &config.store.file_extension);
    let conn = Connection::open(&path).unwrap();

    let formats: i64 = conn
        .query_row("SELECT COUNT(*) FROM Formats", [], |r| r.get(0))
        .unwrap();
    assert_eq!(formats, 1);
    let format_string: String = conn
        .query_row("SELECT FormatString FROM Formats", [], |r| r.get(0))
        .unwrap();
    assert_eq!(format_string, "hello {0}");

    let arguments: i64 = conn
        .query_row("SELECT COUNT(*) FROM Arguments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(arguments, 1);
    let arg0: String = conn
        .query_row("SELECT Value FROM Arguments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(arg0, "world");

    let (level, format_id, arg0_id): (String, i64, Option<i64>) = conn
        .query_row(
            "SELECT Level, FormatId, Arg0Id FROM Logs",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(level, "Info");
    assert!(format_id > 0);
    assert!(arg0_id.is_some());

    let interval_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM LogIntervalStats", [], |r| r.get(0))
        .unwrap();
    assert_eq!(interval_rows, 1);
    let log_count: i64 = conn
        .query_row("SELECT LogCount FROM LogIntervalStats", [], |r| r.get(0))
        .unwrap();
    assert_eq!(log_count, 1);
}
