//! A flush failure routes the batch to one JSON sidecar plus one appended
//! text line instead of losing it, and leaves no rows behind.

use formatlog::prelude::*;
use formatlog::store::day_store_path;

#[test]
fn failed_flush_quarantines_all_five_logs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::default();
    config.store.base_dir = dir.path().to_path_buf();
    config.flush.poll_granularity_ms = 10;
    config.flush.max_wait_ms = 50;
    let quarantine_dir = dir.path().join("quarantine");
    config.quarantine.directory = Some(quarantine_dir.clone());

    let engine = engine(config.clone());
    engine.init().unwrap();

    // Force DayStore::open to fail: put a directory where the day-store
    // file itself needs to go, so opening it as a SQLite connection errors.
    let log_dir = config.log_dir();
    let today = chrono::Utc::now().date_naive();
    let day_file = day_store_path(&log_dir, today, &config.store.file_extension);
    std::fs::create_dir_all(&day_file).unwrap();

    for _ in 0..5 {
        engine.add(LogBuilder::new(Level::Error, "boom").build());
    }
    std::thread::sleep(std::time::Duration::from_millis(500));
    engine.stop();

    assert_eq!(engine.flush_info().log_count, 0);

    assert!(day_file.is_dir(), "flush must not have touched the blocked day-store path");

    let entries: Vec<_> = std::fs::read_dir(&quarantine_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    let json_files: Vec<_> = entries.iter().filter(|n| n.ends_with(".json")).collect();
    let txt_files: Vec<_> = entries.iter().filter(|n| n.ends_with(".txt")).collect();
    assert_eq!(json_files.len(), 1);
    assert_eq!(txt_files.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(quarantine_dir.join(json_files[0])).unwrap())
            .unwrap();
    assert_eq!(json["logs"].as_array().unwrap().len(), 5);

    let txt = std::fs::read_to_string(quarantine_dir.join(txt_files[0])).unwrap();
    assert_eq!(txt.lines().count(), 1);
}
