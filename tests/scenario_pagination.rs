//! 50 logs, page_size 20, closed keyset boundaries across a three-page
//! forward walk, exercised end-to-end through the public `QueryEngine`.

use formatlog::prelude::*;
use formatlog::store::{day_store_path, DayStore};

fn seed(config: &EngineConfig, date: chrono::NaiveDate, ticks: &[i64]) {
    let path = day_store_path(&config.log_dir(), date, &config.store.file_extension);
    let mut store = DayStore::open(&path).unwrap();
    let mut logs: Vec<Log> = ticks
        .iter()
        .map(|&t| LogBuilder::new(Level::Info, "x").created_tick(t).build())
        .collect();
    store.flush_batch(&mut logs).unwrap();
}

#[test]
fn three_page_forward_walk_has_closed_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::default();
    config.store.base_dir = dir.path().to_path_buf();
    let today = chrono::Utc::now().date_naive();
    seed(&config, today, &(1..=50).collect::<Vec<_>>());

    let query = QueryEngine::new(&config);

    let model = QueryModel::new().page_size(20).order_type(OrderType::OrderByIdAscending);
    let page1 = query.keyset_paginate(&model).unwrap();
    assert_eq!(
        page1.items.iter().map(|l| l.created_tick).collect::<Vec<_>>(),
        (1..=20).collect::<Vec<_>>()
    );
    assert_eq!(page1.next_cursor_tick, Some(20));

    let model2 = QueryModel::new()
        .page_size(20)
        .order_type(OrderType::OrderByIdAscending)
        .next_cursor_tick(page1.next_cursor_tick.unwrap());
    let page2 = query.keyset_paginate(&model2).unwrap();
    assert_eq!(
        page2.items.iter().map(|l| l.created_tick).collect::<Vec<_>>(),
        (20..=39).collect::<Vec<_>>()
    );

    let model3 = QueryModel::new()
        .page_size(20)
        .order_type(OrderType::OrderByIdAscending)
        .next_cursor_tick(page2.next_cursor_tick.unwrap());
    let page3 = query.keyset_paginate(&model3).unwrap();
    assert_eq!(
        page3.items.iter().map(|l| l.created_tick).collect::<Vec<_>>(),
        (39..=50).collect::<Vec<_>>()
    );
    assert_eq!(page3.items.len(), 12);
    // page3 is the last page: fewer items than page_size signals exhaustion.
    assert!(page3.items.len() < 20);
}
