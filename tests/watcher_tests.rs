//! Integration test for watch mode: filesystem churn collapses into one
//! debounced rescan

mod common;

use common::client::MockSvnClient;
use common::fixtures;
use std::time::Duration;
use svn_navigator::core::config::EngineConfig;
use svn_navigator::engine::{ScanEvent, StatusEngine};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bulk_writes_trigger_a_single_debounced_rescan() {
    let workdir = tempfile::tempdir().unwrap();
    let root = workdir.path().to_path_buf();

    let client = MockSvnClient::new();
    client.set_entries(root.clone(), fixtures::mixed_tree(&root.to_string_lossy()));

    let config = EngineConfig {
        debounce_ms: 150,
        ..EngineConfig::default()
    };
    let engine = StatusEngine::new(client.clone(), config);

    let scanner = engine.scanner();
    let mut events = scanner.subscribe();
    let _watcher = engine.watch(root.clone(), false).unwrap();

    // A burst of writes, all inside one quiet period
    for i in 0..20 {
        std::fs::write(root.join(format!("file{i}.txt")), "contents").unwrap();
    }

    let completed = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if let Ok(ScanEvent::Completed { root: r, .. }) = events.recv().await {
                if r == root {
                    return;
                }
            }
        }
    })
    .await;
    assert!(completed.is_ok(), "debounced rescan never completed");

    // Let any stray timer fire, then confirm the burst collapsed into one scan
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(client.call_count("status"), 1);
}
