//! Integration tests for the engine composition root and the lazy entry loader

mod common;

use common::client::MockSvnClient;
use common::fixtures;
use std::path::Path;
use std::time::Duration;
use svn_navigator::core::config::EngineConfig;
use svn_navigator::core::status::FileStatus;
use svn_navigator::engine::{ScanEvent, StatusEngine};

#[tokio::test]
async fn independent_engines_do_not_share_state() {
    let client_a = MockSvnClient::new();
    let client_b = MockSvnClient::new();
    client_a.set_entries("/wc", fixtures::mixed_tree("/wc"));

    let engine_a = StatusEngine::new(client_a, EngineConfig::default());
    let engine_b = StatusEngine::new(client_b, EngineConfig::default());

    {
        let mut cache = engine_a.cache().lock_owned().await;
        cache.set(
            Path::new("/wc"),
            svn_navigator::engine::CacheValue::DeepStatus(FileStatus::Conflicted),
        );
    }

    let mut cache_b = engine_b.cache().lock_owned().await;
    assert!(cache_b.get_deep_status(Path::new("/wc")).is_none());
}

#[tokio::test]
async fn entry_loader_pages_through_a_large_listing() {
    let client = MockSvnClient::new();
    client.set_entries("/big", fixtures::flat_tree("/big", 1_200));
    let engine = StatusEngine::new(client.clone(), EngineConfig::default());

    let mut loader = engine.entry_loader("/big");
    assert_eq!(loader.total().await.unwrap(), 1_200);

    // Default chunk size is 500: rows 0..=899 span chunks 0 and 1
    loader.ensure_range_loaded(0, 899).await.unwrap();
    assert_eq!(loader.loaded_len(), 1_000);
    assert!(loader.get(999).is_some());
    assert!(loader.get(1_000).is_none());

    assert_eq!(loader.load_more().await.unwrap(), 200);
    assert_eq!(loader.loaded_len(), 1_200);

    // The full listing was fetched from the client exactly once; pages after
    // that were served out of the shallow-status cache family
    assert_eq!(client.call_count("status"), 1);
}

#[tokio::test]
async fn scan_then_operation_then_fresh_read() {
    let client = MockSvnClient::new();
    client.set_entries("/proj", fixtures::conflicted_project());
    let engine = StatusEngine::new(client.clone(), EngineConfig::default());

    // Scan populates the cache
    let scanner = engine.scanner();
    let mut events = scanner.subscribe();
    scanner.start_scan(
        Path::new("/proj").to_path_buf(),
        engine.scan_options(svn_navigator::core::client::Depth::Infinity),
    );
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("scan timed out")
            .expect("channel closed");
        if matches!(event, ScanEvent::Completed { .. }) {
            break;
        }
    }
    assert_eq!(
        engine.cache().lock().await.get_deep_status(Path::new("/proj")),
        Some(FileStatus::Conflicted)
    );

    // A completed mutation drops the cached aggregate for the path
    let queue = engine.queue();
    let id = queue.enqueue(svn_navigator::engine::OperationKind::Resolve {
        path: Path::new("/proj/sub/b.txt").to_path_buf(),
        resolution: svn_navigator::core::client::Resolution::Working,
    });
    queue.wait_for_terminal(id).await.unwrap();

    assert!(engine
        .cache()
        .lock()
        .await
        .get_deep_status(Path::new("/proj"))
        .is_none());
}
