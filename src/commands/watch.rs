use crate::commands::status::{resolve_target, run_scan_to_completion};
use crate::core::{
    client::{CommandLineClient, Depth},
    config::EngineConfig,
    error::Result,
    output::{print_info, print_scan_result},
};
use crate::engine::{ScanEvent, StatusEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Scan once, then keep rescanning after each debounced change burst until
/// interrupted
pub async fn execute_watch(path: Option<PathBuf>, svn_only: bool) -> Result<()> {
    let target = resolve_target(path)?;
    CommandLineClient::ensure_working_copy(&target)?;

    let config = EngineConfig::load_or_create().unwrap_or_else(|e| {
        log::warn!("config load failed, using defaults: {e}");
        EngineConfig::default()
    });
    let engine = StatusEngine::new(Arc::new(CommandLineClient::new()), config);

    run_scan_to_completion(&engine, target.clone(), Depth::Infinity).await?;

    let _watcher = engine.watch(target.clone(), svn_only)?;
    print_info("Watching for changes. Press Ctrl+C to stop.");

    let scanner = engine.scanner();
    let mut events = scanner.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                print_info("Stopped watching.");
                return Ok(());
            }
            event = events.recv() => {
                if let Ok(ScanEvent::Completed { root, result }) = event {
                    if root == target {
                        print_scan_result(&result);
                    }
                }
            }
        }
    }
}
