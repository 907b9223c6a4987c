use crate::core::{
    client::{CommandLineClient, Depth},
    colors::format_entry_line,
    config::EngineConfig,
    entry::ScanResult,
    error::{Result, SvnNavigatorError},
    output::{format_counts_summary, format_scan_progress, print_scan_result},
};
use crate::engine::{ScanEvent, ScanPhase, StatusEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Resolve the scan target to an absolute path, defaulting to the current directory
pub fn resolve_target(path: Option<PathBuf>) -> Result<PathBuf> {
    let target = match path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    Ok(std::fs::canonicalize(&target).unwrap_or(target))
}

/// Run one status scan and render progress and the final result
pub async fn execute_status(path: Option<PathBuf>, depth: Depth) -> Result<()> {
    let target = resolve_target(path)?;
    CommandLineClient::ensure_working_copy(&target)?;

    let config = EngineConfig::load_or_create().unwrap_or_else(|e| {
        log::warn!("config load failed, using defaults: {e}");
        EngineConfig::default()
    });
    let engine = StatusEngine::new(Arc::new(CommandLineClient::new()), config);

    run_scan_to_completion(&engine, target, depth).await
}

/// Drive a scan through the engine, printing each progress tick
pub async fn run_scan_to_completion(
    engine: &StatusEngine,
    target: PathBuf,
    depth: Depth,
) -> Result<()> {
    let scanner = engine.scanner();
    let mut events = scanner.subscribe();
    scanner.start_scan(target.clone(), engine.scan_options(depth));

    loop {
        match events.recv().await {
            Ok(ScanEvent::Progress { root, progress }) if root == target => {
                match progress.phase {
                    ScanPhase::Processing => {
                        eprintln!(
                            "{}",
                            format_scan_progress(
                                progress.files_scanned,
                                progress
                                    .current_path
                                    .as_ref()
                                    .map(|p| p.to_string_lossy())
                                    .as_deref(),
                            )
                        );
                    }
                    ScanPhase::Error => {
                        return Err(SvnNavigatorError::client_failed(
                            progress.error.as_deref().unwrap_or("scan failed"),
                        ));
                    }
                    _ => {}
                }
            }
            Ok(ScanEvent::Completed { root, result }) if root == target => {
                if result.len() > engine.config().large_threshold {
                    print_paged_preview(engine, &target, &result).await?;
                } else {
                    print_scan_result(&result);
                }
                return Ok(());
            }
            Ok(_) => {}
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => return Ok(()),
        }
    }
}

/// For listings above the large threshold, page in only the first chunk
/// instead of dumping the whole result set
async fn print_paged_preview(
    engine: &StatusEngine,
    target: &PathBuf,
    result: &ScanResult,
) -> Result<()> {
    let chunk_size = engine.config().chunk_size;
    let mut loader = engine.entry_loader(target.clone());
    loader.ensure_range_loaded(0, chunk_size.saturating_sub(1)).await?;

    println!();
    let mut shown = 0;
    for index in 0..chunk_size {
        let Some(entry) = loader.get(index) else { break };
        println!(
            "{}",
            format_entry_line(
                entry.status,
                entry.lock.is_some(),
                &entry.path.to_string_lossy()
            )
        );
        shown += 1;
    }

    println!(
        "\n(showing {shown} of {} entries)\n{}",
        result.len(),
        format_counts_summary(&result.counts)
    );
    Ok(())
}
