use crate::core::{
    client::{CommandLineClient, Resolution},
    config::EngineConfig,
    error::{Result, SvnNavigatorError},
    output::{print_error, print_success},
};
use crate::engine::{OperationKind, OperationStatus, StatusEngine};
use std::path::PathBuf;
use std::sync::Arc;

/// Parse a `--accept` style resolution argument
pub fn parse_resolution(value: &str) -> Result<Resolution> {
    match value {
        "working" => Ok(Resolution::Working),
        "theirs-full" => Ok(Resolution::TheirsFull),
        "mine-full" => Ok(Resolution::MineFull),
        "base" => Ok(Resolution::Base),
        other => Err(SvnNavigatorError::UnknownResolution {
            value: other.to_string(),
        }),
    }
}

fn build_engine() -> StatusEngine {
    let config = EngineConfig::load_or_create().unwrap_or_else(|e| {
        log::warn!("config load failed, using defaults: {e}");
        EngineConfig::default()
    });
    StatusEngine::new(Arc::new(CommandLineClient::new()), config)
}

/// Enqueue one operation, wait for its terminal state and render the outcome
pub async fn execute_operation(kind: OperationKind) -> Result<()> {
    let engine = build_engine();
    let queue = engine.queue();

    let name = kind.name();
    let id = queue.enqueue(kind);
    let finished = queue.wait_for_terminal(id).await?;

    match finished.status {
        OperationStatus::Completed => {
            match finished.revision {
                Some(revision) => {
                    print_success(&format!("{name} completed at revision {revision}"))
                }
                None => print_success(&format!("{name} completed")),
            }
            Ok(())
        }
        OperationStatus::Cancelled => {
            print_error(&format!("{name} was cancelled"));
            Ok(())
        }
        OperationStatus::Failed => {
            let message = finished.error.unwrap_or_else(|| "unknown error".to_string());
            if finished.retry_count < finished.max_retries {
                print_error(&format!("{name} failed: {message} (retry available)"));
            } else {
                print_error(&format!("{name} failed: {message}"));
            }
            std::process::exit(1);
        }
        // wait_for_terminal only returns terminal states
        _ => Ok(()),
    }
}

pub async fn execute_commit(paths: Vec<PathBuf>, message: String) -> Result<()> {
    execute_operation(OperationKind::Commit { paths, message }).await
}

pub async fn execute_update(path: PathBuf) -> Result<()> {
    execute_operation(OperationKind::Update { path }).await
}

pub async fn execute_revert(paths: Vec<PathBuf>) -> Result<()> {
    execute_operation(OperationKind::Revert { paths }).await
}

pub async fn execute_add(paths: Vec<PathBuf>) -> Result<()> {
    execute_operation(OperationKind::Add { paths }).await
}

pub async fn execute_delete(paths: Vec<PathBuf>) -> Result<()> {
    execute_operation(OperationKind::Delete { paths }).await
}

pub async fn execute_cleanup(path: Option<PathBuf>) -> Result<()> {
    let path = crate::commands::status::resolve_target(path)?;
    execute_operation(OperationKind::Cleanup { path }).await
}

pub async fn execute_lock(path: PathBuf, message: Option<String>) -> Result<()> {
    execute_operation(OperationKind::Lock { path, message }).await
}

pub async fn execute_unlock(path: PathBuf, force: bool) -> Result<()> {
    execute_operation(OperationKind::Unlock { path, force }).await
}

pub async fn execute_resolve(path: PathBuf, resolution: String) -> Result<()> {
    let resolution = parse_resolution(&resolution)?;
    execute_operation(OperationKind::Resolve { path, resolution }).await
}
