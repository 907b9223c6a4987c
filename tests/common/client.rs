//! Scripted in-memory svn client for engine integration tests
//!
//! The mock serves entry sets keyed by scan root, records every call it
//! receives, and supports failure injection and a gate that holds mutating
//! calls open until the test releases them.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use svn_navigator::core::client::{ClientOutcome, Depth, Resolution, SvnClient};
use svn_navigator::core::entry::StatusEntry;
use svn_navigator::core::error::{Result, SvnNavigatorError};

#[derive(Default)]
pub struct MockSvnClient {
    entries: Mutex<HashMap<PathBuf, Vec<StatusEntry>>>,
    call_log: Mutex<Vec<String>>,
    /// Remaining number of calls that should fail with `failure_message`
    failures_remaining: AtomicUsize,
    failure_message: Mutex<String>,
    /// When present, every mutating call consumes one permit before returning
    gate: Mutex<Option<Arc<tokio::sync::Semaphore>>>,
    next_revision: AtomicU64,
}

impl MockSvnClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_revision: AtomicU64::new(100),
            ..Self::default()
        })
    }

    /// Script the entry set returned for scans rooted at `root`
    pub fn set_entries(&self, root: impl Into<PathBuf>, entries: Vec<StatusEntry>) {
        self.entries.lock().unwrap().insert(root.into(), entries);
    }

    /// Make the next `count` calls fail with `message`
    pub fn fail_next(&self, count: usize, message: &str) {
        self.failures_remaining.store(count, Ordering::SeqCst);
        *self.failure_message.lock().unwrap() = message.to_string();
    }

    /// Install a zero-permit gate; mutating calls block until permits arrive
    pub fn install_gate(&self) -> Arc<tokio::sync::Semaphore> {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(name))
            .count()
    }

    fn record(&self, call: String) {
        self.call_log.lock().unwrap().push(call);
    }

    fn take_failure(&self) -> Option<String> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining == 0 {
            return None;
        }
        self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
        Some(self.failure_message.lock().unwrap().clone())
    }

    async fn mutate(&self, call: String) -> Result<ClientOutcome> {
        self.record(call);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| SvnNavigatorError::client_failed("gate closed"))?;
            permit.forget();
        }

        if let Some(message) = self.take_failure() {
            return Err(SvnNavigatorError::client_failed(message));
        }

        Ok(ClientOutcome {
            revision: Some(self.next_revision.fetch_add(1, Ordering::SeqCst)),
        })
    }
}

#[async_trait]
impl SvnClient for MockSvnClient {
    async fn status(&self, path: &Path, _depth: Depth) -> Result<Vec<StatusEntry>> {
        self.record(format!("status {}", path.display()));

        if let Some(message) = self.take_failure() {
            return Err(SvnNavigatorError::client_failed(message));
        }

        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default())
    }

    async fn commit(&self, paths: &[PathBuf], message: &str) -> Result<ClientOutcome> {
        self.mutate(format!("commit {} ({message})", join_paths(paths))).await
    }

    async fn update(&self, path: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("update {}", path.display())).await
    }

    async fn revert(&self, paths: &[PathBuf]) -> Result<ClientOutcome> {
        self.mutate(format!("revert {}", join_paths(paths))).await
    }

    async fn add(&self, paths: &[PathBuf]) -> Result<ClientOutcome> {
        self.mutate(format!("add {}", join_paths(paths))).await
    }

    async fn delete(&self, paths: &[PathBuf]) -> Result<ClientOutcome> {
        self.mutate(format!("delete {}", join_paths(paths))).await
    }

    async fn checkout(&self, url: &str, path: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("checkout {url} {}", path.display())).await
    }

    async fn export(&self, path: &Path, destination: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("export {} {}", path.display(), destination.display()))
            .await
    }

    async fn merge(&self, source: &str, path: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("merge {source} {}", path.display())).await
    }

    async fn switch_to(&self, url: &str, path: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("switch {url} {}", path.display())).await
    }

    async fn copy_to(&self, source: &Path, destination: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("copy {} {}", source.display(), destination.display()))
            .await
    }

    async fn move_to(&self, source: &Path, destination: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("move {} {}", source.display(), destination.display()))
            .await
    }

    async fn cleanup(&self, path: &Path) -> Result<ClientOutcome> {
        self.mutate(format!("cleanup {}", path.display())).await
    }

    async fn lock(&self, path: &Path, message: Option<&str>) -> Result<ClientOutcome> {
        self.mutate(format!("lock {} ({message:?})", path.display())).await
    }

    async fn unlock(&self, path: &Path, force: bool) -> Result<ClientOutcome> {
        self.mutate(format!("unlock {} (force={force})", path.display())).await
    }

    async fn resolve(&self, path: &Path, resolution: Resolution) -> Result<ClientOutcome> {
        self.mutate(format!("resolve {} ({})", path.display(), resolution.as_arg()))
            .await
    }

    async fn run_custom(&self, path: &Path, args: &[String]) -> Result<ClientOutcome> {
        self.mutate(format!("custom {} ({})", path.display(), args.join(" ")))
            .await
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
