//! Debounced filesystem watching that re-triggers scans.
//!
//! Watch mode subscribes to filesystem change notifications for a scan root and
//! collapses every burst of notifications into a single trailing rescan: each
//! incoming event resets a quiet-period timer, and only when the timer elapses
//! with no further events does the rescan fire. This prevents scan storms while
//! a build or bulk file operation is writing thousands of files.
//!
//! # Public API
//! - [`RescanWatcher`]: Owns the native watcher and the debounce task
//! - [`WatchOptions`]: Quiet period and metadata-only filtering

use crate::core::error::{Result, SvnNavigatorError};
use crate::engine::scanner::{IncrementalScanner, ScanOptions};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Options controlling watch behavior
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period that must elapse after the last notification before a
    /// rescan fires
    pub debounce: Duration,
    /// When set, only changes under `.svn` administrative areas trigger a
    /// rescan; otherwise `.svn` churn is filtered out instead
    pub svn_only: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
            svn_only: false,
        }
    }
}

fn touches_svn_dir(event: &Event) -> bool {
    event
        .paths
        .iter()
        .any(|path| path.components().any(|c| c.as_os_str() == ".svn"))
}

/// Watches a scan root and schedules debounced rescans
///
/// Dropping the watcher unsubscribes from notifications and stops the
/// debounce task.
pub struct RescanWatcher {
    // Kept alive for the lifetime of the subscription
    _watcher: RecommendedWatcher,
    task: tokio::task::JoinHandle<()>,
}

impl RescanWatcher {
    /// Start watching `root`, rescanning through `scanner` after each quiet period
    pub fn spawn(
        scanner: IncrementalScanner,
        root: impl Into<PathBuf>,
        scan_options: ScanOptions,
        options: WatchOptions,
    ) -> Result<Self> {
        let root = root.into();
        let (tx, rx) = mpsc::unbounded_channel::<()>();

        let svn_only = options.svn_only;
        let mut watcher = RecommendedWatcher::new(
            move |outcome: std::result::Result<Event, notify::Error>| {
                let Ok(event) = outcome else { return };
                let relevant = if svn_only {
                    touches_svn_dir(&event)
                } else {
                    !touches_svn_dir(&event)
                };
                if relevant {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )
        .map_err(|e| SvnNavigatorError::watch_failed(&root, e.to_string()))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| SvnNavigatorError::watch_failed(&root, e.to_string()))?;

        log::debug!(
            "watching {} (debounce {:?})",
            root.display(),
            options.debounce
        );

        let task = tokio::spawn(debounce_loop(
            scanner,
            root,
            scan_options,
            options.debounce,
            rx,
        ));

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for RescanWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Trailing-edge debounce: the timer resets on every notification and the
/// rescan fires only once the quiet period passes without another one
async fn debounce_loop(
    scanner: IncrementalScanner,
    root: PathBuf,
    scan_options: ScanOptions,
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<()>,
) {
    loop {
        // Wait for the first notification of a burst
        if rx.recv().await.is_none() {
            return;
        }

        // Absorb the rest of the burst, restarting the timer each time
        loop {
            match tokio::time::timeout(quiet, rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        log::debug!("quiet period elapsed, rescanning {}", root.display());
        scanner.start_scan(root.clone(), scan_options.clone());
    }
}

/// Run the debounce discipline over a bare event stream, counting how many
/// rescans would fire; exercised directly by the unit tests below
#[cfg(test)]
async fn debounce_rounds(quiet: Duration, mut rx: mpsc::UnboundedReceiver<()>) -> usize {
    let mut fired = 0;
    loop {
        if rx.recv().await.is_none() {
            return fired;
        }
        loop {
            match tokio::time::timeout(quiet, rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return fired + 1,
                Err(_) => break,
            }
        }
        fired += 1;
    }
}
