//! Incremental, cancellable status scanning.
//!
//! The scanner fetches the raw status list for a path from the external client
//! in one call (the tool itself does not stream), then feeds it to observers in
//! ordered batches: each batch appends to the accumulated result, recomputes the
//! aggregate counts, emits one progress update and one event per entry, and then
//! yields control so the runtime can service other work and cancellation between
//! batches. Completed scans populate the shallow, deep, listing and versioned
//! cache families for the scanned root; cancelled or failed scans write nothing.
//!
//! At most one scan is active per path: starting a scan supersedes any in-flight
//! scan of the same path by cancelling it first.
//!
//! # Public API
//! - [`IncrementalScanner`]: Cheap-to-clone scan orchestrator owned by the engine
//! - [`ScanOptions`], [`ScanPhase`], [`ScanProgress`], [`ScanEvent`]

use crate::core::client::{Depth, SvnClient};
use crate::core::entry::{ScanResult, StatusCounts, StatusEntry};
use crate::engine::aggregate::aggregate_status;
use crate::engine::cache::{CacheValue, StatusCache};
use crate::engine::cancel::CancellationToken;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex};

/// Lifecycle phase of a scan
///
/// Transitions are monotonic within one scan invocation:
/// Idle → Scanning → Processing → {Complete | Error}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Scanning,
    Processing,
    Complete,
    Error,
}

/// Progress snapshot for one scan invocation
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub phase: ScanPhase,
    pub files_scanned: usize,
    pub total_files: Option<usize>,
    pub current_path: Option<PathBuf>,
    pub started_at: Instant,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl ScanProgress {
    fn idle() -> Self {
        Self {
            phase: ScanPhase::Idle,
            files_scanned: 0,
            total_files: None,
            current_path: None,
            started_at: Instant::now(),
            elapsed: Duration::ZERO,
            error: None,
        }
    }
}

/// Events fanned out to scan observers
///
/// Within one scan, batches and their progress/entry events are emitted
/// strictly in ascending offset order.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// One per batch; the final batch's update carries phase Complete
    Progress { root: PathBuf, progress: ScanProgress },
    /// One per scanned entry, after the batch's progress update
    Entry { root: PathBuf, entry: StatusEntry },
    /// Terminal event carrying the full result of a completed scan
    Completed { root: PathBuf, result: ScanResult },
}

/// Options for one scan invocation
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub depth: Depth,
    pub batch_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            depth: Depth::Infinity,
            batch_size: 100,
        }
    }
}

struct ActiveScan {
    id: u64,
    token: CancellationToken,
}

struct ScannerInner {
    client: Arc<dyn SvnClient>,
    cache: Arc<Mutex<StatusCache>>,
    events: broadcast::Sender<ScanEvent>,
    active: std::sync::Mutex<HashMap<PathBuf, ActiveScan>>,
    progress: std::sync::Mutex<HashMap<PathBuf, ScanProgress>>,
    next_scan_id: AtomicU64,
}

/// Drives chunked, cancellable scans and populates the status cache
///
/// Clones share state; the engine hands out clones to commands and watchers.
#[derive(Clone)]
pub struct IncrementalScanner {
    inner: Arc<ScannerInner>,
}

impl IncrementalScanner {
    pub fn new(client: Arc<dyn SvnClient>, cache: Arc<Mutex<StatusCache>>) -> Self {
        // A full large-scan event burst must fit; lagging receivers drop events
        let (events, _) = broadcast::channel(16_384);
        Self {
            inner: Arc::new(ScannerInner {
                client,
                cache,
                events,
                active: std::sync::Mutex::new(HashMap::new()),
                progress: std::sync::Mutex::new(HashMap::new()),
                next_scan_id: AtomicU64::new(1),
            }),
        }
    }

    /// Subscribe to scan events for all paths
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.inner.events.subscribe()
    }

    /// Latest progress snapshot for a path, Idle before the first scan
    pub fn progress(&self, path: &Path) -> ScanProgress {
        self.inner
            .progress
            .lock()
            .expect("progress lock poisoned")
            .get(path)
            .cloned()
            .unwrap_or_else(ScanProgress::idle)
    }

    /// Start a scan of `path`, superseding any in-flight scan of the same path
    ///
    /// Returns immediately; observers follow the scan through [`subscribe`]
    /// or [`progress`]. The spawned task owns the whole scan lifecycle.
    ///
    /// [`subscribe`]: Self::subscribe
    /// [`progress`]: Self::progress
    pub fn start_scan(&self, path: impl Into<PathBuf>, options: ScanOptions) {
        let root = crate::core::entry::normalize_path(path.into());
        let token = CancellationToken::new();
        let id = self.inner.next_scan_id.fetch_add(1, Ordering::Relaxed);

        {
            let mut active = self.inner.active.lock().expect("active-scan lock poisoned");
            if let Some(previous) = active.insert(
                root.clone(),
                ActiveScan {
                    id,
                    token: token.clone(),
                },
            ) {
                log::debug!("superseding scan of {}", root.display());
                previous.token.cancel();
            }
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.perform_scan(id, root, options, token).await;
        });
    }

    /// Request cancellation of the active scan for `path`, if any
    pub fn cancel_scan(&self, path: &Path) {
        let active = self.inner.active.lock().expect("active-scan lock poisoned");
        if let Some(scan) = active.get(path) {
            scan.token.cancel();
        }
    }
}

impl ScannerInner {
    fn set_progress(&self, root: &Path, progress: ScanProgress) {
        self.progress
            .lock()
            .expect("progress lock poisoned")
            .insert(root.to_path_buf(), progress);
    }

    /// Remove our registration unless a newer scan has already replaced it
    fn deregister(&self, id: u64, root: &Path) {
        let mut active = self.active.lock().expect("active-scan lock poisoned");
        if active.get(root).map(|scan| scan.id) == Some(id) {
            active.remove(root);
        }
    }

    async fn perform_scan(
        self: Arc<Self>,
        id: u64,
        root: PathBuf,
        options: ScanOptions,
        token: CancellationToken,
    ) {
        let started_at = Instant::now();
        let batch_size = options.batch_size.max(1);

        self.set_progress(
            &root,
            ScanProgress {
                phase: ScanPhase::Scanning,
                files_scanned: 0,
                total_files: None,
                current_path: None,
                started_at,
                elapsed: Duration::ZERO,
                error: None,
            },
        );

        let entries = match self.client.status(&root, options.depth).await {
            Ok(entries) => entries,
            Err(err) => {
                if !token.is_cancelled() {
                    let progress = ScanProgress {
                        phase: ScanPhase::Error,
                        files_scanned: 0,
                        total_files: None,
                        current_path: None,
                        started_at,
                        elapsed: started_at.elapsed(),
                        error: Some(err.to_string()),
                    };
                    log::warn!("scan of {} failed: {err}", root.display());
                    self.set_progress(&root, progress.clone());
                    let _ = self.events.send(ScanEvent::Progress {
                        root: root.clone(),
                        progress,
                    });
                }
                self.deregister(id, &root);
                return;
            }
        };

        if token.is_cancelled() {
            self.deregister(id, &root);
            return;
        }

        let total = entries.len();
        let mut accumulated: Vec<StatusEntry> = Vec::with_capacity(total);

        for batch in entries.chunks(batch_size) {
            accumulated.extend_from_slice(batch);
            // Counts are recomputed over the whole accumulation each batch
            let counts = StatusCounts::tally(&accumulated);
            log::debug!(
                "scan {} batch: {}/{total} entries, {} changes",
                root.display(),
                accumulated.len(),
                counts.changes()
            );

            let is_final_batch = accumulated.len() == total;
            if !is_final_batch {
                let progress = ScanProgress {
                    phase: ScanPhase::Processing,
                    files_scanned: accumulated.len(),
                    total_files: Some(total),
                    current_path: batch.last().map(|entry| entry.path.clone()),
                    started_at,
                    elapsed: started_at.elapsed(),
                    error: None,
                };
                self.set_progress(&root, progress.clone());
                let _ = self.events.send(ScanEvent::Progress {
                    root: root.clone(),
                    progress,
                });
            }

            for entry in batch {
                let _ = self.events.send(ScanEvent::Entry {
                    root: root.clone(),
                    entry: entry.clone(),
                });
            }

            // Suspension point between batches; cancellation is only
            // observable here
            tokio::task::yield_now().await;
            if token.is_cancelled() {
                log::debug!("scan of {} cancelled, cache untouched", root.display());
                self.deregister(id, &root);
                return;
            }
        }

        let result = ScanResult::new(accumulated);
        let deep = aggregate_status(&root, &result.entries);
        let listing = result.direct_children(&root);

        {
            let mut cache = self.cache.lock().await;
            cache.set(&root, CacheValue::ShallowStatus(result.clone()));
            cache.set(&root, CacheValue::DeepStatus(deep));
            cache.set(&root, CacheValue::Listing(listing));
            for entry in &result.entries {
                cache.set(&entry.path, CacheValue::Versioned(entry.status.is_versioned()));
            }
        }

        // The final batch's update is the Complete transition, so one scan of
        // N entries emits exactly ceil(N / batch_size) progress updates
        let progress = ScanProgress {
            phase: ScanPhase::Complete,
            files_scanned: total,
            total_files: Some(total),
            current_path: result.entries.last().map(|entry| entry.path.clone()),
            started_at,
            elapsed: started_at.elapsed(),
            error: None,
        };
        self.set_progress(&root, progress.clone());
        let _ = self.events.send(ScanEvent::Progress {
            root: root.clone(),
            progress,
        });
        let _ = self.events.send(ScanEvent::Completed {
            root: root.clone(),
            result,
        });

        self.deregister(id, &root);
    }
}
