//! Concurrency-bounded, retryable scheduler for mutating operations.
//!
//! Operations are admitted immediately (enqueue never rejects) and sit Pending
//! until a fair semaphore of `max_concurrent` permits lets them run, which keeps
//! admission FIFO without a polling loop. Each running operation gets a
//! cancellation token and a progress reporter; on success the status cache is
//! invalidated for every affected path *before* the Completed state becomes
//! observable, so a subsequent read never sees pre-mutation data.
//!
//! Failed operations stay retryable while `retry_count < max_retries`; invalid
//! `cancel` and `retry` requests are state-preserving no-ops that callers detect
//! through the unchanged snapshot.
//!
//! # Public API
//! - [`OperationQueue`]: Cheap-to-clone scheduler handle, constructed by the engine
//! - [`Operation`], [`OperationKind`], [`OperationStatus`], [`OperationOptions`]

use crate::core::client::{ClientOutcome, Resolution, SvnClient};
use crate::core::error::{Result, SvnNavigatorError};
use crate::engine::cache::StatusCache;
use crate::engine::cancel::CancellationToken;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex, Semaphore};
use uuid::Uuid;

/// A mutating action with its dispatch parameters
#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind {
    Commit { paths: Vec<PathBuf>, message: String },
    Update { path: PathBuf },
    Revert { paths: Vec<PathBuf> },
    Add { paths: Vec<PathBuf> },
    Delete { paths: Vec<PathBuf> },
    Checkout { url: String, path: PathBuf },
    Export { path: PathBuf, destination: PathBuf },
    Merge { source: String, path: PathBuf },
    Switch { url: String, path: PathBuf },
    Copy { source: PathBuf, destination: PathBuf },
    Move { source: PathBuf, destination: PathBuf },
    Cleanup { path: PathBuf },
    Lock { path: PathBuf, message: Option<String> },
    Unlock { path: PathBuf, force: bool },
    Resolve { path: PathBuf, resolution: Resolution },
    Custom { path: PathBuf, args: Vec<String> },
}

impl OperationKind {
    /// Short name used in logs and operation reports
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Commit { .. } => "commit",
            OperationKind::Update { .. } => "update",
            OperationKind::Revert { .. } => "revert",
            OperationKind::Add { .. } => "add",
            OperationKind::Delete { .. } => "delete",
            OperationKind::Checkout { .. } => "checkout",
            OperationKind::Export { .. } => "export",
            OperationKind::Merge { .. } => "merge",
            OperationKind::Switch { .. } => "switch",
            OperationKind::Copy { .. } => "copy",
            OperationKind::Move { .. } => "move",
            OperationKind::Cleanup { .. } => "cleanup",
            OperationKind::Lock { .. } => "lock",
            OperationKind::Unlock { .. } => "unlock",
            OperationKind::Resolve { .. } => "resolve",
            OperationKind::Custom { .. } => "custom",
        }
    }

    /// Every working-copy path whose cache records a success invalidates
    pub fn affected_paths(&self) -> Vec<PathBuf> {
        match self {
            OperationKind::Commit { paths, .. }
            | OperationKind::Revert { paths }
            | OperationKind::Add { paths }
            | OperationKind::Delete { paths } => paths.clone(),
            OperationKind::Update { path }
            | OperationKind::Cleanup { path }
            | OperationKind::Lock { path, .. }
            | OperationKind::Unlock { path, .. }
            | OperationKind::Resolve { path, .. }
            | OperationKind::Custom { path, .. }
            | OperationKind::Checkout { path, .. }
            | OperationKind::Merge { path, .. }
            | OperationKind::Switch { path, .. } => vec![path.clone()],
            OperationKind::Export { destination, .. } => vec![destination.clone()],
            OperationKind::Copy {
                source,
                destination,
            }
            | OperationKind::Move {
                source,
                destination,
            } => vec![source.clone(), destination.clone()],
        }
    }
}

/// Operation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Completed | OperationStatus::Failed | OperationStatus::Cancelled
        )
    }
}

/// Per-operation flags set at enqueue time
#[derive(Debug, Clone, Copy)]
pub struct OperationOptions {
    pub max_retries: u32,
    pub cancellable: bool,
    pub retryable: bool,
}

impl Default for OperationOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            cancellable: true,
            retryable: true,
        }
    }
}

/// One scheduled mutating operation, observable by the UI as a read-only view
#[derive(Debug, Clone)]
pub struct Operation {
    pub id: Uuid,
    pub kind: OperationKind,
    pub status: OperationStatus,
    pub progress: Option<u8>,
    pub current_file: Option<PathBuf>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub cancellable: bool,
    pub retryable: bool,
    pub error: Option<String>,
    pub revision: Option<u64>,
    pub enqueued_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Operation {
    fn new(kind: OperationKind, options: OperationOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            status: OperationStatus::Pending,
            progress: None,
            current_file: None,
            retry_count: 0,
            max_retries: options.max_retries,
            cancellable: options.cancellable,
            retryable: options.retryable,
            error: None,
            revision: None,
            enqueued_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }
}

struct QueueInner {
    client: Arc<dyn SvnClient>,
    cache: Arc<Mutex<StatusCache>>,
    semaphore: Arc<Semaphore>,
    operations: std::sync::Mutex<Vec<Operation>>,
    tokens: std::sync::Mutex<HashMap<Uuid, CancellationToken>>,
    paused_tx: watch::Sender<bool>,
    default_options: OperationOptions,
    terminal_events: broadcast::Sender<Uuid>,
}

/// Handle passed to executing work for UI-observable progress updates
pub struct ProgressReporter {
    queue: Arc<QueueInner>,
    id: Uuid,
}

impl ProgressReporter {
    /// Update the operation's progress percentage and current file
    ///
    /// Has no effect once the operation reached a terminal state.
    pub fn report(&self, percent: u8, current_file: Option<PathBuf>) {
        let mut ops = self.queue.operations.lock().expect("operations lock poisoned");
        if let Some(op) = ops.iter_mut().find(|op| op.id == self.id) {
            if !op.status.is_terminal() {
                op.progress = Some(percent.min(100));
                if current_file.is_some() {
                    op.current_file = current_file;
                }
            }
        }
    }
}

/// Concurrency-bounded scheduler for mutating operations
///
/// Clones share state; the engine hands out clones to commands and views.
#[derive(Clone)]
pub struct OperationQueue {
    inner: Arc<QueueInner>,
}

impl OperationQueue {
    pub fn new(
        client: Arc<dyn SvnClient>,
        cache: Arc<Mutex<StatusCache>>,
        max_concurrent: usize,
        default_options: OperationOptions,
    ) -> Self {
        let (paused_tx, _) = watch::channel(false);
        let (terminal_events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(QueueInner {
                client,
                cache,
                semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
                operations: std::sync::Mutex::new(Vec::new()),
                tokens: std::sync::Mutex::new(HashMap::new()),
                paused_tx,
                default_options,
                terminal_events,
            }),
        }
    }

    /// Admit an operation; queueing always succeeds
    pub fn enqueue(&self, kind: OperationKind) -> Uuid {
        self.enqueue_with(kind, self.inner.default_options)
    }

    /// Admit an operation with explicit flags
    pub fn enqueue_with(&self, kind: OperationKind, options: OperationOptions) -> Uuid {
        let op = Operation::new(kind, options);
        let id = op.id;
        log::debug!("enqueued {} operation {id}", op.kind.name());

        self.inner
            .operations
            .lock()
            .expect("operations lock poisoned")
            .push(op);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_operation(id).await;
        });

        id
    }

    /// Request cancellation of a Pending or Running operation
    ///
    /// A no-op for non-cancellable operations and terminal states; the caller
    /// observes refusal through the unchanged snapshot.
    pub fn cancel(&self, id: Uuid) {
        let mut ops = self.inner.operations.lock().expect("operations lock poisoned");
        let Some(op) = ops.iter_mut().find(|op| op.id == id) else {
            return;
        };
        if !op.cancellable {
            return;
        }

        match op.status {
            OperationStatus::Pending => {
                op.status = OperationStatus::Cancelled;
                op.completed_at = Some(Utc::now());
                drop(ops);
                let _ = self.inner.terminal_events.send(id);
            }
            OperationStatus::Running => {
                drop(ops);
                let tokens = self.inner.tokens.lock().expect("token lock poisoned");
                if let Some(token) = tokens.get(&id) {
                    token.cancel();
                }
            }
            _ => {}
        }
    }

    /// Re-run a Failed operation
    ///
    /// Valid only from Failed while `retry_count < max_retries`; otherwise a
    /// state-preserving no-op. A successful retry resets the operation to
    /// Pending, increments its retry count and clears timestamps and error.
    pub fn retry(&self, id: Uuid) {
        {
            let mut ops = self.inner.operations.lock().expect("operations lock poisoned");
            let Some(op) = ops.iter_mut().find(|op| op.id == id) else {
                return;
            };
            if op.status != OperationStatus::Failed
                || !op.retryable
                || op.retry_count >= op.max_retries
            {
                return;
            }

            op.status = OperationStatus::Pending;
            op.retry_count += 1;
            op.error = None;
            op.progress = None;
            op.current_file = None;
            op.started_at = None;
            op.completed_at = None;
            log::debug!("retrying operation {id} (attempt {})", op.retry_count + 1);
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_operation(id).await;
        });
    }

    /// Stop admitting new operations until `resume` is called
    pub fn pause(&self) {
        let _ = self.inner.paused_tx.send(true);
    }

    /// Resume admission of pending operations
    pub fn resume(&self) {
        let _ = self.inner.paused_tx.send(false);
    }

    /// Read-only snapshot of all operations in enqueue order
    pub fn operations(&self) -> Vec<Operation> {
        self.inner
            .operations
            .lock()
            .expect("operations lock poisoned")
            .clone()
    }

    /// Read-only view of one operation
    pub fn get(&self, id: Uuid) -> Option<Operation> {
        self.inner
            .operations
            .lock()
            .expect("operations lock poisoned")
            .iter()
            .find(|op| op.id == id)
            .cloned()
    }

    /// Number of operations currently in the Running state
    pub fn running_count(&self) -> usize {
        self.inner
            .operations
            .lock()
            .expect("operations lock poisoned")
            .iter()
            .filter(|op| op.status == OperationStatus::Running)
            .count()
    }

    /// Wait until the operation reaches a terminal state and return it
    pub async fn wait_for_terminal(&self, id: Uuid) -> Result<Operation> {
        let mut events = self.inner.terminal_events.subscribe();

        loop {
            match self.get(id) {
                Some(op) if op.status.is_terminal() => return Ok(op),
                Some(_) => {}
                None => return Err(SvnNavigatorError::UnknownOperation { id }),
            }
            match events.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(SvnNavigatorError::UnknownOperation { id });
                }
            }
        }
    }
}

impl QueueInner {
    async fn run_operation(self: Arc<Self>, id: Uuid) {
        // Hold admission while the queue is globally paused
        let mut paused = self.paused_tx.subscribe();
        while *paused.borrow() {
            if paused.changed().await.is_err() {
                return;
            }
        }

        let _permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");

        // Promote to Running, unless a cancel landed while Pending
        let kind = {
            let mut ops = self.operations.lock().expect("operations lock poisoned");
            let Some(op) = ops.iter_mut().find(|op| op.id == id) else {
                return;
            };
            if op.status != OperationStatus::Pending {
                return;
            }
            op.status = OperationStatus::Running;
            op.started_at = Some(Utc::now());
            op.progress = Some(0);
            op.kind.clone()
        };

        let token = CancellationToken::new();
        self.tokens
            .lock()
            .expect("token lock poisoned")
            .insert(id, token.clone());

        let reporter = ProgressReporter {
            queue: Arc::clone(&self),
            id,
        };
        let outcome = self.dispatch(&kind, &token, &reporter).await;

        self.tokens.lock().expect("token lock poisoned").remove(&id);

        match outcome {
            Ok(client_outcome) => {
                // Invalidate before Completed becomes observable so the next
                // read sees post-mutation state. The mutation also stands when
                // a cancel arrived mid-call, so invalidation happens first
                // either way.
                {
                    let mut cache = self.cache.lock().await;
                    for path in kind.affected_paths() {
                        cache.invalidate_for_operation(&path);
                    }
                }

                let cancelled = token.is_cancelled();
                let mut ops = self.operations.lock().expect("operations lock poisoned");
                if let Some(op) = ops.iter_mut().find(|op| op.id == id) {
                    if cancelled {
                        op.status = OperationStatus::Cancelled;
                    } else {
                        op.status = OperationStatus::Completed;
                        op.progress = Some(100);
                        op.revision = client_outcome.revision;
                    }
                    op.completed_at = Some(Utc::now());
                }
            }
            Err(err) if token.is_cancelled() || err.is_cancelled() => {
                let mut ops = self.operations.lock().expect("operations lock poisoned");
                if let Some(op) = ops.iter_mut().find(|op| op.id == id) {
                    op.status = OperationStatus::Cancelled;
                    op.completed_at = Some(Utc::now());
                }
            }
            Err(err) => {
                log::warn!("operation {id} failed: {err}");
                let mut ops = self.operations.lock().expect("operations lock poisoned");
                if let Some(op) = ops.iter_mut().find(|op| op.id == id) {
                    op.status = OperationStatus::Failed;
                    op.error = Some(err.to_string());
                    op.completed_at = Some(Utc::now());
                }
            }
        }

        let _ = self.terminal_events.send(id);
    }

    /// Execute one operation against the external client
    async fn dispatch(
        &self,
        kind: &OperationKind,
        token: &CancellationToken,
        reporter: &ProgressReporter,
    ) -> Result<ClientOutcome> {
        if token.is_cancelled() {
            return Err(SvnNavigatorError::Cancelled);
        }
        reporter.report(0, kind.affected_paths().into_iter().next());

        match kind {
            OperationKind::Commit { paths, message } => {
                self.client.commit(paths, message).await
            }
            OperationKind::Update { path } => self.client.update(path).await,
            OperationKind::Revert { paths } => self.client.revert(paths).await,
            OperationKind::Add { paths } => self.client.add(paths).await,
            OperationKind::Delete { paths } => self.client.delete(paths).await,
            OperationKind::Checkout { url, path } => self.client.checkout(url, path).await,
            OperationKind::Export { path, destination } => {
                self.client.export(path, destination).await
            }
            OperationKind::Merge { source, path } => self.client.merge(source, path).await,
            OperationKind::Switch { url, path } => self.client.switch_to(url, path).await,
            OperationKind::Copy {
                source,
                destination,
            } => self.client.copy_to(source, destination).await,
            OperationKind::Move {
                source,
                destination,
            } => self.client.move_to(source, destination).await,
            OperationKind::Cleanup { path } => self.client.cleanup(path).await,
            OperationKind::Lock { path, message } => {
                self.client.lock(path, message.as_deref()).await
            }
            OperationKind::Unlock { path, force } => self.client.unlock(path, *force).await,
            OperationKind::Resolve { path, resolution } => {
                self.client.resolve(path, *resolution).await
            }
            OperationKind::Custom { path, args } => self.client.run_custom(path, args).await,
        }
    }
}
