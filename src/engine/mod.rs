//! Status aggregation and operation scheduling engine.
//!
//! [`StatusEngine`] is the composition root: it is explicitly constructed with a
//! client and a configuration, owns the status cache, the incremental scanner
//! and the operation queue, and is passed by reference to consumers. There is no
//! ambient global state, so tests run any number of independent engines side by
//! side.

pub mod aggregate;
pub mod cache;
pub mod cancel;
pub mod loader;
pub mod queue;
pub mod scanner;
pub mod watcher;

pub use aggregate::{aggregate_status, is_strictly_under};
pub use cache::{CacheFamily, CacheValue, StatusCache};
pub use cancel::CancellationToken;
pub use loader::{ChunkMeta, ChunkSource, LazyChunkLoader};
pub use queue::{
    Operation, OperationKind, OperationOptions, OperationQueue, OperationStatus, ProgressReporter,
};
pub use scanner::{IncrementalScanner, ScanEvent, ScanOptions, ScanPhase, ScanProgress};
pub use watcher::{RescanWatcher, WatchOptions};

use crate::core::client::{Depth, SvnClient};
use crate::core::config::EngineConfig;
use crate::core::entry::StatusEntry;
use crate::core::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Composition root owning the cache, scanner and queue
pub struct StatusEngine {
    config: EngineConfig,
    cache: Arc<Mutex<StatusCache>>,
    scanner: IncrementalScanner,
    queue: OperationQueue,
    client: Arc<dyn SvnClient>,
}

impl StatusEngine {
    pub fn new(client: Arc<dyn SvnClient>, config: EngineConfig) -> Self {
        let cache = Arc::new(Mutex::new(StatusCache::new(config.cache_ttl)));
        let scanner = IncrementalScanner::new(Arc::clone(&client), Arc::clone(&cache));
        let queue = OperationQueue::new(
            Arc::clone(&client),
            Arc::clone(&cache),
            config.max_concurrent,
            OperationOptions {
                max_retries: config.max_retries,
                ..OperationOptions::default()
            },
        );

        Self {
            config,
            cache,
            scanner,
            queue,
            client,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> Arc<Mutex<StatusCache>> {
        Arc::clone(&self.cache)
    }

    pub fn scanner(&self) -> IncrementalScanner {
        self.scanner.clone()
    }

    pub fn queue(&self) -> OperationQueue {
        self.queue.clone()
    }

    /// Scan options derived from the engine configuration
    pub fn scan_options(&self, depth: Depth) -> ScanOptions {
        ScanOptions {
            depth,
            batch_size: self.config.batch_size,
        }
    }

    /// Start watching `path`, rescanning after each debounced change burst
    pub fn watch(&self, path: impl Into<PathBuf>, svn_only: bool) -> Result<RescanWatcher> {
        RescanWatcher::spawn(
            self.scanner(),
            path,
            self.scan_options(Depth::Infinity),
            WatchOptions {
                debounce: self.config.debounce(),
                svn_only,
            },
        )
    }

    /// Paged view over the entries of `path` for very large working copies
    pub fn entry_loader(&self, path: impl Into<PathBuf>) -> LazyChunkLoader<StatusEntry> {
        let source = CachedEntrySource {
            client: Arc::clone(&self.client),
            cache: Arc::clone(&self.cache),
            path: crate::core::entry::normalize_path(path.into()),
        };
        LazyChunkLoader::new(Arc::new(source), self.config.chunk_size)
    }
}

/// Chunk source reading entry pages out of the shallow-status cache family,
/// falling back to one full client fetch that repopulates it
struct CachedEntrySource {
    client: Arc<dyn SvnClient>,
    cache: Arc<Mutex<StatusCache>>,
    path: PathBuf,
}

impl CachedEntrySource {
    async fn entries(&self) -> Result<Vec<StatusEntry>> {
        {
            let mut cache = self.cache.lock().await;
            if let Some(result) = cache.get_shallow_status(&self.path) {
                return Ok(result.entries);
            }
        }

        let entries = self.client.status(Path::new(&self.path), Depth::Infinity).await?;
        let result = crate::core::entry::ScanResult::new(entries);
        let mut cache = self.cache.lock().await;
        cache.set(&self.path, CacheValue::ShallowStatus(result.clone()));
        Ok(result.entries)
    }
}

#[async_trait]
impl ChunkSource<StatusEntry> for CachedEntrySource {
    async fn total(&self) -> Result<usize> {
        Ok(self.entries().await?.len())
    }

    async fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<StatusEntry>> {
        let entries = self.entries().await?;
        let end = (offset + limit).min(entries.len());
        if offset >= end {
            return Ok(Vec::new());
        }
        Ok(entries[offset..end].to_vec())
    }
}
