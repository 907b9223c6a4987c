//! Lazy chunked loading for very large result sets.
//!
//! Working copies above the large-listing threshold are not materialized
//! eagerly; instead a sparse array of item slots is filled chunk by chunk as the
//! presentation layer asks for ranges. Chunks load sequentially, never in
//! parallel, which bounds external-client concurrency and preserves request
//! ordering.
//!
//! # Public API
//! - [`LazyChunkLoader`]: Sparse paged view over a [`ChunkSource`]
//! - [`ChunkSource`]: Async source of fixed-size pages
//! - [`ChunkMeta`]: Bookkeeping for one loaded chunk

use crate::core::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Async source of items addressable by absolute offset
#[async_trait]
pub trait ChunkSource<T>: Send + Sync {
    /// Total number of items available
    async fn total(&self) -> Result<usize>;

    /// Fetch up to `limit` items starting at `offset`
    async fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<T>>;
}

/// Bookkeeping for one loaded chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMeta {
    pub start_index: usize,
    pub end_index: usize,
    pub loaded_at: Instant,
}

/// Sparse, chunk-granular view over a large ordered result set
pub struct LazyChunkLoader<T> {
    source: Arc<dyn ChunkSource<T>>,
    chunk_size: usize,
    items: Vec<Option<T>>,
    chunks: HashMap<usize, ChunkMeta>,
    total: Option<usize>,
}

impl<T: Clone> LazyChunkLoader<T> {
    pub fn new(source: Arc<dyn ChunkSource<T>>, chunk_size: usize) -> Self {
        Self {
            source,
            chunk_size: chunk_size.max(1),
            items: Vec::new(),
            chunks: HashMap::new(),
            total: None,
        }
    }

    /// Total item count, fetching it from the source on first use
    pub async fn total(&mut self) -> Result<usize> {
        if let Some(total) = self.total {
            return Ok(total);
        }
        let total = self.source.total().await?;
        self.total = Some(total);
        self.items.resize_with(total, || None);
        Ok(total)
    }

    /// Number of chunks needed to cover the whole set
    pub async fn chunk_count(&mut self) -> Result<usize> {
        let total = self.total().await?;
        Ok(total.div_ceil(self.chunk_size))
    }

    /// Load one chunk by index; already-loaded chunks are not refetched
    pub async fn load_chunk(&mut self, index: usize) -> Result<usize> {
        let total = self.total().await?;
        if self.chunks.contains_key(&index) {
            return Ok(0);
        }

        let start = index * self.chunk_size;
        if start >= total {
            return Ok(0);
        }
        let limit = self.chunk_size.min(total - start);

        let fetched = self.source.fetch(start, limit).await?;
        let loaded = fetched.len();
        for (offset, item) in fetched.into_iter().enumerate() {
            if let Some(slot) = self.items.get_mut(start + offset) {
                *slot = Some(item);
            }
        }

        self.chunks.insert(
            index,
            ChunkMeta {
                start_index: start,
                end_index: start + loaded.saturating_sub(1),
                loaded_at: Instant::now(),
            },
        );
        log::debug!("loaded chunk {index} ({loaded} items at offset {start})");
        Ok(loaded)
    }

    /// Load every chunk intersecting `[start_index, end_index]` not yet present
    ///
    /// Chunks load one after another to keep external-client requests ordered.
    pub async fn ensure_range_loaded(
        &mut self,
        start_index: usize,
        end_index: usize,
    ) -> Result<usize> {
        let total = self.total().await?;
        if total == 0 || start_index > end_index {
            return Ok(0);
        }

        let clamped_end = end_index.min(total.saturating_sub(1));
        let first_chunk = start_index / self.chunk_size;
        let last_chunk = clamped_end / self.chunk_size;

        let mut loaded = 0;
        for index in first_chunk..=last_chunk {
            loaded += self.load_chunk(index).await?;
        }
        Ok(loaded)
    }

    /// Load the next chunk after the highest one loaded so far
    pub async fn load_more(&mut self) -> Result<usize> {
        let next = self
            .chunks
            .keys()
            .max()
            .map(|highest| highest + 1)
            .unwrap_or(0);
        self.load_chunk(next).await
    }

    /// Item at `index` if its chunk has been loaded
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).and_then(|slot| slot.as_ref())
    }

    /// Whether the chunk at `index` is loaded
    pub fn is_chunk_loaded(&self, index: usize) -> bool {
        self.chunks.contains_key(&index)
    }

    /// Metadata for a loaded chunk
    pub fn chunk_meta(&self, index: usize) -> Option<&ChunkMeta> {
        self.chunks.get(&index)
    }

    /// Number of items currently resident
    pub fn loaded_len(&self) -> usize {
        self.items.iter().filter(|slot| slot.is_some()).count()
    }
}
