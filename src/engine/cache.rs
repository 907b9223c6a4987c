//! Keyed, TTL-based status cache with hierarchical invalidation.
//!
//! The cache stores four record families keyed by normalized path: directory
//! listings, shallow status, deep (aggregated) status, and versioned flags.
//! Records expire by family-specific TTL; a stale record is logically absent and
//! is evicted lazily on the read that discovers it, so no background sweeper
//! thread is needed.
//!
//! # Public API
//! - [`StatusCache`]: The store itself, owned by the engine behind a lock
//! - [`CacheFamily`] / [`CacheValue`]: Typed record families
//!
//! # Invalidation
//! A completed mutating operation on path P removes every family at P, then
//! walks P's ancestors removing their deep and shallow records: a folder's
//! aggregated status is a function of all descendants, and its shallow view can
//! change when direct children appear or disappear. Ancestor listings survive
//! because their direct child set did not change.

use crate::core::config::CacheTtlConfig;
use crate::core::entry::{ScanResult, StatusEntry};
use crate::core::status::FileStatus;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Record families stored in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheFamily {
    Listing,
    ShallowStatus,
    DeepStatus,
    Versioned,
}

/// A typed cache record value
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Listing(Vec<StatusEntry>),
    ShallowStatus(ScanResult),
    DeepStatus(FileStatus),
    Versioned(bool),
}

impl CacheValue {
    pub fn family(&self) -> CacheFamily {
        match self {
            CacheValue::Listing(_) => CacheFamily::Listing,
            CacheValue::ShallowStatus(_) => CacheFamily::ShallowStatus,
            CacheValue::DeepStatus(_) => CacheFamily::DeepStatus,
            CacheValue::Versioned(_) => CacheFamily::Versioned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    family: CacheFamily,
    path: PathBuf,
}

struct CacheRecord {
    value: CacheValue,
    inserted_at: Instant,
    /// `None` means the record never expires on its own
    ttl: Option<Duration>,
}

impl CacheRecord {
    fn is_stale(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.duration_since(self.inserted_at) > ttl,
            None => false,
        }
    }
}

/// In-memory store for the four status cache families
///
/// Pure data structure: no I/O, no failure modes. Callers repopulate it from
/// scans after invalidation.
pub struct StatusCache {
    records: HashMap<CacheKey, CacheRecord>,
    ttl: CacheTtlConfig,
}

impl StatusCache {
    pub fn new(ttl: CacheTtlConfig) -> Self {
        Self {
            records: HashMap::new(),
            ttl,
        }
    }

    fn ttl_for(&self, family: CacheFamily) -> Option<Duration> {
        let secs = match family {
            CacheFamily::Listing => self.ttl.listing_secs,
            CacheFamily::ShallowStatus => self.ttl.shallow_status_secs,
            CacheFamily::DeepStatus => self.ttl.deep_status_secs,
            CacheFamily::Versioned => self.ttl.versioned_secs,
        };
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Look up a record, treating stale records as absent
    ///
    /// The stale record discovered here is evicted before returning.
    pub fn get(&mut self, family: CacheFamily, path: &Path) -> Option<CacheValue> {
        let key = CacheKey {
            family,
            path: path.to_path_buf(),
        };
        let now = Instant::now();

        match self.records.get(&key) {
            Some(record) if record.is_stale(now) => {
                log::debug!("cache expired: {:?} {}", family, path.display());
                self.records.remove(&key);
                None
            }
            Some(record) => Some(record.value.clone()),
            None => None,
        }
    }

    /// Typed convenience lookup for the deep (aggregated) status family
    pub fn get_deep_status(&mut self, path: &Path) -> Option<FileStatus> {
        match self.get(CacheFamily::DeepStatus, path) {
            Some(CacheValue::DeepStatus(status)) => Some(status),
            _ => None,
        }
    }

    /// Typed convenience lookup for the shallow status family
    pub fn get_shallow_status(&mut self, path: &Path) -> Option<ScanResult> {
        match self.get(CacheFamily::ShallowStatus, path) {
            Some(CacheValue::ShallowStatus(result)) => Some(result),
            _ => None,
        }
    }

    /// Insert or replace the record for `path` in the value's own family
    ///
    /// Records are always replaced wholesale, never patched.
    pub fn set(&mut self, path: &Path, value: CacheValue) {
        let family = value.family();
        let key = CacheKey {
            family,
            path: path.to_path_buf(),
        };
        let record = CacheRecord {
            value,
            inserted_at: Instant::now(),
            ttl: self.ttl_for(family),
        };
        self.records.insert(key, record);
    }

    /// Remove one record
    pub fn invalidate(&mut self, family: CacheFamily, path: &Path) {
        self.records.remove(&CacheKey {
            family,
            path: path.to_path_buf(),
        });
    }

    /// Remove every record whose path equals `prefix` or is nested under it
    ///
    /// Matching is on path-segment boundaries: `/foo` does not match `/foobar`.
    pub fn invalidate_prefix(&mut self, prefix: &Path) {
        self.records.retain(|key, _| !key.path.starts_with(prefix));
    }

    /// Invalidation triggered by a completed mutating operation on `path`
    ///
    /// Removes all four families at `path`, then the deep and shallow records
    /// of every ancestor up to (excluding) the filesystem root. Ancestor
    /// listings are left in place.
    pub fn invalidate_for_operation(&mut self, path: &Path) {
        log::debug!("invalidating cache for operation on {}", path.display());

        for family in [
            CacheFamily::Listing,
            CacheFamily::ShallowStatus,
            CacheFamily::DeepStatus,
            CacheFamily::Versioned,
        ] {
            self.invalidate(family, path);
        }

        let mut current = path.parent();
        while let Some(ancestor) = current {
            if ancestor.as_os_str().is_empty() || ancestor == Path::new("/") {
                break;
            }
            self.invalidate(CacheFamily::DeepStatus, ancestor);
            self.invalidate(CacheFamily::ShallowStatus, ancestor);
            current = ancestor.parent();
        }
    }

    /// Number of live (possibly stale) records, for diagnostics
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when a record for the key currently exists, ignoring staleness
    pub fn contains(&self, family: CacheFamily, path: &Path) -> bool {
        self.records.contains_key(&CacheKey {
            family,
            path: path.to_path_buf(),
        })
    }

    #[cfg(test)]
    fn backdate(&mut self, family: CacheFamily, path: &Path, by: Duration) {
        let key = CacheKey {
            family,
            path: path.to_path_buf(),
        };
        if let Some(record) = self.records.get_mut(&key) {
            record.inserted_at = Instant::now() - by;
        }
    }
}
