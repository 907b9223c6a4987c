//! Working-copy entry model and derived scan results.
//!
//! This module defines the core data structures produced by status scans. Entries
//! are immutable values: a re-scan replaces them wholesale, nothing mutates them
//! in place, so they can be shared by reference between the cache and in-flight
//! scan results.
//!
//! # Public API
//! - [`StatusEntry`]: A single path with its status and metadata
//! - [`LockInfo`]: Repository lock ownership attached to an entry
//! - [`StatusCounts`]: Per-status tallies derived from an entry set
//! - [`ScanResult`]: Complete outcome of one status scan

use crate::core::status::FileStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Repository lock information for a locked entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub owner: String,
}

/// A single path in the working copy with its version-control status
///
/// Paths are absolute and separator-normalized to `/` so that cache keys and
/// ancestor walks compare consistently across platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub path: PathBuf,
    pub status: FileStatus,
    pub is_directory: bool,
    pub revision: Option<u64>,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub lock: Option<LockInfo>,
}

impl StatusEntry {
    /// Create an entry with only the required fields set
    pub fn new(path: impl Into<PathBuf>, status: FileStatus, is_directory: bool) -> Self {
        Self {
            path: normalize_path(path.into()),
            status,
            is_directory,
            revision: None,
            author: None,
            date: None,
            lock: None,
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_lock(mut self, owner: impl Into<String>) -> Self {
        self.lock = Some(LockInfo {
            owner: owner.into(),
        });
        self
    }
}

/// Normalize a path to forward slashes
///
/// Cache keys and ancestor walks rely on `/` being the only separator.
pub fn normalize_path(path: PathBuf) -> PathBuf {
    let text = path.to_string_lossy();
    if text.contains('\\') {
        PathBuf::from(text.replace('\\', "/"))
    } else {
        path
    }
}

/// Per-status tallies over a set of entries
///
/// Counts are always recomputed from the full entry set, never maintained
/// incrementally, so they cannot drift from the entries they describe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub conflicted: usize,
    pub unversioned: usize,
    pub locked: usize,
}

impl StatusCounts {
    /// Tally counts over an entry set in a single pass
    pub fn tally(entries: &[StatusEntry]) -> Self {
        let mut counts = StatusCounts::default();
        for entry in entries {
            match entry.status {
                FileStatus::Added => counts.added += 1,
                FileStatus::Modified => counts.modified += 1,
                FileStatus::Deleted => counts.deleted += 1,
                FileStatus::Conflicted => counts.conflicted += 1,
                FileStatus::Unversioned => counts.unversioned += 1,
                _ => {}
            }
            if entry.lock.is_some() {
                counts.locked += 1;
            }
        }
        counts
    }

    /// Total number of entries representing local changes
    pub fn changes(&self) -> usize {
        self.added + self.modified + self.deleted + self.conflicted
    }
}

/// Complete outcome of one status scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub entries: Vec<StatusEntry>,
    pub counts: StatusCounts,
}

impl ScanResult {
    pub fn new(entries: Vec<StatusEntry>) -> Self {
        let counts = StatusCounts::tally(&entries);
        Self { entries, counts }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries that are direct children of `dir` (shallow view)
    pub fn direct_children(&self, dir: &Path) -> Vec<StatusEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.path.parent() == Some(dir))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let entry = StatusEntry::new("/wc/src/main.rs", FileStatus::Modified, false)
            .with_revision(42)
            .with_author("alice")
            .with_lock("bob");

        assert_eq!(entry.path, PathBuf::from("/wc/src/main.rs"));
        assert_eq!(entry.status, FileStatus::Modified);
        assert_eq!(entry.revision, Some(42));
        assert_eq!(entry.author.as_deref(), Some("alice"));
        assert_eq!(entry.lock.as_ref().map(|l| l.owner.as_str()), Some("bob"));
    }

    #[test]
    fn test_normalize_path_backslashes() {
        let entry = StatusEntry::new(r"C:\wc\src\main.rs", FileStatus::Normal, false);
        assert_eq!(entry.path, PathBuf::from("C:/wc/src/main.rs"));
    }

    #[test]
    fn test_counts_tally() {
        let entries = vec![
            StatusEntry::new("/wc/a", FileStatus::Added, false),
            StatusEntry::new("/wc/b", FileStatus::Modified, false),
            StatusEntry::new("/wc/c", FileStatus::Modified, false).with_lock("alice"),
            StatusEntry::new("/wc/d", FileStatus::Deleted, false),
            StatusEntry::new("/wc/e", FileStatus::Conflicted, false),
            StatusEntry::new("/wc/f", FileStatus::Unversioned, false),
            StatusEntry::new("/wc/g", FileStatus::Normal, false),
        ];

        let counts = StatusCounts::tally(&entries);
        assert_eq!(counts.added, 1);
        assert_eq!(counts.modified, 2);
        assert_eq!(counts.deleted, 1);
        assert_eq!(counts.conflicted, 1);
        assert_eq!(counts.unversioned, 1);
        assert_eq!(counts.locked, 1);
        assert_eq!(counts.changes(), 5);
    }

    #[test]
    fn test_counts_recomputed_not_incremental() {
        let entries = vec![StatusEntry::new("/wc/a", FileStatus::Added, false)];
        let first = StatusCounts::tally(&entries);
        let second = StatusCounts::tally(&entries);
        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_result_derives_counts() {
        let result = ScanResult::new(vec![
            StatusEntry::new("/wc/a", FileStatus::Modified, false),
            StatusEntry::new("/wc/b", FileStatus::Unversioned, false),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.counts.modified, 1);
        assert_eq!(result.counts.unversioned, 1);
    }

    #[test]
    fn test_direct_children() {
        let result = ScanResult::new(vec![
            StatusEntry::new("/wc/a.txt", FileStatus::Modified, false),
            StatusEntry::new("/wc/sub", FileStatus::Normal, true),
            StatusEntry::new("/wc/sub/b.txt", FileStatus::Added, false),
        ]);

        let children = result.direct_children(Path::new("/wc"));
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|e| e.path.parent() == Some(Path::new("/wc"))));
    }
}
