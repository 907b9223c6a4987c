//! Folder-level worst-status aggregation.
//!
//! A directory is decorated with the highest-priority status found anywhere in
//! its subtree. Aggregation is a single linear pass over the descendant entries
//! using the total priority order on [`FileStatus`]; it is pure and cannot fail,
//! so callers simply write the result into the deep-status cache family.

use crate::core::entry::StatusEntry;
use crate::core::status::FileStatus;
use std::path::Path;

/// Compute the rolled-up status of `dir` from descendant entries
///
/// Only entries strictly under `dir` (on segment boundaries) participate; the
/// entry for `dir` itself does not. A directory with no descendants aggregates
/// to Normal.
pub fn aggregate_status(dir: &Path, entries: &[StatusEntry]) -> FileStatus {
    let mut worst = FileStatus::Normal;
    for entry in entries {
        if !is_strictly_under(dir, &entry.path) {
            continue;
        }
        if entry.status.priority() > worst.priority() {
            worst = entry.status;
        }
    }
    worst
}

/// True when `path` is nested somewhere below `dir`, excluding `dir` itself
///
/// Comparison is segment-aware: `/foo` is not an ancestor of `/foobar`.
pub fn is_strictly_under(dir: &Path, path: &Path) -> bool {
    path != dir && path.starts_with(dir)
}
