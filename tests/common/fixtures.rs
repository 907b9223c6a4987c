//! Test data generation utilities and predefined scenarios
//!
//! Provides entry-set builders for working copies in specific states so engine
//! scenarios can be tested consistently.

#![allow(dead_code)]

use svn_navigator::core::entry::StatusEntry;
use svn_navigator::core::status::FileStatus;

/// Scenario: a project with one modified file, one conflict in a subfolder
/// and one unversioned file next to it
pub fn conflicted_project() -> Vec<StatusEntry> {
    vec![
        StatusEntry::new("/proj", FileStatus::Normal, true),
        StatusEntry::new("/proj/a.txt", FileStatus::Modified, false),
        StatusEntry::new("/proj/sub", FileStatus::Normal, true),
        StatusEntry::new("/proj/sub/b.txt", FileStatus::Conflicted, false),
        StatusEntry::new("/proj/sub/c.txt", FileStatus::Unversioned, false),
    ]
}

/// Scenario: a flat working copy with `count` modified files under `root`
pub fn flat_tree(root: &str, count: usize) -> Vec<StatusEntry> {
    (0..count)
        .map(|i| {
            StatusEntry::new(
                format!("{root}/file{i:05}.txt"),
                FileStatus::Modified,
                false,
            )
        })
        .collect()
}

/// Scenario: a working copy exercising every status bucket once
pub fn mixed_tree(root: &str) -> Vec<StatusEntry> {
    vec![
        StatusEntry::new(format!("{root}/conflicted.c"), FileStatus::Conflicted, false),
        StatusEntry::new(format!("{root}/missing.c"), FileStatus::Missing, false),
        StatusEntry::new(format!("{root}/modified.c"), FileStatus::Modified, false),
        StatusEntry::new(format!("{root}/deleted.c"), FileStatus::Deleted, false),
        StatusEntry::new(format!("{root}/added.c"), FileStatus::Added, false),
        StatusEntry::new(format!("{root}/stray.tmp"), FileStatus::Unversioned, false),
        StatusEntry::new(format!("{root}/steady.c"), FileStatus::Normal, false)
            .with_revision(7)
            .with_author("jrandom"),
        StatusEntry::new(format!("{root}/locked.bin"), FileStatus::Normal, false)
            .with_lock("alice"),
    ]
}
