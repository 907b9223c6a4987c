//! Type-safe Subversion file status enumeration.
//!
//! This module defines [`FileStatus`] which replaces single-character status codes
//! throughout the codebase with a proper enumeration. Unknown codes become a parse
//! error at the boundary instead of a silent default deeper in the engine.
//!
//! # Public API
//! - [`FileStatus`]: Main enumeration for all working-copy status codes
//!
//! # Key Features
//! - **Type safety**: Compile-time checking instead of runtime character comparisons
//! - **Priority ordering**: Total order used for folder-level worst-status aggregation
//! - **Display formatting**: Consistent single-character representation for output
//! - **Serde support**: Serialized as the status character

use crate::core::error::SvnNavigatorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Working-copy file status enum to replace raw status characters
///
/// The variants mirror the first column of `svn status` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum FileStatus {
    /// Conflicted after merge or update (C)
    Conflicted,
    /// Under version control but missing from disk (!)
    Missing,
    /// Versioned item obstructed by an item of a different kind (~)
    Obstructed,
    /// Local modifications (M)
    Modified,
    /// Scheduled for deletion (D)
    Deleted,
    /// Replaced: deleted and re-added in place (R)
    Replaced,
    /// Scheduled for addition (A)
    Added,
    /// Item from an external definition (X)
    External,
    /// Not under version control (?)
    Unversioned,
    /// Matched an ignore pattern (I)
    Ignored,
    /// No modifications (space in svn output)
    Normal,
}

impl FileStatus {
    /// Convert a status character from `svn status` output into the enum
    ///
    /// Returns `None` for codes this engine does not model; callers at the
    /// parse boundary turn that into [`SvnNavigatorError::UnknownStatusCode`].
    pub fn from_code(code: char) -> Option<FileStatus> {
        match code {
            'C' => Some(FileStatus::Conflicted),
            '!' => Some(FileStatus::Missing),
            '~' => Some(FileStatus::Obstructed),
            'M' => Some(FileStatus::Modified),
            'D' => Some(FileStatus::Deleted),
            'R' => Some(FileStatus::Replaced),
            'A' => Some(FileStatus::Added),
            'X' => Some(FileStatus::External),
            '?' => Some(FileStatus::Unversioned),
            'I' => Some(FileStatus::Ignored),
            ' ' => Some(FileStatus::Normal),
            _ => None,
        }
    }

    /// Get the single-character representation used in status output
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Conflicted => 'C',
            FileStatus::Missing => '!',
            FileStatus::Obstructed => '~',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Replaced => 'R',
            FileStatus::Added => 'A',
            FileStatus::External => 'X',
            FileStatus::Unversioned => '?',
            FileStatus::Ignored => 'I',
            FileStatus::Normal => ' ',
        }
    }

    /// Get the aggregation priority for this status
    ///
    /// The ordering is total and strictly decreasing from Conflicted to Normal.
    /// It is used only for MAX-reduction when rolling descendant statuses up to
    /// a folder, never for equality comparison across unrelated codes.
    pub fn priority(&self) -> u8 {
        match self {
            FileStatus::Conflicted => 100,
            FileStatus::Missing => 90,
            FileStatus::Obstructed => 85,
            FileStatus::Modified => 80,
            FileStatus::Deleted => 70,
            FileStatus::Replaced => 60,
            FileStatus::Added => 50,
            FileStatus::External => 40,
            FileStatus::Unversioned => 30,
            FileStatus::Ignored => 20,
            FileStatus::Normal => 0,
        }
    }

    /// Get human-readable description for status
    pub fn description(&self) -> &'static str {
        match self {
            FileStatus::Conflicted => "conflicted",
            FileStatus::Missing => "missing",
            FileStatus::Obstructed => "obstructed",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Replaced => "replaced",
            FileStatus::Added => "added",
            FileStatus::External => "external",
            FileStatus::Unversioned => "unversioned",
            FileStatus::Ignored => "ignored",
            FileStatus::Normal => "normal",
        }
    }

    /// Check whether this status means the path is under version control
    pub fn is_versioned(&self) -> bool {
        !matches!(self, FileStatus::Unversioned | FileStatus::Ignored)
    }

    /// Check whether this status represents a local change worth committing
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            FileStatus::Conflicted
                | FileStatus::Modified
                | FileStatus::Deleted
                | FileStatus::Replaced
                | FileStatus::Added
        )
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl From<FileStatus> for char {
    fn from(status: FileStatus) -> char {
        status.as_char()
    }
}

impl TryFrom<char> for FileStatus {
    type Error = SvnNavigatorError;

    fn try_from(code: char) -> Result<Self, Self::Error> {
        FileStatus::from_code(code).ok_or(SvnNavigatorError::UnknownStatusCode { code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_char() {
        assert_eq!(FileStatus::Conflicted.as_char(), 'C');
        assert_eq!(FileStatus::Missing.as_char(), '!');
        assert_eq!(FileStatus::Obstructed.as_char(), '~');
        assert_eq!(FileStatus::Modified.as_char(), 'M');
        assert_eq!(FileStatus::Deleted.as_char(), 'D');
        assert_eq!(FileStatus::Replaced.as_char(), 'R');
        assert_eq!(FileStatus::Added.as_char(), 'A');
        assert_eq!(FileStatus::External.as_char(), 'X');
        assert_eq!(FileStatus::Unversioned.as_char(), '?');
        assert_eq!(FileStatus::Ignored.as_char(), 'I');
        assert_eq!(FileStatus::Normal.as_char(), ' ');
    }

    #[test]
    fn test_status_from_code_round_trip() {
        for status in [
            FileStatus::Conflicted,
            FileStatus::Missing,
            FileStatus::Obstructed,
            FileStatus::Modified,
            FileStatus::Deleted,
            FileStatus::Replaced,
            FileStatus::Added,
            FileStatus::External,
            FileStatus::Unversioned,
            FileStatus::Ignored,
            FileStatus::Normal,
        ] {
            assert_eq!(FileStatus::from_code(status.as_char()), Some(status));
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert_eq!(FileStatus::from_code('Z'), None);
        assert!(FileStatus::try_from('Z').is_err());
    }

    #[test]
    fn test_priority_is_strictly_ordered() {
        let ordered = [
            FileStatus::Conflicted,
            FileStatus::Missing,
            FileStatus::Obstructed,
            FileStatus::Modified,
            FileStatus::Deleted,
            FileStatus::Replaced,
            FileStatus::Added,
            FileStatus::External,
            FileStatus::Unversioned,
            FileStatus::Ignored,
            FileStatus::Normal,
        ];

        for pair in ordered.windows(2) {
            assert!(
                pair[0].priority() > pair[1].priority(),
                "{:?} must outrank {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_priority_values() {
        assert_eq!(FileStatus::Conflicted.priority(), 100);
        assert_eq!(FileStatus::Missing.priority(), 90);
        assert_eq!(FileStatus::Obstructed.priority(), 85);
        assert_eq!(FileStatus::Modified.priority(), 80);
        assert_eq!(FileStatus::Normal.priority(), 0);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", FileStatus::Modified), "M");
        assert_eq!(format!("{}", FileStatus::Unversioned), "?");
        assert_eq!(format!("{}", FileStatus::Normal), " ");
    }

    #[test]
    fn test_description() {
        assert_eq!(FileStatus::Modified.description(), "modified");
        assert_eq!(FileStatus::Added.description(), "added");
        assert_eq!(FileStatus::Unversioned.description(), "unversioned");
        assert_eq!(FileStatus::Conflicted.description(), "conflicted");
    }

    #[test]
    fn test_versioned_and_change_predicates() {
        assert!(FileStatus::Modified.is_versioned());
        assert!(FileStatus::Normal.is_versioned());
        assert!(!FileStatus::Unversioned.is_versioned());
        assert!(!FileStatus::Ignored.is_versioned());

        assert!(FileStatus::Modified.is_change());
        assert!(FileStatus::Added.is_change());
        assert!(!FileStatus::Normal.is_change());
        assert!(!FileStatus::External.is_change());
    }
}
