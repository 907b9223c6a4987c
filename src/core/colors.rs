//! Unified color system for consistent status visualization.
//!
//! This module provides a centralized color mapping so every status indicator uses
//! the same color wherever it appears, replacing scattered color logic with a single
//! source of truth.
//!
//! # Public API
//! - [`get_status_color_style`]: Get color function for a file status
//! - [`get_aligned_status`]: Get colored status character with alignment padding
//! - [`get_colored_path`]: Apply status color to file paths
//! - [`format_entry_line`]: Complete status line formatting
//!
//! # Color Scheme
//! - **Conflicted**: Red bold, it needs attention before anything else
//! - **Missing/Obstructed**: Red, working copy damage
//! - **Modified**: Yellow, **Deleted**: Red, **Replaced**: Magenta
//! - **Added**: Green, **External**: Blue
//! - **Unversioned**: Cyan, **Ignored/Normal**: Muted

use crate::core::status::FileStatus;
use colored::*;

/// Single function to apply color styling based on file status
///
/// Returns a closure that can be applied to any text to get the appropriate color
pub fn get_status_color_style(status: FileStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        FileStatus::Conflicted => Box::new(|text: &str| text.red().bold()),
        FileStatus::Missing => Box::new(|text: &str| text.red()),
        FileStatus::Obstructed => Box::new(|text: &str| text.red()),
        FileStatus::Modified => Box::new(|text: &str| text.yellow()),
        FileStatus::Deleted => Box::new(|text: &str| text.red()),
        FileStatus::Replaced => Box::new(|text: &str| text.magenta()),
        FileStatus::Added => Box::new(|text: &str| text.green()),
        FileStatus::External => Box::new(|text: &str| text.blue()),
        FileStatus::Unversioned => Box::new(|text: &str| text.cyan()),
        FileStatus::Ignored => Box::new(|text: &str| text.bright_black()),
        FileStatus::Normal => Box::new(|text: &str| text.white()),
    }
}

/// Get colored status character padded to a fixed width
pub fn get_aligned_status(status: FileStatus) -> ColoredString {
    let color_fn = get_status_color_style(status);
    color_fn(&format!("{} ", status.as_char()))
}

/// Get colored file path using the status color
pub fn get_colored_path(status: FileStatus, path: &str) -> ColoredString {
    let color_fn = get_status_color_style(status);
    color_fn(path)
}

/// Format a complete status line: status character, lock marker, path
pub fn format_entry_line(status: FileStatus, locked: bool, path: &str) -> String {
    let status_colored = get_aligned_status(status);
    let lock_marker = if locked {
        "K ".bright_black()
    } else {
        "  ".normal()
    };
    let path_colored = get_colored_path(status, path);
    format!("{status_colored}{lock_marker} {path_colored}")
}
