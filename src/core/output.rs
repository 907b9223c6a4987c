//! Unified output formatting utilities for consistent CLI presentation.
//!
//! This module provides standardized formatting functions for all svn-navigator
//! output, ensuring consistent colors, spacing, and message structure across
//! commands.
//!
//! # Design Principles
//! - **Consistent color scheme**: Red for errors, green for success, muted for detail
//! - **Standardized spacing**: Newline before and after all command outputs
//! - **State, not noise**: scan and operation reports render engine state verbatim

use crate::core::colors::format_entry_line;
use crate::core::entry::{ScanResult, StatusCounts};
use colored::*;

/// Formats and prints an error message with consistent styling
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Render a scan progress tick on one line
pub fn format_scan_progress(files_scanned: usize, current_path: Option<&str>) -> String {
    match current_path {
        Some(path) => format!(
            "{} {} {}",
            "scanned".bright_black(),
            files_scanned.to_string().white(),
            path.bright_black()
        ),
        None => format!(
            "{} {}",
            "scanned".bright_black(),
            files_scanned.to_string().white()
        ),
    }
}

/// Print the entries of a completed scan followed by a count summary
pub fn print_scan_result(result: &ScanResult) {
    println!();
    for entry in &result.entries {
        println!(
            "{}",
            format_entry_line(
                entry.status,
                entry.lock.is_some(),
                &entry.path.to_string_lossy()
            )
        );
    }
    println!("\n{}", format_counts_summary(&result.counts));
}

/// Render the per-status counts as a single summary line
pub fn format_counts_summary(counts: &StatusCounts) -> String {
    format!(
        "{} added, {} modified, {} deleted, {} conflicted, {} unversioned, {} locked",
        counts.added.to_string().green(),
        counts.modified.to_string().yellow(),
        counts.deleted.to_string().red(),
        counts.conflicted.to_string().red().bold(),
        counts.unversioned.to_string().cyan(),
        counts.locked.to_string().bright_black(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::StatusEntry;
    use crate::core::status::FileStatus;

    #[test]
    fn test_print_helpers_do_not_panic() {
        print_error("Test error message");
        print_success("Operation completed");
        print_info("Information message");
    }

    #[test]
    fn test_format_scan_progress() {
        let line = format_scan_progress(120, Some("/wc/src/lib.rs"));
        assert!(line.contains("120"));
        assert!(line.contains("/wc/src/lib.rs"));

        let bare = format_scan_progress(5, None);
        assert!(bare.contains('5'));
    }

    #[test]
    fn test_counts_summary_mentions_every_bucket() {
        let result = ScanResult::new(vec![
            StatusEntry::new("/wc/a", FileStatus::Added, false),
            StatusEntry::new("/wc/b", FileStatus::Conflicted, false),
        ]);
        let summary = format_counts_summary(&result.counts);
        for label in [
            "added",
            "modified",
            "deleted",
            "conflicted",
            "unversioned",
            "locked",
        ] {
            assert!(summary.contains(label), "missing {label}");
        }
    }
}
