//! Core functionality for the svn-navigator engine.
//!
//! This module provides the fundamental building blocks: the external client
//! interface, the status and entry model, error handling, configuration, and
//! CLI presentation helpers.

pub mod client;
pub mod colors;
pub mod config;
pub mod dirs;
pub mod entry;
pub mod error;
pub mod output;
pub mod status;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{Result, SvnNavigatorError};

// === External client ===
// Narrow command interface to the svn executable
pub use client::{ClientOutcome, CommandLineClient, Depth, Resolution, SvnClient};

// === Status types ===
// Type-safe status enumeration to replace raw status characters
pub use status::FileStatus;

// === Entry model ===
// Immutable per-path status records and derived scan results
pub use entry::{LockInfo, ScanResult, StatusCounts, StatusEntry};

// === Configuration ===
// Engine tunables with JSON persistence
pub use config::{CacheTtlConfig, EngineConfig};

// === Color system ===
// Unified color system for consistent status coloring
pub use colors::{format_entry_line, get_aligned_status, get_colored_path, get_status_color_style};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{
    format_counts_summary, format_scan_progress, print_error, print_info, print_scan_result,
    print_success,
};
