//! SVN Navigator - A lightweight Rust engine and CLI for Subversion working copies.
//!
//! This library provides the core functionality for svn-navigator: querying
//! working-copy status at multiple granularities, rolling per-file statuses up to
//! folder indicators, streaming large scans incrementally with cancellation,
//! caching results with hierarchical invalidation, and scheduling mutating
//! operations through a concurrency-bounded retryable queue.
//!
//! # Public API
//! The [`core`] module holds the building blocks (client interface, status and
//! entry model, errors, configuration, presentation), and the [`engine`] module
//! holds the moving parts (cache, aggregator, scanner, watcher, queue, loader)
//! behind the [`engine::StatusEngine`] composition root.

pub mod commands;
pub mod core;
pub mod engine;

// Re-export the core public API for external users
pub use core::{
    format_counts_summary,
    format_entry_line,
    // Color system (core functions)
    get_status_color_style,
    print_error,
    print_info,
    print_success,

    // External client
    ClientOutcome,
    CommandLineClient,
    Depth,
    Resolution,
    SvnClient,

    // Configuration
    CacheTtlConfig,
    EngineConfig,

    // Status and entry model
    FileStatus,
    LockInfo,
    ScanResult,
    StatusCounts,
    StatusEntry,

    // Error handling
    Result,
    SvnNavigatorError,
};

pub use engine::{
    aggregate_status,
    CacheFamily,
    CacheValue,
    CancellationToken,
    IncrementalScanner,
    LazyChunkLoader,
    Operation,
    OperationKind,
    OperationOptions,
    OperationQueue,
    OperationStatus,
    ScanEvent,
    ScanOptions,
    ScanPhase,
    ScanProgress,
    StatusCache,
    StatusEngine,
};
