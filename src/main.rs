use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use svn_navigator::commands::*;
use svn_navigator::core::{client::Depth, error::Result, print_error};

#[derive(Parser)]
#[command(name = "svn-navigator")]
#[command(about = "A lightweight and efficient Subversion working-copy tool")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan working-copy status with incremental progress
    Status {
        /// Path to scan (defaults to the current directory)
        path: Option<PathBuf>,
        /// Restrict the scan to the target's direct file children
        #[arg(long)]
        shallow: bool,
    },
    /// Scan, then rescan automatically when the working copy changes
    Watch {
        /// Path to watch (defaults to the current directory)
        path: Option<PathBuf>,
        /// React only to .svn administrative-area changes
        #[arg(long)]
        svn_only: bool,
    },
    /// Commit local changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
        /// Paths to commit
        paths: Vec<PathBuf>,
    },
    /// Update a path to the latest revision
    Update { path: PathBuf },
    /// Revert local changes
    Revert { paths: Vec<PathBuf> },
    /// Schedule paths for addition
    Add { paths: Vec<PathBuf> },
    /// Schedule paths for deletion
    Delete { paths: Vec<PathBuf> },
    /// Lock a path in the repository
    Lock {
        path: PathBuf,
        /// Lock comment
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Release a repository lock
    Unlock {
        path: PathBuf,
        /// Break a lock held by someone else
        #[arg(long)]
        force: bool,
    },
    /// Mark a conflicted path as resolved
    Resolve {
        path: PathBuf,
        /// Resolution: working, theirs-full, mine-full or base
        #[arg(long, default_value = "working")]
        accept: String,
    },
    /// Clean up working-copy locks and unfinished operations
    Cleanup { path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let outcome = match cli.command {
        Commands::Status { path, shallow } => {
            let depth = if shallow { Depth::Files } else { Depth::Infinity };
            execute_status(path, depth).await
        }
        Commands::Watch { path, svn_only } => execute_watch(path, svn_only).await,
        Commands::Commit { message, paths } => execute_commit(paths, message).await,
        Commands::Update { path } => execute_update(path).await,
        Commands::Revert { paths } => execute_revert(paths).await,
        Commands::Add { paths } => execute_add(paths).await,
        Commands::Delete { paths } => execute_delete(paths).await,
        Commands::Lock { path, message } => execute_lock(path, message).await,
        Commands::Unlock { path, force } => execute_unlock(path, force).await,
        Commands::Resolve { path, accept } => execute_resolve(path, accept).await,
        Commands::Cleanup { path } => execute_cleanup(path).await,
    };

    if let Err(e) = outcome {
        print_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}
