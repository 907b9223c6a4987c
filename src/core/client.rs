//! Subversion client interface and command-line implementation.
//!
//! This module provides the narrow command interface through which the engine talks
//! to the external version-control tool. The [`SvnClient`] trait has one method per
//! supported call; [`CommandLineClient`] implements it by spawning the `svn`
//! executable and parsing its output into typed entries.
//!
//! # Public API
//! - [`SvnClient`]: Async trait consumed by the scanner and the operation queue
//! - [`CommandLineClient`]: Production implementation shelling out to `svn`
//! - [`ClientOutcome`]: Result of a mutating call, carrying the new revision if any
//! - [`Resolution`]: Accepted conflict resolutions for `resolve`
//!
//! # Key Features
//! - **Status reading**: Convert `svn status --verbose` lines to typed [`StatusEntry`] values
//! - **Mutating operations**: commit/update/revert/add/delete/lock/unlock/resolve/cleanup
//!   plus the repository-side operations (checkout/export/merge/switch/copy/move)
//! - **Error surface**: Non-zero exits become [`SvnNavigatorError::ClientFailed`] with
//!   the trimmed stderr so the raw message reaches the user unmodified

use crate::core::{
    entry::StatusEntry,
    error::{Result, SvnNavigatorError},
    status::FileStatus,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Scan depth forwarded to the external client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    /// Only the target itself
    Empty,
    /// The target and its file children
    Files,
    /// The target and its full subtree
    #[default]
    Infinity,
}

impl Depth {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Depth::Empty => "empty",
            Depth::Files => "files",
            Depth::Infinity => "infinity",
        }
    }
}

/// Conflict resolutions accepted by `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Working,
    TheirsFull,
    MineFull,
    Base,
}

impl Resolution {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Resolution::Working => "working",
            Resolution::TheirsFull => "theirs-full",
            Resolution::MineFull => "mine-full",
            Resolution::Base => "base",
        }
    }
}

/// Result of a mutating client call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOutcome {
    /// Revision created or reached by the call, when the tool reports one
    pub revision: Option<u64>,
}

/// Narrow command interface to the external version-control tool
///
/// Every call is awaited to completion from the engine's perspective; a failed
/// call surfaces as [`SvnNavigatorError::ClientFailed`] carrying the raw message.
#[async_trait]
pub trait SvnClient: Send + Sync {
    async fn status(&self, path: &Path, depth: Depth) -> Result<Vec<StatusEntry>>;
    async fn commit(&self, paths: &[PathBuf], message: &str) -> Result<ClientOutcome>;
    async fn update(&self, path: &Path) -> Result<ClientOutcome>;
    async fn revert(&self, paths: &[PathBuf]) -> Result<ClientOutcome>;
    async fn add(&self, paths: &[PathBuf]) -> Result<ClientOutcome>;
    async fn delete(&self, paths: &[PathBuf]) -> Result<ClientOutcome>;
    async fn checkout(&self, url: &str, path: &Path) -> Result<ClientOutcome>;
    async fn export(&self, path: &Path, destination: &Path) -> Result<ClientOutcome>;
    async fn merge(&self, source: &str, path: &Path) -> Result<ClientOutcome>;
    async fn switch_to(&self, url: &str, path: &Path) -> Result<ClientOutcome>;
    async fn copy_to(&self, source: &Path, destination: &Path) -> Result<ClientOutcome>;
    async fn move_to(&self, source: &Path, destination: &Path) -> Result<ClientOutcome>;
    async fn cleanup(&self, path: &Path) -> Result<ClientOutcome>;
    async fn lock(&self, path: &Path, message: Option<&str>) -> Result<ClientOutcome>;
    async fn unlock(&self, path: &Path, force: bool) -> Result<ClientOutcome>;
    async fn resolve(&self, path: &Path, resolution: Resolution) -> Result<ClientOutcome>;
    async fn run_custom(&self, path: &Path, args: &[String]) -> Result<ClientOutcome>;
}

/// Production client spawning the `svn` executable
pub struct CommandLineClient {
    binary: String,
}

impl CommandLineClient {
    pub fn new() -> Self {
        Self {
            binary: "svn".to_string(),
        }
    }

    /// Use a specific svn binary instead of resolving `svn` from PATH
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check that `path` is inside a working copy before issuing commands
    pub fn ensure_working_copy(path: &Path) -> Result<()> {
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.join(".svn").is_dir() {
                return Ok(());
            }
            current = dir.parent();
        }
        Err(SvnNavigatorError::not_a_working_copy(path))
    }

    /// Run the svn executable and return trimmed stdout
    async fn run_svn(&self, args: &[&str], cwd: Option<&Path>) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--non-interactive"]);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        log::debug!("running {} {}", self.binary, args.join(" "));

        let output = cmd
            .output()
            .await
            .map_err(|e| SvnNavigatorError::client_launch_failed(&self.binary, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SvnNavigatorError::client_failed(stderr.trim()));
        }

        String::from_utf8(output.stdout).map_err(|_| SvnNavigatorError::InvalidUtf8Output)
    }

    /// Run a mutating svn command and extract the reported revision, if any
    async fn run_mutating(&self, args: &[&str], cwd: Option<&Path>) -> Result<ClientOutcome> {
        let stdout = self.run_svn(args, cwd).await?;
        Ok(ClientOutcome {
            revision: parse_revision(&stdout),
        })
    }
}

impl Default for CommandLineClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SvnClient for CommandLineClient {
    async fn status(&self, path: &Path, depth: Depth) -> Result<Vec<StatusEntry>> {
        Self::ensure_working_copy(path)?;

        let path_arg = path.to_string_lossy().to_string();
        let depth_arg = depth.as_arg();
        let stdout = self
            .run_svn(
                &["status", "--verbose", "--depth", depth_arg, &path_arg],
                None,
            )
            .await?;

        let mut entries = Vec::new();
        for line in stdout.lines() {
            if line.trim().is_empty() || line.starts_with("Status against revision") {
                continue;
            }
            entries.push(parse_status_line(line)?);
        }
        Ok(entries)
    }

    async fn commit(&self, paths: &[PathBuf], message: &str) -> Result<ClientOutcome> {
        let mut args = vec!["commit".to_string(), "-m".to_string(), message.to_string()];
        args.extend(paths.iter().map(|p| p.to_string_lossy().to_string()));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_mutating(&arg_refs, None).await
    }

    async fn update(&self, path: &Path) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        self.run_mutating(&["update", &path_arg], None).await
    }

    async fn revert(&self, paths: &[PathBuf]) -> Result<ClientOutcome> {
        let mut args = vec!["revert".to_string()];
        args.extend(paths.iter().map(|p| p.to_string_lossy().to_string()));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_mutating(&arg_refs, None).await
    }

    async fn add(&self, paths: &[PathBuf]) -> Result<ClientOutcome> {
        let mut args = vec!["add".to_string()];
        args.extend(paths.iter().map(|p| p.to_string_lossy().to_string()));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_mutating(&arg_refs, None).await
    }

    async fn delete(&self, paths: &[PathBuf]) -> Result<ClientOutcome> {
        let mut args = vec!["delete".to_string()];
        args.extend(paths.iter().map(|p| p.to_string_lossy().to_string()));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_mutating(&arg_refs, None).await
    }

    async fn checkout(&self, url: &str, path: &Path) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        self.run_mutating(&["checkout", url, &path_arg], None).await
    }

    async fn export(&self, path: &Path, destination: &Path) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        let dest_arg = destination.to_string_lossy().to_string();
        self.run_mutating(&["export", &path_arg, &dest_arg], None)
            .await
    }

    async fn merge(&self, source: &str, path: &Path) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        self.run_mutating(&["merge", source, &path_arg], None).await
    }

    async fn switch_to(&self, url: &str, path: &Path) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        self.run_mutating(&["switch", url, &path_arg], None).await
    }

    async fn copy_to(&self, source: &Path, destination: &Path) -> Result<ClientOutcome> {
        let src_arg = source.to_string_lossy().to_string();
        let dest_arg = destination.to_string_lossy().to_string();
        self.run_mutating(&["copy", &src_arg, &dest_arg], None).await
    }

    async fn move_to(&self, source: &Path, destination: &Path) -> Result<ClientOutcome> {
        let src_arg = source.to_string_lossy().to_string();
        let dest_arg = destination.to_string_lossy().to_string();
        self.run_mutating(&["move", &src_arg, &dest_arg], None).await
    }

    async fn cleanup(&self, path: &Path) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        self.run_mutating(&["cleanup", &path_arg], None).await
    }

    async fn lock(&self, path: &Path, message: Option<&str>) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        match message {
            Some(msg) => {
                self.run_mutating(&["lock", "-m", msg, &path_arg], None)
                    .await
            }
            None => self.run_mutating(&["lock", &path_arg], None).await,
        }
    }

    async fn unlock(&self, path: &Path, force: bool) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        if force {
            self.run_mutating(&["unlock", "--force", &path_arg], None)
                .await
        } else {
            self.run_mutating(&["unlock", &path_arg], None).await
        }
    }

    async fn resolve(&self, path: &Path, resolution: Resolution) -> Result<ClientOutcome> {
        let path_arg = path.to_string_lossy().to_string();
        self.run_mutating(&["resolve", "--accept", resolution.as_arg(), &path_arg], None)
            .await
    }

    async fn run_custom(&self, path: &Path, args: &[String]) -> Result<ClientOutcome> {
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_mutating(&arg_refs, Some(path)).await
    }
}

/// Parse one line of `svn status --verbose` output into a typed entry
///
/// The first seven characters are the status columns; the remainder holds the
/// working revision, last-changed revision, author and path for versioned
/// items, or just the path for unversioned and ignored ones.
pub fn parse_status_line(line: &str) -> Result<StatusEntry> {
    if line.len() < 2 {
        return Err(SvnNavigatorError::status_parse_failed(line));
    }

    let code = line.chars().next().unwrap_or(' ');
    let status = FileStatus::from_code(code)
        .ok_or(SvnNavigatorError::UnknownStatusCode { code })?;

    let columns: Vec<char> = line.chars().take(7).collect();
    let has_lock_token = columns.get(5).copied() == Some('K');

    let rest = if line.len() > 7 { &line[7..] } else { "" };
    let rest = rest.trim_start();

    let (revision, author, raw_path) = if matches!(
        status,
        FileStatus::Unversioned | FileStatus::Ignored | FileStatus::External
    ) {
        (None, None, rest.trim())
    } else {
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        if tokens.len() >= 4 {
            let revision = tokens[0].parse::<u64>().ok();
            let author = match tokens[2] {
                "?" | "-" => None,
                name => Some(name.to_string()),
            };
            // Paths may contain spaces; everything after the author column is path
            let path_start = {
                let mut offset = 0;
                for token in tokens.iter().take(3) {
                    offset = rest[offset..]
                        .find(token)
                        .map(|found| offset + found + token.len())
                        .unwrap_or(offset);
                }
                offset
            };
            (revision, author, rest[path_start..].trim())
        } else if tokens.len() == 1 {
            (None, None, rest.trim())
        } else {
            return Err(SvnNavigatorError::status_parse_failed(line));
        }
    };

    if raw_path.is_empty() {
        return Err(SvnNavigatorError::status_parse_failed(line));
    }

    let path = PathBuf::from(raw_path);
    let is_directory = path.is_dir();

    let mut entry = StatusEntry::new(path, status, is_directory);
    entry.revision = revision;
    entry.author = author;
    if has_lock_token {
        entry.lock = Some(crate::core::entry::LockInfo {
            owner: std::env::var("USER").unwrap_or_else(|_| "local".to_string()),
        });
    }
    Ok(entry)
}

/// Extract the last "revision N" number from tool output, as printed by
/// "Committed revision N.", "At revision N." and "Updated to revision N."
fn parse_revision(stdout: &str) -> Option<u64> {
    let mut revision = None;
    for line in stdout.lines() {
        if let Some(pos) = line.rfind("revision ") {
            let tail = &line[pos + "revision ".len()..];
            let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
            if let Ok(parsed) = digits.parse::<u64>() {
                revision = Some(parsed);
            }
        }
    }
    revision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modified_verbose_line() {
        let entry = parse_status_line("M                2        1 harry        wc/foo.c").unwrap();
        assert_eq!(entry.status, FileStatus::Modified);
        assert_eq!(entry.revision, Some(2));
        assert_eq!(entry.author.as_deref(), Some("harry"));
        assert_eq!(entry.path, PathBuf::from("wc/foo.c"));
    }

    #[test]
    fn test_parse_normal_verbose_line() {
        let entry = parse_status_line("                 1        1 jrandom      wc/bar.c").unwrap();
        assert_eq!(entry.status, FileStatus::Normal);
        assert_eq!(entry.revision, Some(1));
        assert_eq!(entry.author.as_deref(), Some("jrandom"));
    }

    #[test]
    fn test_parse_added_line_with_placeholder_columns() {
        let entry = parse_status_line("A                0        ? ?            wc/qax.c").unwrap();
        assert_eq!(entry.status, FileStatus::Added);
        assert_eq!(entry.revision, Some(0));
        assert_eq!(entry.author, None);
        assert_eq!(entry.path, PathBuf::from("wc/qax.c"));
    }

    #[test]
    fn test_parse_unversioned_line() {
        let entry = parse_status_line("?                                        wc/newfile").unwrap();
        assert_eq!(entry.status, FileStatus::Unversioned);
        assert_eq!(entry.revision, None);
        assert_eq!(entry.path, PathBuf::from("wc/newfile"));
    }

    #[test]
    fn test_parse_locked_line_sets_lock_info() {
        let entry = parse_status_line("M    K           2        1 harry        wc/foo.c").unwrap();
        assert!(entry.lock.is_some());
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let err = parse_status_line("Z                2        1 harry        wc/foo.c").unwrap_err();
        assert!(matches!(err, SvnNavigatorError::UnknownStatusCode { code: 'Z' }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_status_line("M").is_err());
    }

    #[test]
    fn test_parse_revision_from_commit_output() {
        assert_eq!(parse_revision("Sending  foo.c\nCommitted revision 42."), Some(42));
        assert_eq!(parse_revision("At revision 17."), Some(17));
        assert_eq!(parse_revision("nothing here"), None);
    }

    #[test]
    fn test_ensure_working_copy_rejects_plain_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = CommandLineClient::ensure_working_copy(dir.path());
        assert!(matches!(
            result,
            Err(SvnNavigatorError::NotAWorkingCopy { .. })
        ));
    }

    #[test]
    fn test_ensure_working_copy_accepts_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".svn")).unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();
        assert!(CommandLineClient::ensure_working_copy(&nested).is_ok());
    }
}
