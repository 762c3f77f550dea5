//! Mirrors a directory tree into a destination, collecting per-entry failures
//! instead of aborting.
//!
//! Only the initial source validation can fail a call. Everything that goes
//! wrong during the walk itself ends up as a message in
//! [`BackupResult::errors`], and the walk moves on to the next entry.

use chrono::Local;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Timestamp appended to timestamped backup directories. Sorts lexically.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Counters and failures of one backup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupResult {
    pub files_copied: usize,
    /// Subdirectories created; the destination root itself is not counted.
    pub dirs_created: usize,
    pub bytes_copied: u64,
    /// Human-readable failures, in the order they happened.
    pub errors: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("invalid source {path}: {source}")]
    InvalidSource { path: PathBuf, source: io::Error },

    #[error("source is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("open source: {0}")]
    Open(io::Error),

    #[error("create destination: {0}")]
    Create(io::Error),

    #[error("copy data: {0}")]
    Copy(io::Error),

    #[error("set permissions: {0}")]
    Permissions(io::Error),
}

/// Copies one file byte for byte and gives the copy the source's permissions.
///
/// Returns the number of bytes written.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, BackupError> {
    let mut source = File::open(src).map_err(BackupError::Open)?;
    let permissions = source.metadata().map_err(BackupError::Open)?.permissions();

    let mut dest = File::create(dst).map_err(BackupError::Create)?;
    let copied = io::copy(&mut source, &mut dest).map_err(BackupError::Copy)?;
    dest.set_permissions(permissions)
        .map_err(BackupError::Permissions)?;
    Ok(copied)
}

/// Resolves `src` to a canonical directory path or fails the whole call.
fn resolve_source(src: &Path) -> Result<PathBuf, BackupError> {
    let invalid = |source| BackupError::InvalidSource {
        path: src.to_path_buf(),
        source,
    };
    let canonical = fs::canonicalize(src).map_err(invalid)?;
    let metadata = fs::metadata(&canonical).map_err(invalid)?;
    if !metadata.is_dir() {
        return Err(BackupError::NotADirectory(canonical));
    }
    Ok(canonical)
}

/// Where `dst` really lives: its nearest existing ancestor is canonicalized
/// and the not-yet-created components are appended again.
fn resolve_destination(dst: &Path) -> PathBuf {
    let absolute = std::path::absolute(dst).unwrap_or_else(|_| dst.to_path_buf());
    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return missing
                .iter()
                .rev()
                .fold(canonical, |path, name| path.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

/// Copies everything under `src_dir` into `dst_dir`, keeping relative paths.
///
/// Entries are visited depth first in file-name order. A directory that
/// cannot be read is reported and its subtree skipped. A destination nested
/// inside the source is never walked into.
pub fn backup_dir(src_dir: &Path, dst_dir: &Path) -> Result<BackupResult, BackupError> {
    let src_dir = resolve_source(src_dir)?;
    let dst_abs = resolve_destination(dst_dir);
    let mut result = BackupResult::default();
    info!("Backing up {} to {}", src_dir.display(), dst_dir.display());

    let walker = WalkDir::new(&src_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.path().starts_with(&dst_abs));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(src_dir.as_path()).display().to_string();
                warn!("Skipping unreadable entry {}: {}", path, e);
                result.errors.push(format!("walk error: {}: {}", path, e));
                continue;
            }
        };

        let rel = match entry.path().strip_prefix(&src_dir) {
            Ok(rel) => rel,
            Err(e) => {
                result
                    .errors
                    .push(format!("rel path error: {}: {}", entry.path().display(), e));
                continue;
            }
        };
        let target = dst_dir.join(rel);

        if entry.file_type().is_dir() {
            if let Err(e) = fs::create_dir_all(&target) {
                warn!("Could not create {}: {}", target.display(), e);
                result
                    .errors
                    .push(format!("mkdir error: {}: {}", target.display(), e));
                continue;
            }
            if entry.depth() > 0 {
                result.dirs_created += 1;
            }
            continue;
        }

        match copy_file(entry.path(), &target) {
            Ok(bytes) => {
                debug!("Copied {} ({} bytes)", rel.display(), bytes);
                result.files_copied += 1;
                result.bytes_copied += bytes;
            }
            Err(e) => {
                warn!("Could not copy {}: {}", entry.path().display(), e);
                result
                    .errors
                    .push(format!("copy error: {}: {}", entry.path().display(), e));
            }
        }
    }

    info!(
        "Backup finished: {} files, {} dirs, {} bytes, {} errors",
        result.files_copied,
        result.dirs_created,
        result.bytes_copied,
        result.errors.len()
    );
    Ok(result)
}

/// The destination `dst_root/<source name>_<timestamp>` for a backup taken now.
pub fn timestamped_destination(src_dir: &Path, dst_root: &Path) -> PathBuf {
    let name = fs::canonicalize(src_dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "backup".to_string());
    let stamp = Local::now().format(TIMESTAMP_FORMAT);
    dst_root.join(format!("{}_{}", name, stamp))
}

/// Backs up `src_dir` into a fresh timestamped directory under `dst_root`.
///
/// Returns the chosen destination along with the result.
pub fn backup_dir_with_timestamp(
    src_dir: &Path,
    dst_root: &Path,
) -> Result<(PathBuf, BackupResult), BackupError> {
    let dst_dir = timestamped_destination(src_dir, dst_root);
    let result = backup_dir(src_dir, &dst_dir)?;
    Ok((dst_dir, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_file_copies_content_and_counts_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("source.txt");
        fs::write(&src, b"hello, backup!").unwrap();

        let dst = dir.path().join("dest.txt");
        let n = copy_file(&src, &dst).unwrap();
        assert_eq!(n, 14);
        assert_eq!(fs::read(&dst).unwrap(), b"hello, backup!");
    }

    #[cfg(unix)]
    #[test]
    fn copy_file_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("script.sh");
        fs::write(&src, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();

        let dst = dir.path().join("copy.sh");
        copy_file(&src, &dst).unwrap();
        let mode = fs::metadata(&dst).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[test]
    fn copy_file_reports_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("absent"), &dir.path().join("dst")).unwrap_err();
        assert!(matches!(err, BackupError::Open(_)));
    }

    #[test]
    fn missing_source_is_invalid() {
        let dst = tempfile::tempdir().unwrap();
        let err = backup_dir(Path::new("/nonexistent/path/xyz"), dst.path()).unwrap_err();
        assert!(matches!(err, BackupError::InvalidSource { .. }));
    }

    #[test]
    fn file_source_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"data").unwrap();

        let dst = tempfile::tempdir().unwrap();
        let err = backup_dir(&file, dst.path()).unwrap_err();
        assert!(matches!(err, BackupError::NotADirectory(_)));
    }

    #[test]
    fn timestamped_destination_uses_source_name() {
        let src = tempfile::tempdir().unwrap();
        let project = src.path().join("project");
        fs::create_dir(&project).unwrap();

        let dst = timestamped_destination(&project, Path::new("/backups"));
        let name = dst.file_name().unwrap().to_string_lossy().into_owned();
        assert!(dst.starts_with("/backups"));
        assert!(name.starts_with("project_"));
        // project_YYYY-MM-DD_HH-MM-SS
        assert_eq!(name.len(), "project_".len() + 19);
    }

    #[test]
    fn destination_inside_source_is_not_recursed() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), b"x").unwrap();
        let dst = src.path().join("backups");

        let result = backup_dir(src.path(), &dst).unwrap();
        assert_eq!(result.files_copied, 1);
        assert!(result.errors.is_empty());
        assert!(!dst.join("backups").exists());
    }

    #[cfg(unix)]
    #[test]
    fn destination_reached_through_a_symlink_is_not_recursed() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), b"x").unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let link = elsewhere.path().join("into-source");
        std::os::unix::fs::symlink(src.path(), &link).unwrap();

        let dst = link.join("backups");
        let result = backup_dir(src.path(), &dst).unwrap();
        assert_eq!(result.files_copied, 1);
        assert_eq!(result.dirs_created, 0);
        assert!(result.errors.is_empty());
        assert!(src.path().join("backups/a.txt").exists());
        assert!(!src.path().join("backups/backups").exists());
    }
}
