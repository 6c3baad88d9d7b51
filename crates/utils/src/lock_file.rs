//! Exclusive lock files that become their final target on success
//!
//! A `LockFile` is created with `create_new`, so only one writer can hold a
//! given path at a time. The holder writes its content into the lock file
//! and then either persists it under a target name (never overwriting an
//! existing target) or drops it, which removes the file.

use probecache_core::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Result of moving a lock file onto its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// The lock file now lives at the target path
    Renamed,
    /// The target already existed; the lock file was removed instead
    TargetExists,
}

/// An exclusively created file removed on drop unless persisted
#[derive(Debug)]
pub struct LockFile {
    file: Option<File>,
    path: PathBuf,
    released: bool,
}

impl LockFile {
    /// Create `path`, failing if it already exists
    pub fn create_exclusive(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| Error::file_system(path, "create lock file", e))?;

        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
            released: false,
        })
    }

    /// Path of the lock file itself
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync, make owner read-only, and move onto `target` without clobbering
    pub fn persist_noclobber(mut self, target: &Path) -> Result<Persisted> {
        if let Some(file) = self.file.take() {
            file.sync_all()
                .map_err(|e| Error::file_system(&self.path, "sync lock file", e))?;
        }

        set_owner_read_only(&self.path)
            .map_err(|e| Error::file_system(&self.path, "restrict permissions", e))?;

        // A hard link fails atomically when the target exists, which a plain
        // rename would silently replace.
        match fs::hard_link(&self.path, target) {
            Ok(()) => {
                self.released = true;
                if let Err(e) = fs::remove_file(&self.path) {
                    tracing::debug!(
                        path = %self.path.display(),
                        error = %e,
                        "Failed to remove lock file after linking"
                    );
                }
                Ok(Persisted::Renamed)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Persisted::TargetExists),
            Err(e) => {
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    "Hard link unsupported, falling back to rename"
                );
                if target.exists() {
                    return Ok(Persisted::TargetExists);
                }
                fs::rename(&self.path, target)
                    .map_err(|e| Error::file_system(target, "atomic rename", e))?;
                self.released = true;
                Ok(Persisted::Renamed)
            }
        }
    }
}

impl Write for LockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "lock file closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        // Close before removing so Windows lets the file go
        self.file.take();
        if !self.released {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(unix)]
fn set_owner_read_only(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o400))
}

#[cfg(not(unix))]
fn set_owner_read_only(path: &Path) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_create_fails() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("snapshot.tmp");

        let _held = LockFile::create_exclusive(&lock_path).unwrap();
        let err = LockFile::create_exclusive(&lock_path).unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::AlreadyExists));
    }

    #[test]
    fn test_drop_removes_lock_file() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("snapshot.tmp");

        {
            let mut lock = LockFile::create_exclusive(&lock_path).unwrap();
            lock.write_all(b"partial").unwrap();
        }

        assert!(!lock_path.exists());
    }

    #[test]
    fn test_persist_moves_content() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("snapshot.tmp");
        let target = temp_dir.path().join("snapshot");

        let mut lock = LockFile::create_exclusive(&lock_path).unwrap();
        lock.write_all(b"L|T|<null>|0\n").unwrap();
        assert_eq!(lock.persist_noclobber(&target).unwrap(), Persisted::Renamed);

        assert!(!lock_path.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "L|T|<null>|0\n");
        assert!(fs::metadata(&target).unwrap().permissions().readonly());
    }

    #[test]
    fn test_persist_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("snapshot.tmp");
        let target = temp_dir.path().join("snapshot");
        fs::write(&target, "first").unwrap();

        let mut lock = LockFile::create_exclusive(&lock_path).unwrap();
        lock.write_all(b"second").unwrap();
        assert_eq!(
            lock.persist_noclobber(&target).unwrap(),
            Persisted::TargetExists
        );

        assert!(!lock_path.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "first");
    }
}
