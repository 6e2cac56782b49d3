//! Cross-process mutual exclusion for runner invocations
//!
//! Two deploy replicas running `tiller up` against the same database must
//! not both attempt the same pending migration. An advisory file lock next
//! to the database serializes them; the lock is held for the whole runner
//! call and released on drop.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Result};

/// Behavior of `RunnerLock::acquire` when another runner holds the lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    /// Block until the lock is free.
    #[default]
    Wait,
    /// Fail immediately with a "migration already in progress" error.
    Fail,
}

/// Exclusive advisory lock on the migration lock file.
#[derive(Debug)]
pub struct RunnerLock {
    file: File,
    path: PathBuf,
}

impl RunnerLock {
    pub fn acquire(path: &Path, mode: LockMode) -> Result<Self> {
        let file = OpenOptions::new().create(true).write(true).open(path)?;

        match mode {
            LockMode::Wait => file.lock_exclusive()?,
            LockMode::Fail => {
                if let Err(e) = file.try_lock_exclusive() {
                    if e.kind() == ErrorKind::WouldBlock {
                        return Err(Error::LockContention(format!(
                            "another runner holds the lock at {}",
                            path.display()
                        )));
                    }
                    return Err(e.into());
                }
            }
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunnerLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fail_mode_reports_contention() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiller.lock");

        let _held = RunnerLock::acquire(&path, LockMode::Wait).unwrap();
        let err = RunnerLock::acquire(&path, LockMode::Fail).unwrap_err();
        assert!(matches!(err, Error::LockContention(_)));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiller.lock");

        {
            let _held = RunnerLock::acquire(&path, LockMode::Wait).unwrap();
        }
        // Re-acquire succeeds once the previous guard is gone
        let reacquired = RunnerLock::acquire(&path, LockMode::Fail).unwrap();
        assert_eq!(reacquired.path(), path);
    }
}
