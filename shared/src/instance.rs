//! Process-wide single-instance guard backed by an advisory file lock.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("another instance already holds {0}")]
    AlreadyRunning(PathBuf),
    #[error("cannot open lock file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Holds an exclusive lock on the lock file until dropped.
#[derive(Debug)]
pub struct SingleInstance {
    file: File,
    path: PathBuf,
}

impl SingleInstance {
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| InstanceError::Io { path: path.clone(), source })?;

        file.try_lock_exclusive()
            .map_err(|_| InstanceError::AlreadyRunning(path.clone()))?;

        info!("Acquired instance lock at {}", path.display());
        Ok(Self { file, path })
    }
}

impl Drop for SingleInstance {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release instance lock: {}", e);
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to remove lock file {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_first_is_held() {
        let path = std::env::temp_dir().join(format!("shared-instance-{}.lock", std::process::id()));
        let first = SingleInstance::acquire(&path).expect("first lock");
        assert!(matches!(
            SingleInstance::acquire(&path),
            Err(InstanceError::AlreadyRunning(_))
        ));
        drop(first);
        assert!(!path.exists());
        let again = SingleInstance::acquire(&path).expect("lock after release");
        drop(again);
    }
}
