//! Per-item scratch directories.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// A uniquely named scratch directory owned by one item run.
///
/// The directory is removed by [`ItemWorkspace::purge`], or on drop when the
/// run is abandoned mid-flight.
#[derive(Debug)]
pub struct ItemWorkspace {
    dir: PathBuf,
    purged: bool,
}

impl ItemWorkspace {
    /// Creates `<temp_root>/spindle-<uuid>`. Synchronous, so the directory
    /// never exists without an owning workspace.
    pub fn create(temp_root: &Path) -> std::io::Result<Self> {
        let dir = temp_root.join(format!("spindle-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Created scratch directory");
        Ok(Self { dir, purged: false })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a file inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Removes the directory and everything in it.
    pub async fn purge(mut self) {
        self.purged = true;
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => debug!(dir = %self.dir.display(), "Purged scratch directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(dir = %self.dir.display(), error = %e, "Failed to purge scratch directory"),
        }
    }
}

impl Drop for ItemWorkspace {
    fn drop(&mut self) {
        if !self.purged {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unique_and_purged() {
        let temp = tempfile::tempdir().unwrap();
        let a = ItemWorkspace::create(temp.path()).unwrap();
        let b = ItemWorkspace::create(temp.path()).unwrap();
        assert_ne!(a.dir(), b.dir());
        assert!(a.dir().file_name().unwrap().to_string_lossy().starts_with("spindle-"));

        std::fs::write(a.path("audio.mp4"), b"x").unwrap();
        let dir = a.dir().to_path_buf();
        a.purge().await;
        assert!(!dir.exists());

        let dir = b.dir().to_path_buf();
        drop(b);
        assert!(!dir.exists());
    }
}
