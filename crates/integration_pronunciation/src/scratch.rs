//! Scratch directory for staging downloaded audio

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::debug;

/// Directory where audio is written before the media store takes it over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    /// Use `root` as the scratch directory; nothing is created yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scratch directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a file called `name` would have inside the scratch directory
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Create the scratch directory if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Write `bytes` to `name`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn write(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.ensure().await?;
        let path = self.path_for(name);
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "Wrote scratch file");
        Ok(path)
    }

    /// Delete everything currently in the scratch directory
    ///
    /// Returns the number of entries removed. A missing directory counts as
    /// already clean.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed or an entry cannot
    /// be removed.
    pub async fn cleanup(&self) -> io::Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
            removed += 1;
        }

        debug!(root = %self.root.display(), removed, "Cleaned scratch space");
        Ok(removed)
    }
}
