//! Media store port and a directory-backed adapter
//!
//! The media store is the host's collection of audio files. The engine only
//! ever adds files to it and moves files it added into the trash.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use domain::MediaRef;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{debug, info};

/// Name of the trash subdirectory of a [`DirectoryMediaStore`]
pub const TRASH_DIR: &str = ".trash";

const MAX_NAME_SUFFIX: u32 = 9_999;

/// Errors reported by a media store
#[derive(Debug, Error)]
pub enum MediaStoreError {
    /// The store refused a file
    #[error("Media store rejected {path}: {reason}")]
    Rejected {
        /// Offending file
        path: String,
        /// Why the file was refused
        reason: String,
    },

    /// The reference does not name a file in the store
    #[error("Unknown media reference: {0}")]
    UnknownReference(String),

    /// Filesystem failure inside the store
    #[error("Media store I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Port for the host's media collection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Take a copy of the file at `path` and return its reference
    async fn add_file(&self, path: &Path) -> Result<MediaRef, MediaStoreError>;

    /// Move the referenced files to the trash
    async fn trash_files(&self, refs: &[MediaRef]) -> Result<(), MediaStoreError>;
}

/// Media store keeping files in a flat directory
///
/// References are file names. Adding a file whose name is taken by different
/// content stores it under `name-N.ext` instead; identical content reuses the
/// existing file.
#[derive(Debug, Clone)]
pub struct DirectoryMediaStore {
    root: PathBuf,
}

impl DirectoryMediaStore {
    /// Store files in `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Media directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Trash directory
    #[must_use]
    pub fn trash_dir(&self) -> PathBuf {
        self.root.join(TRASH_DIR)
    }

    /// Absolute path of a reference
    #[must_use]
    pub fn path_of(&self, media_ref: &MediaRef) -> PathBuf {
        self.root.join(media_ref.as_str())
    }

    /// First free (or content-identical) file name for `name`
    async fn free_name(&self, name: &str, contents: &[u8]) -> Result<String, MediaStoreError> {
        let path = Path::new(name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
        let extension = path.extension().and_then(|e| e.to_str());

        let mut candidate = name.to_string();
        for counter in 1..=MAX_NAME_SUFFIX {
            match tokio::fs::read(self.root.join(&candidate)).await {
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(candidate),
                Err(e) => return Err(e.into()),
                Ok(existing) if existing == contents => return Ok(candidate),
                Ok(_) => {},
            }
            candidate = match extension {
                Some(ext) => format!("{stem}-{counter}.{ext}"),
                None => format!("{stem}-{counter}"),
            };
        }

        Err(MediaStoreError::Rejected {
            path: name.to_string(),
            reason: "no free file name".to_string(),
        })
    }
}

#[async_trait]
impl MediaStore for DirectoryMediaStore {
    async fn add_file(&self, path: &Path) -> Result<MediaRef, MediaStoreError> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Err(MediaStoreError::Rejected {
                path: path.display().to_string(),
                reason: "file name is not valid UTF-8".to_string(),
            });
        };

        let contents = tokio::fs::read(path).await?;
        tokio::fs::create_dir_all(&self.root).await?;

        let stored = self.free_name(name, &contents).await?;
        let target = self.root.join(&stored);
        if !target.exists() {
            tokio::fs::write(&target, &contents).await?;
        }

        debug!(source = %path.display(), media_ref = %stored, "Added file to media store");
        Ok(MediaRef::new(stored))
    }

    async fn trash_files(&self, refs: &[MediaRef]) -> Result<(), MediaStoreError> {
        for media_ref in refs {
            if !self.path_of(media_ref).is_file() {
                return Err(MediaStoreError::UnknownReference(media_ref.to_string()));
            }
        }

        let trash = self.trash_dir();
        tokio::fs::create_dir_all(&trash).await?;
        for media_ref in refs {
            tokio::fs::rename(self.path_of(media_ref), trash.join(media_ref.as_str())).await?;
        }

        info!(count = refs.len(), "Moved media files to trash");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn source_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_add_file_copies_into_root() {
        let scratch = tempfile::tempdir().unwrap();
        let media = tempfile::tempdir().unwrap();
        let store = DirectoryMediaStore::new(media.path());

        let path = source_file(scratch.path(), "sarang.wav", b"RIFF").await;
        let media_ref = store.add_file(&path).await.unwrap();

        assert_eq!(media_ref.as_str(), "sarang.wav");
        assert_eq!(tokio::fs::read(store.path_of(&media_ref)).await.unwrap(), b"RIFF");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_name_conflicts() {
        let scratch = tempfile::tempdir().unwrap();
        let media = tempfile::tempdir().unwrap();
        let store = DirectoryMediaStore::new(media.path());

        let first = source_file(scratch.path(), "a.mp3", b"one").await;
        assert_eq!(store.add_file(&first).await.unwrap().as_str(), "a.mp3");

        // same content is deduplicated
        assert_eq!(store.add_file(&first).await.unwrap().as_str(), "a.mp3");

        let second = source_file(scratch.path(), "a.mp3", b"two").await;
        assert_eq!(store.add_file(&second).await.unwrap().as_str(), "a-1.mp3");

        let third = source_file(scratch.path(), "a.mp3", b"three").await;
        assert_eq!(store.add_file(&third).await.unwrap().as_str(), "a-2.mp3");
    }

    #[tokio::test]
    async fn test_trash_files() {
        let scratch = tempfile::tempdir().unwrap();
        let media = tempfile::tempdir().unwrap();
        let store = DirectoryMediaStore::new(media.path());

        let path = source_file(scratch.path(), "a.mp3", b"one").await;
        let media_ref = store.add_file(&path).await.unwrap();

        store.trash_files(std::slice::from_ref(&media_ref)).await.unwrap();
        assert!(!store.path_of(&media_ref).exists());
        assert!(store.trash_dir().join("a.mp3").exists());
    }

    #[tokio::test]
    async fn test_trash_unknown_reference() {
        let media = tempfile::tempdir().unwrap();
        let store = DirectoryMediaStore::new(media.path());

        let err = store
            .trash_files(&[MediaRef::new("missing.mp3")])
            .await
            .unwrap_err();
        assert!(matches!(err, MediaStoreError::UnknownReference(name) if name == "missing.mp3"));
    }

    #[tokio::test]
    async fn test_add_missing_file_is_io_error() {
        let media = tempfile::tempdir().unwrap();
        let store = DirectoryMediaStore::new(media.path());

        let err = store
            .add_file(Path::new("/definitely/not/here.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaStoreError::Io(_)));
    }
}
