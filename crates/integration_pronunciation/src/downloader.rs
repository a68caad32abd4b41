//! Audio download and removal
//!
//! Downloading stages a record's audio in the scratch space, hands the file
//! to the media store and attaches the returned reference to the record.

use std::{fmt::Write as _, sync::Arc};

use bytes::Bytes;
use domain::{AudioSource, DomainError, MediaRef, Pronunciation, ProviderKind};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    error::PronunciationError,
    media_store::MediaStore,
    providers::japanesepod101_alt::HEADWORD_SUFFIX,
    scratch::ScratchSpace,
    transport::Transport,
};

/// Moves pronunciation audio into the media store
pub struct AudioDownloader {
    transport: Transport,
    scratch: ScratchSpace,
    store: Arc<dyn MediaStore>,
    unique_names: bool,
}

impl std::fmt::Debug for AudioDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDownloader")
            .field("scratch", &self.scratch)
            .field("unique_names", &self.unique_names)
            .finish_non_exhaustive()
    }
}

impl AudioDownloader {
    /// Create a downloader staging files in `scratch`
    pub fn new(transport: Transport, scratch: ScratchSpace, store: Arc<dyn MediaStore>) -> Self {
        Self {
            transport,
            scratch,
            store,
            unique_names: false,
        }
    }

    /// Give every scratch file a unique suffix, for concurrent downloads
    #[must_use]
    pub const fn with_unique_names(mut self, unique_names: bool) -> Self {
        self.unique_names = unique_names;
        self
    }

    /// Audio bytes of a record, fetching remote sources
    ///
    /// # Errors
    ///
    /// Returns a transient error if the audio cannot be fetched or the server
    /// answers with a non-success status.
    pub async fn fetch_audio(&self, record: &Pronunciation) -> Result<Bytes, PronunciationError> {
        match &record.source {
            AudioSource::Inline(bytes) => Ok(bytes.clone()),
            AudioSource::Url(url) => {
                let response = self
                    .transport
                    .fetch(self.transport.client().get(url.as_str()))
                    .await?;
                if !response.status().is_success() {
                    return Err(PronunciationError::RequestFailed(format!(
                        "HTTP {} for {url}",
                        response.status()
                    )));
                }
                Ok(response.body().clone())
            },
        }
    }

    /// Download a record's audio into the media store
    ///
    /// # Errors
    ///
    /// Returns an error if the record is already downloaded, the audio cannot
    /// be fetched, or the scratch space or media store fails.
    #[instrument(skip(self, record), fields(provider = %record.provider, headword = %record.headword()))]
    pub async fn download(&self, record: &mut Pronunciation) -> Result<MediaRef, PronunciationError> {
        if let Some(existing) = record.media_ref() {
            return Err(DomainError::MediaAlreadyAttached(existing.to_string()).into());
        }

        let audio = self.fetch_audio(record).await?;
        let name = scratch_file_name(record, self.unique_names);
        let path = self.scratch.write(&name, &audio).await?;

        let media_ref = self.store.add_file(&path).await?;
        record.attach_media(media_ref.clone())?;

        info!(media_ref = %media_ref, size = audio.len(), "Pronunciation downloaded");
        Ok(media_ref)
    }

    /// Trash a record's media and clear its reference
    ///
    /// The reference stays on the record if the media store refuses to
    /// trash the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the record has no media attached or the media
    /// store fails.
    #[instrument(skip(self, record), fields(provider = %record.provider, headword = %record.headword()))]
    pub async fn remove(&self, record: &mut Pronunciation) -> Result<MediaRef, PronunciationError> {
        let Some(media_ref) = record.media_ref().cloned() else {
            return Err(DomainError::MissingMediaRef {
                headword: record.headword().to_string(),
            }
            .into());
        };

        self.store
            .trash_files(std::slice::from_ref(&media_ref))
            .await?;
        let removed = record.detach_media()?;

        info!(media_ref = %removed, "Pronunciation removed");
        Ok(removed)
    }

    /// Delete everything in the scratch space
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directory cannot be cleaned.
    pub async fn cleanup(&self) -> Result<usize, PronunciationError> {
        let removed = self.scratch.cleanup().await?;
        debug!(removed, "Scratch space cleaned");
        Ok(removed)
    }
}

/// File name a record's audio is staged under
///
/// Dictionary-endpoint records are named after their headword; the others
/// keep the file name of their audio URL. Names are ASCII-only.
pub fn scratch_file_name(record: &Pronunciation, unique: bool) -> String {
    let name = match record.provider {
        ProviderKind::JapanesePod101 => format!("jp101-{}.mp3", record.headword()),
        ProviderKind::JapanesePod101Alt => {
            let headword = record.headword();
            let term = headword.strip_suffix(HEADWORD_SUFFIX).unwrap_or(headword);
            format!("jp101a-{term}.mp3")
        },
        ProviderKind::Krdict | ProviderKind::Naver | ProviderKind::Shtooka => {
            url_file_name(&record.source).map_or_else(
                || format!("{}-{}.mp3", record.provider.id(), record.headword()),
                ToString::to_string,
            )
        },
    };

    let name = ascii_safe(&name);
    if unique {
        with_unique_suffix(&name)
    } else {
        name
    }
}

/// Trailing path segment of a URL source, without any query string
fn url_file_name(source: &AudioSource) -> Option<&str> {
    let url = source.url()?;
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Replace every character outside `[A-Za-z0-9._-]` with `u{hex}`
fn ascii_safe(name: &str) -> String {
    let mut safe = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            safe.push(c);
        } else {
            let _ = write!(safe, "u{:x}", u32::from(c));
        }
    }
    safe
}

fn with_unique_suffix(name: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    let suffix = &id[..8];
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem}-{suffix}.{extension}"),
        _ => format!("{name}-{suffix}"),
    }
}
