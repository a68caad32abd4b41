//! Pronunciation record entity
//!
//! Every provider normalizes its response into [`Pronunciation`] records. A
//! record starts without media, gains a [`MediaRef`] once its audio has been
//! handed to the media store and loses it again when the file is trashed.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{MediaRef, ProviderKind},
};

/// Where the audio payload of a pronunciation lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AudioSource {
    /// Remote audio file to fetch
    Url(String),
    /// Audio bytes already returned by the lookup request
    Inline(Bytes),
}

impl AudioSource {
    /// Check whether the source carries nothing to download
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Url(url) => url.trim().is_empty(),
            Self::Inline(bytes) => bytes.is_empty(),
        }
    }

    /// Remote URL, if the audio still has to be fetched
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Inline(_) => None,
        }
    }
}

/// A single normalized pronunciation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    /// Provider that produced the record
    pub provider: ProviderKind,

    /// Target language tag (e.g. "ja", "ko")
    pub language: String,

    /// Human-readable attribution: reading, speaker name or gloss
    pub speaker_label: String,

    /// Reserved provenance field
    pub origin: String,

    /// Ordering hint
    pub rank: u32,

    /// Reserved popularity metric
    pub vote_score: String,

    /// Audio location or inline payload
    pub source: AudioSource,

    /// Whether the audio uses a lossy container
    pub is_lossy: bool,

    headword: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_ref: Option<MediaRef>,
}

impl Pronunciation {
    /// Rank assigned to every provider result
    pub const DEFAULT_RANK: u32 = 1;

    /// Create a record for a freshly parsed provider result
    ///
    /// # Errors
    ///
    /// Returns an error if the headword is empty or the source carries no audio.
    pub fn new(
        provider: ProviderKind,
        language: impl Into<String>,
        speaker_label: impl Into<String>,
        source: AudioSource,
        headword: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let headword = headword.into();
        if headword.trim().is_empty() {
            return Err(DomainError::EmptyHeadword);
        }
        if source.is_empty() {
            return Err(DomainError::EmptyAudioSource);
        }

        Ok(Self {
            provider,
            language: language.into(),
            speaker_label: speaker_label.into(),
            origin: String::new(),
            rank: Self::DEFAULT_RANK,
            vote_score: String::new(),
            source,
            is_lossy: true,
            headword,
            media_ref: None,
        })
    }

    /// Term this pronunciation is attributed to
    pub fn headword(&self) -> &str {
        &self.headword
    }

    /// Media store reference, present once downloaded
    pub const fn media_ref(&self) -> Option<&MediaRef> {
        self.media_ref.as_ref()
    }

    /// Check whether the audio has been handed to the media store
    pub const fn is_downloaded(&self) -> bool {
        self.media_ref.is_some()
    }

    /// Record the reference returned by the media store
    ///
    /// # Errors
    ///
    /// Returns an error if a reference is already attached.
    pub fn attach_media(&mut self, media_ref: MediaRef) -> Result<(), DomainError> {
        if let Some(existing) = &self.media_ref {
            return Err(DomainError::MediaAlreadyAttached(existing.to_string()));
        }
        self.media_ref = Some(media_ref);
        Ok(())
    }

    /// Take the media reference off the record
    ///
    /// # Errors
    ///
    /// Returns an error if the record has no media attached.
    pub fn detach_media(&mut self) -> Result<MediaRef, DomainError> {
        self.media_ref
            .take()
            .ok_or_else(|| DomainError::MissingMediaRef {
                headword: self.headword.clone(),
            })
    }
}
