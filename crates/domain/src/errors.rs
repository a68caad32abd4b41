//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A pronunciation must be attributed to a non-empty headword
    #[error("Pronunciation headword cannot be empty")]
    EmptyHeadword,

    /// A pronunciation must point at some audio
    #[error("Pronunciation audio source cannot be empty")]
    EmptyAudioSource,

    /// The record already carries a media reference
    #[error("Pronunciation already has media attached: {0}")]
    MediaAlreadyAttached(String),

    /// The record has no media reference to remove
    #[error("Pronunciation for '{headword}' has no media attached")]
    MissingMediaRef {
        /// Headword of the offending record
        headword: String,
    },

    /// Provider identifier is not recognized
    #[error("Unknown pronunciation provider: {0}")]
    UnknownProvider(String),
}
