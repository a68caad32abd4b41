//! Pronunciation retrieval error types

use domain::DomainError;
use thiserror::Error;

use crate::media_store::MediaStoreError;

/// Broad class of a [`PronunciationError`]
///
/// Expected "no audio" paths are not errors at all; they are reported through
/// [`LookupOutcome`](crate::LookupOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, transport, server or body failure; the caller decides on retries
    Transient,
    /// The response matched none of the provider's known layouts
    ContractViolation,
    /// Scratch space or media store failure during the download phase
    Storage,
    /// A record lifecycle precondition was violated
    Precondition,
    /// Invalid configuration
    Configuration,
}

/// Errors that can occur while retrieving pronunciations
#[derive(Debug, Error)]
pub enum PronunciationError {
    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the provider failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Failed to parse the provider response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The result page matched none of the known layouts
    #[error("Unrecognized {provider} result page layout")]
    LayoutUnrecognized {
        /// Provider id whose layout detection failed
        provider: &'static str,
    },

    /// Scratch space I/O failed
    #[error("Scratch space error: {0}")]
    Io(#[from] std::io::Error),

    /// The media store rejected an operation
    #[error(transparent)]
    MediaStore(#[from] MediaStoreError),

    /// Record lifecycle violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl PronunciationError {
    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ConnectionFailed(_)
            | Self::RequestFailed(_)
            | Self::Timeout { .. }
            | Self::ParseError(_) => FailureKind::Transient,
            Self::LayoutUnrecognized { .. } => FailureKind::ContractViolation,
            Self::Io(_) | Self::MediaStore(_) => FailureKind::Storage,
            Self::Domain(_) => FailureKind::Precondition,
            Self::ConfigurationError(_) => FailureKind::Configuration,
        }
    }

    /// Returns true if the caller may retry the operation
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind(), FailureKind::Transient)
    }

    /// Returns true if the provider returned a page it cannot understand
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self.kind(), FailureKind::ContractViolation)
    }
}
