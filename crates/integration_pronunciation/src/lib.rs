#![forbid(unsafe_code)]
//! Pronunciation audio retrieval
//!
//! Looks up recorded pronunciations of a word in several online dictionaries
//! and moves the chosen audio into the host's media store.
//!
//! # Architecture
//!
//! Every source implements [`PronunciationProvider`]: it builds its own
//! request, the shared [`Transport`] executes it, and the provider parses the
//! response into [`Pronunciation`](domain::Pronunciation) records wrapped in a
//! [`LookupOutcome`]. "No audio" answers are outcomes, not errors.
//!
//! [`PronunciationClient`] normalizes the term, dispatches to a provider (or
//! walks an ordered list of them), and drives the [`AudioDownloader`], which
//! stages audio in a [`ScratchSpace`] before handing it to a [`MediaStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use domain::ProviderKind;
//! use integration_pronunciation::{DirectoryMediaStore, PronunciationClient, PronunciationConfig};
//!
//! let store = Arc::new(DirectoryMediaStore::new("media"));
//! let client = PronunciationClient::new(PronunciationConfig::default(), store)?;
//!
//! let mut records = client
//!     .lookup(ProviderKind::Naver, "사랑", None, None)
//!     .await?
//!     .into_records();
//! for result in client.download_all(&mut records).await {
//!     println!("{:?}", result);
//! }
//! ```

mod config;
mod downloader;
mod error;
mod html;
mod media_store;
mod models;
mod provider;
mod providers;
mod scratch;
mod transport;
mod urlencoding;

pub use config::{BROWSER_USER_AGENT, LEGACY_USER_AGENT, PronunciationConfig};
pub use downloader::{AudioDownloader, scratch_file_name};
pub use error::{FailureKind, PronunciationError};
pub use media_store::{DirectoryMediaStore, MediaStore, MediaStoreError, TRASH_DIR};
pub use models::{LookupOutcome, LookupQuery};
pub use provider::PronunciationProvider;
pub use providers::{
    japanesepod101::{JapanesePod101Client, SILENCE_CLIP_LEN},
    japanesepod101_alt::{HEADWORD_SUFFIX, JapanesePod101AltClient},
    krdict::KrdictClient,
    naver::NaverClient,
    shtooka::ShtookaClient,
};
pub use scratch::ScratchSpace;
pub use transport::{Classification, FetchedResponse, Transport, classify_status};

use std::sync::Arc;

use domain::{MediaRef, Pronunciation, ProviderKind, QueryNormalizer};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

/// Pronunciation lookup and download facade
#[derive(Debug)]
pub struct PronunciationClient {
    config: PronunciationConfig,
    normalizer: QueryNormalizer,
    japanesepod101: JapanesePod101Client,
    japanesepod101_alt: JapanesePod101AltClient,
    krdict: KrdictClient,
    naver: NaverClient,
    shtooka: ShtookaClient,
    downloader: AudioDownloader,
}

impl PronunciationClient {
    /// Create a client for all providers
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP clients
    /// cannot be initialized.
    pub fn new(
        config: PronunciationConfig,
        store: Arc<dyn MediaStore>,
    ) -> Result<Self, PronunciationError> {
        config
            .validate()
            .map_err(PronunciationError::ConfigurationError)?;

        let downloader = AudioDownloader::new(
            Transport::new(config.timeout())?,
            ScratchSpace::new(&config.scratch_dir),
            store,
        )
        .with_unique_names(config.parallel_downloads());

        Ok(Self {
            normalizer: config.normalizer(),
            japanesepod101: JapanesePod101Client::new(&config)?,
            japanesepod101_alt: JapanesePod101AltClient::new(&config)?,
            krdict: KrdictClient::new(&config)?,
            naver: NaverClient::new(&config)?,
            shtooka: ShtookaClient::new(&config)?,
            downloader,
            config,
        })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &PronunciationConfig {
        &self.config
    }

    /// Normalizer applied to every term
    #[must_use]
    pub const fn normalizer(&self) -> &QueryNormalizer {
        &self.normalizer
    }

    /// Downloader used for the media store hand-off
    #[must_use]
    pub const fn downloader(&self) -> &AudioDownloader {
        &self.downloader
    }

    /// Provider for `kind`
    #[must_use]
    pub fn provider(&self, kind: ProviderKind) -> &dyn PronunciationProvider {
        match kind {
            ProviderKind::JapanesePod101 => &self.japanesepod101,
            ProviderKind::JapanesePod101Alt => &self.japanesepod101_alt,
            ProviderKind::Krdict => &self.krdict,
            ProviderKind::Naver => &self.naver,
            ProviderKind::Shtooka => &self.shtooka,
        }
    }

    /// Build the normalized query a provider would receive
    ///
    /// The language defaults to the provider's own; the reading hint is
    /// dropped for providers that do not take one.
    #[must_use]
    pub fn query(
        &self,
        kind: ProviderKind,
        term: &str,
        language: Option<&str>,
        reading: Option<&str>,
    ) -> LookupQuery {
        let normalized = self.normalizer.normalize(term);
        debug!(provider = %kind, term = %term, normalized = %normalized, "Normalized query");

        let query = LookupQuery::new(
            normalized,
            language.unwrap_or_else(|| kind.default_language()),
        );
        match reading {
            Some(reading) if kind.accepts_reading_hint() => query.with_reading(reading),
            _ => query,
        }
    }

    /// Look up a term with one provider
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self), fields(provider = %kind))]
    pub async fn lookup(
        &self,
        kind: ProviderKind,
        term: &str,
        language: Option<&str>,
        reading: Option<&str>,
    ) -> Result<LookupOutcome, PronunciationError> {
        let query = self.query(kind, term, language, reading);
        self.provider(kind).lookup(&query).await
    }

    /// Look up a term with each provider in turn until one finds audio
    ///
    /// `NoResults` and `Empty` move on to the next provider; errors stop the
    /// walk. When no provider finds anything the result is `NoResults` if any
    /// provider said so, otherwise `Empty`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a provider.
    #[instrument(skip(self, kinds))]
    pub async fn lookup_first(
        &self,
        kinds: &[ProviderKind],
        term: &str,
        language: Option<&str>,
        reading: Option<&str>,
    ) -> Result<LookupOutcome, PronunciationError> {
        let mut any_no_results = false;

        for &kind in kinds {
            match self.lookup(kind, term, language, reading).await? {
                outcome @ LookupOutcome::Found(_) => {
                    info!(provider = %kind, records = outcome.len(), "Found pronunciations");
                    return Ok(outcome);
                },
                LookupOutcome::NoResults => {
                    any_no_results = true;
                    debug!(provider = %kind, "No results, trying next provider");
                },
                LookupOutcome::Empty => {
                    debug!(provider = %kind, "Empty result, trying next provider");
                },
            }
        }

        Ok(if any_no_results {
            LookupOutcome::NoResults
        } else {
            LookupOutcome::Empty
        })
    }

    /// Download every record, reporting each result at the record's index
    ///
    /// Records are downloaded one after another unless `download_concurrency`
    /// allows more; a failed record does not stop the others.
    pub async fn download_all(
        &self,
        records: &mut [Pronunciation],
    ) -> Vec<Result<MediaRef, PronunciationError>> {
        let concurrency = self.config.download_concurrency.max(1);
        let downloader = &self.downloader;

        if concurrency == 1 {
            let mut results = Vec::with_capacity(records.len());
            for record in records.iter_mut() {
                results.push(downloader.download(record).await);
            }
            return results;
        }

        let mut indexed: Vec<_> = stream::iter(records.iter_mut().enumerate().map(
            |(index, record)| async move { (index, downloader.download(record).await) },
        ))
        .buffer_unordered(concurrency)
        .collect()
        .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Download a single record
    ///
    /// # Errors
    ///
    /// Returns an error if the audio cannot be fetched or stored.
    pub async fn download(&self, record: &mut Pronunciation) -> Result<MediaRef, PronunciationError> {
        self.downloader.download(record).await
    }

    /// Trash a record's media
    ///
    /// # Errors
    ///
    /// Returns an error if the record has no media or the media store fails.
    pub async fn remove(&self, record: &mut Pronunciation) -> Result<MediaRef, PronunciationError> {
        self.downloader.remove(record).await
    }

    /// Empty the scratch space, returning the number of entries removed
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directory cannot be cleaned.
    pub async fn cleanup(&self) -> Result<usize, PronunciationError> {
        self.downloader.cleanup().await
    }
}
