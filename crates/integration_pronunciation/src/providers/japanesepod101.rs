//! JapanesePod101 audio endpoint client
//!
//! The endpoint answers a kanji/kana pair with the MP3 itself. When it has no
//! recording it still answers `200 OK`, but with a fixed-size clip of silence,
//! so the body length is the only "no match" signal.

use async_trait::async_trait;
use domain::{AudioSource, Pronunciation, ProviderKind};
use reqwest::{RequestBuilder, header::USER_AGENT};
use tracing::debug;

use crate::{
    config::PronunciationConfig,
    error::PronunciationError,
    models::{LookupOutcome, LookupQuery},
    provider::PronunciationProvider,
    providers::{push_record, with_query},
    transport::{FetchedResponse, Transport},
    urlencoding,
};

/// Byte length of the placeholder clip served when no recording exists
pub const SILENCE_CLIP_LEN: usize = 52_288;

/// JapanesePod101 audio endpoint client
#[derive(Debug)]
pub struct JapanesePod101Client {
    transport: Transport,
    endpoint: String,
    user_agent: String,
}

impl JapanesePod101Client {
    /// Create a new JapanesePod101 client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &PronunciationConfig) -> Result<Self, PronunciationError> {
        Ok(Self {
            transport: Transport::new(config.timeout())?,
            endpoint: config.japanesepod101_url.clone(),
            user_agent: config.japanesepod101_user_agent.clone(),
        })
    }

    /// Build the audio URL with `kanji` and `kana` parameters
    fn build_url(&self, query: &LookupQuery) -> String {
        with_query(
            &self.endpoint,
            &format!(
                "kanji={}&kana={}",
                urlencoding::encode(&query.term),
                urlencoding::encode(query.reading_or_empty())
            ),
        )
    }

    /// Turn the audio body into at most one record
    fn convert_audio(query: &LookupQuery, body: &bytes::Bytes) -> Vec<Pronunciation> {
        let mut records = Vec::new();
        if body.len() == SILENCE_CLIP_LEN {
            debug!(term = %query.term, "Received placeholder clip");
            return records;
        }

        push_record(
            &mut records,
            ProviderKind::JapanesePod101,
            Pronunciation::new(
                ProviderKind::JapanesePod101,
                query.language.clone(),
                query.reading_or_empty(),
                AudioSource::Inline(body.clone()),
                query.term.clone(),
            ),
        );
        records
    }
}

#[async_trait]
impl PronunciationProvider for JapanesePod101Client {
    fn kind(&self) -> ProviderKind {
        ProviderKind::JapanesePod101
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn build_request(&self, query: &LookupQuery) -> Result<RequestBuilder, PronunciationError> {
        Ok(self
            .transport
            .client()
            .get(self.build_url(query))
            .header(USER_AGENT, &self.user_agent))
    }

    fn parse(
        &self,
        query: &LookupQuery,
        response: &FetchedResponse,
    ) -> Result<LookupOutcome, PronunciationError> {
        Ok(LookupOutcome::from_records(Self::convert_audio(
            query,
            response.body(),
        )))
    }
}
