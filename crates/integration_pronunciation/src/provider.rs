//! Pronunciation provider trait

use async_trait::async_trait;
use domain::ProviderKind;
use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, info};

use crate::{
    error::PronunciationError,
    models::{LookupOutcome, LookupQuery},
    transport::{Classification, FetchedResponse, Transport, classify_status},
};

/// Trait for pronunciation sources
///
/// Implemented by every provider (JapanesePod101, Krdict, Naver, Shtooka, ...).
/// A lookup is split into request construction, status classification and
/// body parsing so each step can be exercised on its own.
#[async_trait]
pub trait PronunciationProvider: Send + Sync {
    /// Which source this provider talks to
    fn kind(&self) -> ProviderKind;

    /// Transport used to execute requests
    fn transport(&self) -> &Transport;

    /// Build the outbound request for a normalized query
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be constructed.
    fn build_request(&self, query: &LookupQuery) -> Result<RequestBuilder, PronunciationError>;

    /// Decide how a response status is handled
    ///
    /// # Errors
    ///
    /// Returns a transient error for statuses that are neither success nor "no data".
    fn classify(&self, status: StatusCode) -> Result<Classification, PronunciationError> {
        classify_status(status)
    }

    /// Parse a successful response into pronunciations
    ///
    /// # Errors
    ///
    /// Returns an error if the body is malformed or matches no known layout.
    fn parse(
        &self,
        query: &LookupQuery,
        response: &FetchedResponse,
    ) -> Result<LookupOutcome, PronunciationError>;

    /// Look up pronunciations for a normalized query
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    async fn lookup(&self, query: &LookupQuery) -> Result<LookupOutcome, PronunciationError> {
        let provider = self.kind();
        debug!(provider = %provider, term = %query.term, "Sending pronunciation lookup");

        let response = self.transport().fetch(self.build_request(query)?).await?;

        if self.classify(response.status())? == Classification::NoResults {
            info!(provider = %provider, term = %query.term, "Provider has no pronunciations");
            return Ok(LookupOutcome::NoResults);
        }

        let outcome = self.parse(query, &response)?;
        debug!(
            provider = %provider,
            outcome = outcome.label(),
            records = outcome.len(),
            "Pronunciation lookup completed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
pub mod tests {
    use std::time::Duration;

    use domain::{AudioSource, Pronunciation};

    use super::*;

    /// Provider returning canned parse results, for orchestration tests
    pub struct MockProvider {
        pub transport: Transport,
        pub records: Vec<Pronunciation>,
    }

    impl MockProvider {
        #[must_use]
        pub fn new() -> Self {
            Self {
                transport: Transport::new(Some(Duration::from_secs(5))).unwrap(),
                records: vec![],
            }
        }

        #[must_use]
        pub fn with_records(mut self, records: Vec<Pronunciation>) -> Self {
            self.records = records;
            self
        }
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PronunciationProvider for MockProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Shtooka
        }

        fn transport(&self) -> &Transport {
            &self.transport
        }

        fn build_request(&self, query: &LookupQuery) -> Result<RequestBuilder, PronunciationError> {
            Ok(self
                .transport
                .client()
                .get(format!("http://mock.invalid/?q={}", query.term)))
        }

        fn parse(
            &self,
            _query: &LookupQuery,
            _response: &FetchedResponse,
        ) -> Result<LookupOutcome, PronunciationError> {
            Ok(LookupOutcome::from_records(self.records.clone()))
        }
    }

    fn _assert_object_safe(_: &dyn PronunciationProvider) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PronunciationProvider>();
    }

    #[test]
    fn test_default_classification() {
        let provider = MockProvider::new();
        assert_eq!(
            provider.classify(StatusCode::NOT_FOUND).unwrap(),
            Classification::NoResults
        );
        assert!(provider.classify(StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }

    #[test]
    fn test_mock_parse() {
        let record = Pronunciation::new(
            ProviderKind::Shtooka,
            "zh",
            "speaker",
            AudioSource::Url("https://example.com/a.mp3".to_string()),
            "你好",
        )
        .unwrap();
        let provider = MockProvider::new().with_records(vec![record]);
        let outcome = provider
            .parse(
                &LookupQuery::new("你好", "zh"),
                &FetchedResponse::ok("text/html", ""),
            )
            .unwrap();
        assert_eq!(outcome.len(), 1);

        let empty = MockProvider::new()
            .parse(
                &LookupQuery::new("你好", "zh"),
                &FetchedResponse::ok("text/html", ""),
            )
            .unwrap();
        assert_eq!(empty, LookupOutcome::Empty);
    }

    #[test]
    fn test_build_request() {
        let request = MockProvider::new()
            .build_request(&LookupQuery::new("hao", "zh"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://mock.invalid/?q=hao");
    }
}
