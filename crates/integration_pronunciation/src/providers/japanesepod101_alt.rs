//! JapanesePod101 dictionary search client
//!
//! Posts an exact-match dictionary query and scrapes the result rows for
//! their kana reading and embedded `<audio>` source.

use async_trait::async_trait;
use domain::{AudioSource, Pronunciation, ProviderKind};
use reqwest::{
    RequestBuilder,
    header::{CONTENT_TYPE, USER_AGENT},
};
use scraper::Html;
use tracing::debug;

use crate::{
    config::PronunciationConfig,
    error::PronunciationError,
    html,
    models::{LookupOutcome, LookupQuery},
    provider::PronunciationProvider,
    providers::push_record,
    transport::{FetchedResponse, Transport},
};

/// Suffix marking headwords that came from the dictionary search
pub const HEADWORD_SUFFIX: &str = " (Alt)";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// JapanesePod101 dictionary search client
#[derive(Debug)]
pub struct JapanesePod101AltClient {
    transport: Transport,
    endpoint: String,
    user_agent: String,
}

impl JapanesePod101AltClient {
    /// Create a new dictionary search client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &PronunciationConfig) -> Result<Self, PronunciationError> {
        Ok(Self {
            transport: Transport::new(config.timeout())?,
            endpoint: config.japanesepod101_alt_url.clone(),
            user_agent: config.browser_user_agent.clone(),
        })
    }

    /// Form fields of the dictionary search, in submission order
    fn form_fields(query: &LookupQuery) -> [(&'static str, &str); 4] {
        [
            ("post", "dictionary_reference"),
            ("match_type", "exact"),
            ("search_query", &query.term),
            ("vulgar", "true"),
        ]
    }

    /// Scrape result rows from the search page
    fn convert_page(page: &str, query: &LookupQuery) -> Result<Vec<Pronunciation>, PronunciationError> {
        let document = Html::parse_document(page);
        let row_selector = html::selector(".dc-box--white.dc-result-row")?;
        let kana_selector = html::selector(".dc-vocab_kana")?;
        let source_selector = html::selector(".dc-result-row__player-field div audio source")?;

        let headword = format!("{}{HEADWORD_SUFFIX}", query.term);
        let mut records = Vec::new();

        for row in document.select(&row_selector) {
            let Some(src) = html::first_match(row, &source_selector)
                .and_then(|source| source.value().attr("src"))
            else {
                debug!("Skipping result row without audio");
                continue;
            };
            let subtitle = html::first_match(row, &kana_selector)
                .map(html::text_of)
                .unwrap_or_default();

            push_record(
                &mut records,
                ProviderKind::JapanesePod101Alt,
                Pronunciation::new(
                    ProviderKind::JapanesePod101Alt,
                    query.language.clone(),
                    subtitle,
                    AudioSource::Url(src.trim().to_string()),
                    headword.clone(),
                ),
            );
        }

        Ok(records)
    }
}

#[async_trait]
impl PronunciationProvider for JapanesePod101AltClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::JapanesePod101Alt
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn build_request(&self, query: &LookupQuery) -> Result<RequestBuilder, PronunciationError> {
        Ok(self
            .transport
            .client()
            .post(&self.endpoint)
            // `form` only fills in a content type when none is set
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(USER_AGENT, &self.user_agent)
            .form(&Self::form_fields(query)))
    }

    fn parse(
        &self,
        query: &LookupQuery,
        response: &FetchedResponse,
    ) -> Result<LookupOutcome, PronunciationError> {
        Self::convert_page(&response.text(), query).map(LookupOutcome::from_records)
    }
}
