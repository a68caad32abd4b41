//! Korean Basic Dictionary (krdict) client
//!
//! Scrapes the detailed word search. Each headword entry is a `<dl>` whose
//! `<dt>` holds `span.search_sub` groups with a pronunciation label and one
//! or more `javascript:fnSoundPlay('…')` links, and whose `<dd>` holds the
//! numbered English glosses.

use async_trait::async_trait;
use domain::{AudioSource, Pronunciation, ProviderKind};
use reqwest::{RequestBuilder, header::USER_AGENT};
use scraper::{ElementRef, Html, Selector};

use crate::{
    config::PronunciationConfig,
    error::PronunciationError,
    html,
    models::{LookupOutcome, LookupQuery},
    provider::PronunciationProvider,
    providers::push_record,
    transport::{FetchedResponse, Transport},
    urlencoding,
};

const SOUND_FUNCTION: &str = "fnSoundPlay";

/// Levels between a sound link and the entry holding its gloss
const ENTRY_DEPTH: usize = 3;

/// Krdict client
#[derive(Debug)]
pub struct KrdictClient {
    transport: Transport,
    search_url: String,
    user_agent: String,
}

impl KrdictClient {
    /// Create a new Krdict client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &PronunciationConfig) -> Result<Self, PronunciationError> {
        Ok(Self {
            transport: Transport::new(config.timeout())?,
            search_url: config.krdict_url.clone(),
            user_agent: config.browser_user_agent.clone(),
        })
    }

    fn build_url(&self, query: &LookupQuery) -> String {
        format!("{}{}", self.search_url, urlencoding::encode(&query.term))
    }

    /// Scrape every sound link on the result page
    fn convert_page(page: &str, query: &LookupQuery) -> Result<Vec<Pronunciation>, PronunciationError> {
        let document = Html::parse_document(page);
        let group_selector = html::selector("span.search_sub")?;
        let link_selector = html::selector("a")?;
        let gloss_selector = html::selector("dd")?;

        let mut records = Vec::new();
        for group in document.select(&group_selector) {
            for (link, label) in html::labelled_matches(group, &link_selector) {
                let Some(href) = link.value().attr("href") else {
                    continue;
                };
                let subtitle = Self::subtitle(link, &label, &gloss_selector);

                push_record(
                    &mut records,
                    ProviderKind::Krdict,
                    Pronunciation::new(
                        ProviderKind::Krdict,
                        query.language.clone(),
                        subtitle,
                        AudioSource::Url(html::js_call_argument(href, SOUND_FUNCTION)),
                        query.term.clone(),
                    ),
                );
            }
        }

        Ok(records)
    }

    /// `label - gloss` for a sound link
    ///
    /// The label is the group text since the previous sound link; the gloss is
    /// the first clause of the entry's first definition.
    fn subtitle(link: ElementRef<'_>, label: &str, gloss: &Selector) -> String {
        let definition = html::nth_ancestor(link, ENTRY_DEPTH)
            .and_then(|entry| html::first_match(entry, gloss))
            .map(html::text_of)
            .unwrap_or_default();

        format!("{label} - {}", first_gloss(&definition))
    }
}

/// First `;`-separated clause of a definition, without its ordinal marker
fn first_gloss(definition: &str) -> String {
    let definition = definition.trim();
    let definition = definition
        .split_once('.')
        .filter(|(ordinal, _)| !ordinal.is_empty() && ordinal.chars().all(|c| c.is_ascii_digit()))
        .map_or(definition, |(_, rest)| rest);

    definition
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[async_trait]
impl PronunciationProvider for KrdictClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Krdict
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

    /// Krdict never reports an empty success: a page without sound links
    /// means the dictionary has no audio for the term.
    fn parse(
        &self,
        query: &LookupQuery,
        response: &FetchedResponse,
    ) -> Result<LookupOutcome, PronunciationError> {
        let records = Self::convert_page(&response.text(), query)?;
        if records.is_empty() {
            return Ok(LookupOutcome::NoResults);
        }
        Ok(LookupOutcome::Found(records))
    }
}
