//! Shtooka recordings search client
//!
//! The search page comes in two layouts. Exact matches are listed as
//! "matching recordings", one `div.sound` block each; terms known only through
//! other languages are listed as "translations (experimental)", with player
//! icons inside the headings. The page text tells the layouts apart.

use async_trait::async_trait;
use domain::{AudioSource, Pronunciation, ProviderKind};
use reqwest::{RequestBuilder, header::USER_AGENT};
use scraper::{ElementRef, Html};
use tracing::debug;

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

const TRANSLATIONS_MARKER: &str = "translations (experimental)";
const RECORDINGS_MARKER: &str = "matching recordings";
const NO_RECORDING_MARKER: &str = "no recording found";

/// Result page layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Translations,
    Recordings,
    NoRecording,
}

impl Layout {
    fn detect(document: &Html) -> Option<Self> {
        let text = html::text_of(document.root_element()).to_lowercase();
        if text.contains(TRANSLATIONS_MARKER) {
            Some(Self::Translations)
        } else if text.contains(RECORDINGS_MARKER) {
            Some(Self::Recordings)
        } else if text.contains(NO_RECORDING_MARKER) {
            Some(Self::NoRecording)
        } else {
            None
        }
    }
}

/// Shtooka client
#[derive(Debug)]
pub struct ShtookaClient {
    transport: Transport,
    search_url: String,
    user_agent: String,
}

impl ShtookaClient {
    /// Create a new Shtooka client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &PronunciationConfig) -> Result<Self, PronunciationError> {
        Ok(Self {
            transport: Transport::new(config.timeout())?,
            search_url: config.shtooka_url.clone(),
            user_agent: config.shtooka_user_agent.clone(),
        })
    }

    fn build_url(&self, query: &LookupQuery) -> String {
        format!("{}{}", self.search_url, urlencoding::encode(&query.term))
    }

    fn convert_page(page: &str, query: &LookupQuery) -> Result<LookupOutcome, PronunciationError> {
        let document = Html::parse_document(page);
        let Some(layout) = Layout::detect(&document) else {
            return Err(PronunciationError::LayoutUnrecognized {
                provider: ProviderKind::Shtooka.id(),
            });
        };
        debug!(layout = ?layout, term = %query.term, "Detected Shtooka page layout");

        let records = match layout {
            Layout::Translations => Self::convert_translations(&document, query)?,
            Layout::Recordings => Self::convert_recordings(&document, query)?,
            Layout::NoRecording => return Ok(LookupOutcome::NoResults),
        };
        Ok(LookupOutcome::from_records(records))
    }

    /// One record per player icon inside a heading
    fn convert_translations(
        document: &Html,
        query: &LookupQuery,
    ) -> Result<Vec<Pronunciation>, PronunciationError> {
        let icon_selector =
            html::selector("h1 a.player, h2 a.player, h3 a.player, h4 a.player")?;

        let mut records = Vec::new();
        for icon in document.select(&icon_selector) {
            let Some(href) = icon.value().attr("href") else {
                continue;
            };
            let headword = html::nearest_ancestor(icon, is_heading)
                .map(|heading| clean_text(&html::text_excluding(heading, Some(icon))))
                .unwrap_or_default();
            let subtitle = icon.value().attr("title").unwrap_or_default().trim();

            push_record(
                &mut records,
                ProviderKind::Shtooka,
                Pronunciation::new(
                    ProviderKind::Shtooka,
                    query.language.clone(),
                    subtitle,
                    AudioSource::Url(html::force_https(href.trim())),
                    headword,
                ),
            );
        }

        Ok(records)
    }

    /// One record per `div.sound` block
    fn convert_recordings(
        document: &Html,
        query: &LookupQuery,
    ) -> Result<Vec<Pronunciation>, PronunciationError> {
        let block_selector = html::selector("div.sound")?;
        let headword_selector = html::selector("div.sound_top > span")?;
        let subtitle_selector = html::selector("div.sound_bottom")?;
        let link_selector = html::selector("div.download ul a")?;

        let mut records = Vec::new();
        for block in document.select(&block_selector) {
            let Some(href) = html::first_match(block, &link_selector)
                .and_then(|link| link.value().attr("href"))
            else {
                debug!("Skipping recording without download link");
                continue;
            };
            let headword = html::first_match(block, &headword_selector)
                .map(|span| clean_text(&html::text_of(span)))
                .unwrap_or_default();
            let subtitle = html::first_match(block, &subtitle_selector)
                .map(|bottom| html::text_of(bottom).trim().to_string())
                .unwrap_or_default();

            push_record(
                &mut records,
                ProviderKind::Shtooka,
                Pronunciation::new(
                    ProviderKind::Shtooka,
                    query.language.clone(),
                    subtitle,
                    AudioSource::Url(html::force_https(href.trim())),
                    headword,
                ),
            );
        }

        Ok(records)
    }
}

fn is_heading(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "h1" | "h2" | "h3" | "h4")
}

fn clean_text(text: &str) -> String {
    html::collapse_triple_spaces(&html::strip_line_breaks(text))
        .trim()
        .to_string()
}

#[async_trait]
impl PronunciationProvider for ShtookaClient {
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
            .get(self.build_url(query))
            .header(USER_AGENT, &self.user_agent))
    }

    fn parse(
        &self,
        query: &LookupQuery,
        response: &FetchedResponse,
    ) -> Result<LookupOutcome, PronunciationError> {
        Self::convert_page(&response.text(), query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LEGACY_USER_AGENT;

    const RECORDINGS_PAGE: &str = "
        <html><body>
          <h2>Matching recordings</h2>
          <div class=\"sound\">
            <div class=\"sound_top\"><span>\n\t\t你好   nǐ hǎo\n\t</span></div>
            <div class=\"sound_bottom\"> Chinese (Mandarin), speaker: Jiang </div>
            <div class=\"download\"><ul>
              <li><a href=\"http://packs.shtooka.net/cmn-balm-hsk/mp3/cmn-6b0d6d8c.mp3\">mp3</a></li>
              <li><a href=\"http://packs.shtooka.net/cmn-balm-hsk/ogg/cmn-6b0d6d8c.ogg\">ogg</a></li>
            </ul></div>
          </div>
          <div class=\"sound\">
            <div class=\"sound_top\"><span>你好</span></div>
            <div class=\"sound_bottom\">Chinese (Mandarin), speaker: Wei</div>
            <div class=\"download\"><ul><li><a href=\"https://packs.shtooka.net/b.mp3\">mp3</a></li></ul></div>
          </div>
        </body></html>
    ";

    const TRANSLATIONS_PAGE: &str = r#"
        <html><body>
          <h2>Translations (experimental)</h2>
          <h3>hello <a class="player" href="http://packs.shtooka.net/eng/hello.mp3" title="English, speaker: Ann"><img src="play.png"></a></h3>
          <h3>bonjour <a class="player" href="https://packs.shtooka.net/fra/bonjour.mp3" title="French"></a></h3>
          <p><a class="player" href="https://packs.shtooka.net/ignored.mp3" title="outside heading"></a></p>
        </body></html>
    "#;

    fn query() -> LookupQuery {
        LookupQuery::new("你好", "zh")
    }

    fn client() -> ShtookaClient {
        ShtookaClient::new(&PronunciationConfig::default()).unwrap()
    }

    #[test]
    fn test_build_request() {
        let request = client().build_request(&query()).unwrap().build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://shtooka.net/search.php?str=%E4%BD%A0%E5%A5%BD"
        );
        assert_eq!(request.headers()[USER_AGENT], LEGACY_USER_AGENT);
    }

    #[test]
    fn test_recordings_layout() {
        let outcome = ShtookaClient::convert_page(RECORDINGS_PAGE, &query()).unwrap();
        let records = outcome.records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].headword(), "你好 nǐ hǎo");
        assert_eq!(records[0].speaker_label, "Chinese (Mandarin), speaker: Jiang");
        assert_eq!(
            records[0].source.url(),
            Some("https://packs.shtooka.net/cmn-balm-hsk/mp3/cmn-6b0d6d8c.mp3")
        );
        assert_eq!(records[1].headword(), "你好");
        assert_eq!(records[1].source.url(), Some("https://packs.shtooka.net/b.mp3"));
    }

    #[test]
    fn test_translations_layout() {
        let outcome = ShtookaClient::convert_page(TRANSLATIONS_PAGE, &query()).unwrap();
        let records = outcome.records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].headword(), "hello");
        assert_eq!(records[0].speaker_label, "English, speaker: Ann");
        assert_eq!(
            records[0].source.url(),
            Some("https://packs.shtooka.net/eng/hello.mp3")
        );
        assert_eq!(records[1].headword(), "bonjour");
        assert_eq!(records[1].speaker_label, "French");
    }

    #[test]
    fn test_no_recording_marker() {
        let page = "<html><body><p>No recording found for this query.</p></body></html>";
        let outcome = ShtookaClient::convert_page(page, &query()).unwrap();
        assert_eq!(outcome, LookupOutcome::NoResults);
    }

    #[test]
    fn test_recordings_marker_without_blocks_is_empty() {
        let page = "<html><body><h2>Matching recordings</h2></body></html>";
        let outcome = ShtookaClient::convert_page(page, &query()).unwrap();
        assert_eq!(outcome, LookupOutcome::Empty);
    }

    #[test]
    fn test_unknown_layout() {
        let page = "<html><body><p>Site maintenance</p></body></html>";
        let err = ShtookaClient::convert_page(page, &query()).unwrap_err();
        assert!(matches!(
            err,
            PronunciationError::LayoutUnrecognized { provider: "shtooka" }
        ));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("\n\t你好   nǐ hǎo\n"), "你好 nǐ hǎo");
    }
}
