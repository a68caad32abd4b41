//! Naver Korean-English dictionary client
//!
//! Queries the dictionary's JSON search API. A search returns entries for
//! related headwords as well, so only entries whose headword is exactly the
//! query term contribute pronunciations.

use async_trait::async_trait;
use domain::{AudioSource, Pronunciation, ProviderKind};
use reqwest::{
    RequestBuilder,
    header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE, DNT, USER_AGENT},
};

use crate::{
    config::PronunciationConfig,
    error::PronunciationError,
    models::{LookupOutcome, LookupQuery},
    provider::PronunciationProvider,
    providers::push_record,
    transport::{FetchedResponse, Transport},
    urlencoding,
};

/// Naver dictionary API response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NaverResponse {
        pub search_result_map: SearchResultMap,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SearchResultMap {
        pub search_result_list_map: SearchResultListMap,
    }

    #[derive(Debug, Deserialize)]
    pub struct SearchResultListMap {
        #[serde(rename = "WORD")]
        pub word: WordResults,
    }

    #[derive(Debug, Deserialize)]
    pub struct WordResults {
        #[serde(default)]
        pub items: Option<Vec<Item>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Item {
        /// Headword, with the matched part wrapped in `<strong>`
        #[serde(default)]
        pub exp_entry: Option<String>,

        #[serde(default)]
        pub search_phonetic_symbol_list: Option<Vec<PhoneticSymbol>>,

        #[serde(default)]
        pub means_collector: Option<Vec<MeansCollector>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PhoneticSymbol {
        #[serde(default)]
        pub symbol_value: Option<String>,

        /// Audio file URL, empty when the symbol has no recording
        #[serde(default)]
        pub symbol_file: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MeansCollector {
        #[serde(default)]
        pub means: Option<Vec<Mean>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Mean {
        #[serde(default)]
        pub value: Option<String>,
    }
}

/// Naver dictionary client
#[derive(Debug)]
pub struct NaverClient {
    transport: Transport,
    search_url: String,
    user_agent: String,
}

impl NaverClient {
    /// Create a new Naver client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &PronunciationConfig) -> Result<Self, PronunciationError> {
        Ok(Self {
            transport: Transport::new(config.timeout())?,
            search_url: config.naver_url.clone(),
            user_agent: config.browser_user_agent.clone(),
        })
    }

    fn build_url(&self, query: &LookupQuery) -> String {
        format!("{}{}", self.search_url, urlencoding::encode(&query.term))
    }

    /// Convert API items into records, keeping exact headword matches only
    fn convert_response(response: api::NaverResponse, query: &LookupQuery) -> Vec<Pronunciation> {
        let items = response
            .search_result_map
            .search_result_list_map
            .word
            .items
            .unwrap_or_default();

        let mut records = Vec::new();
        for item in items {
            let headword = strip_emphasis(item.exp_entry.as_deref().unwrap_or_default());
            if headword != query.term {
                continue;
            }

            let meaning = item
                .means_collector
                .as_ref()
                .and_then(|collectors| collectors.first())
                .and_then(|collector| collector.means.as_ref())
                .and_then(|means| means.first())
                .and_then(|mean| mean.value.as_deref())
                .map(|value| value.split(',').next().unwrap_or_default().to_string());

            for symbol in item.search_phonetic_symbol_list.unwrap_or_default() {
                let Some(file) = symbol.symbol_file.filter(|file| !file.is_empty()) else {
                    continue;
                };
                let reading = strip_emphasis(symbol.symbol_value.as_deref().unwrap_or_default());
                let subtitle = match &meaning {
                    Some(meaning) => format!("[{reading}] - {meaning}"),
                    None => format!("[{reading}]"),
                };

                push_record(
                    &mut records,
                    ProviderKind::Naver,
                    Pronunciation::new(
                        ProviderKind::Naver,
                        query.language.clone(),
                        subtitle,
                        AudioSource::Url(file),
                        query.term.clone(),
                    ),
                );
            }
        }

        records
    }
}

/// Remove the `<strong>` emphasis Naver puts around matched text
fn strip_emphasis(text: &str) -> String {
    text.replace("<strong>", "").replace("</strong>", "")
}

#[async_trait]
impl PronunciationProvider for NaverClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Naver
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn build_request(&self, query: &LookupQuery) -> Result<RequestBuilder, PronunciationError> {
        Ok(self
            .transport
            .client()
            .get(self.build_url(query))
            .header(ACCEPT, "*/*")
            .header(DNT, "1")
            .header(COOKIE, "nid_slevel=1; nid_enctp=1; nx_ssl=2")
            .header(ACCEPT_LANGUAGE, "en,ko-KR;q=0.9,ko;q=0.8,en-US;q=0.7")
            .header(USER_AGENT, &self.user_agent)
            .header("Sec-Fetch-Mode", "no-cors")
            .header("Sec-Fetch-Site", "same-site")
            .header(CACHE_CONTROL, "no-cache")
            .header("Upgrade-Insecure-Requests", "1"))
    }

    /// An empty item list is a valid outcome for Naver, not "no results".
    fn parse(
        &self,
        query: &LookupQuery,
        response: &FetchedResponse,
    ) -> Result<LookupOutcome, PronunciationError> {
        let api_response: api::NaverResponse = serde_json::from_str(&response.text())
            .map_err(|e| PronunciationError::ParseError(e.to_string()))?;

        Ok(LookupOutcome::from_records(Self::convert_response(
            api_response,
            query,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NaverClient {
        NaverClient::new(&PronunciationConfig::default()).unwrap()
    }

    fn response(items: serde_json::Value) -> api::NaverResponse {
        serde_json::from_value(serde_json::json!({
            "searchResultMap": {
                "searchResultListMap": {
                    "WORD": { "items": items }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_build_url() {
        let url = client().build_url(&LookupQuery::new("사랑", "ko"));
        assert_eq!(
            url,
            "https://korean.dict.naver.com/api3/koen/search?m=mobile&shouldSearchVlive=true&lang=en&query=%EC%82%AC%EB%9E%91"
        );
    }

    #[test]
    fn test_build_request_headers() {
        let request = client()
            .build_request(&LookupQuery::new("사랑", "ko"))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers()[ACCEPT], "*/*");
        assert_eq!(request.headers()[COOKIE], "nid_slevel=1; nid_enctp=1; nx_ssl=2");
        assert_eq!(request.headers()["Sec-Fetch-Mode"], "no-cors");
    }

    #[test]
    fn test_convert_exact_headword() {
        let api_response = response(serde_json::json!([
            {
                "expEntry": "<strong>사랑</strong>",
                "searchPhoneticSymbolList": [
                    { "symbolValue": "<strong>사랑</strong>", "symbolFile": "https://dict-dn.pstatic.net/v/sarang.mp3?_lsu_sa_=abc" },
                    { "symbolValue": "사ː랑", "symbolFile": "" }
                ],
                "meansCollector": [ { "means": [ { "value": "love, affection" } ] } ]
            }
        ]));

        let records = NaverClient::convert_response(api_response, &LookupQuery::new("사랑", "ko"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker_label, "[사랑] - love");
        assert_eq!(records[0].vote_score, "");
        assert_eq!(records[0].rank, 1);
        assert_eq!(
            records[0].source.url(),
            Some("https://dict-dn.pstatic.net/v/sarang.mp3?_lsu_sa_=abc")
        );
    }

    #[test]
    fn test_other_headwords_are_discarded() {
        let api_response = response(serde_json::json!([
            {
                "expEntry": "<strong>사랑</strong>하다",
                "searchPhoneticSymbolList": [
                    { "symbolValue": "사랑하다", "symbolFile": "https://dict-dn.pstatic.net/v/hada.mp3" }
                ],
                "meansCollector": [ { "means": [ { "value": "to love" } ] } ]
            }
        ]));

        let records = NaverClient::convert_response(api_response, &LookupQuery::new("사랑", "ko"));
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_meaning_and_nulls() {
        let api_response = response(serde_json::json!([
            {
                "expEntry": "사랑",
                "searchPhoneticSymbolList": [
                    { "symbolValue": null, "symbolFile": null },
                    { "symbolValue": "사랑", "symbolFile": "https://dict-dn.pstatic.net/v/a.mp3" }
                ],
                "meansCollector": null
            }
        ]));

        let records = NaverClient::convert_response(api_response, &LookupQuery::new("사랑", "ko"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speaker_label, "[사랑]");
    }

    #[test]
    fn test_empty_items_is_empty_outcome() {
        let body = r#"{"searchResultMap":{"searchResultListMap":{"WORD":{"items":[]}}}}"#;
        let outcome = client()
            .parse(
                &LookupQuery::new("사랑", "ko"),
                &FetchedResponse::ok("application/json;charset=UTF-8", body),
            )
            .unwrap();
        assert_eq!(outcome, LookupOutcome::Empty);
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let result = client().parse(
            &LookupQuery::new("사랑", "ko"),
            &FetchedResponse::ok("application/json", r#"{"unexpected": true}"#),
        );
        assert!(matches!(result, Err(PronunciationError::ParseError(_))));
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("<strong>사랑</strong>하다"), "사랑하다");
    }
}
