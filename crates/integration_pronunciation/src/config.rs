//! Pronunciation retrieval configuration

use std::{path::PathBuf, time::Duration};

use domain::QueryNormalizer;
use serde::{Deserialize, Serialize};

/// User agent of a current desktop browser
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/86.0.4240.198 Safari/537.36";

/// User agent the audio endpoints were first scraped with
pub const LEGACY_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/35.0.1916.47 Safari/537.36";

/// Configuration for pronunciation providers and the download pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PronunciationConfig {
    /// Characters removed from every query term before any provider sees it
    #[serde(default)]
    pub replace_characters: Vec<char>,

    /// JapanesePod101 audio endpoint
    #[serde(default = "default_japanesepod101_url")]
    pub japanesepod101_url: String,

    /// JapanesePod101 dictionary search endpoint
    #[serde(default = "default_japanesepod101_alt_url")]
    pub japanesepod101_alt_url: String,

    /// Krdict search URL; the encoded term is appended verbatim
    #[serde(default = "default_krdict_url")]
    pub krdict_url: String,

    /// Naver dictionary API URL; the encoded term is appended verbatim
    #[serde(default = "default_naver_url")]
    pub naver_url: String,

    /// Shtooka search URL; the encoded term is appended verbatim
    #[serde(default = "default_shtooka_url")]
    pub shtooka_url: String,

    /// Request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of audio downloads run at once (1 keeps list order strictly sequential)
    #[serde(default = "default_download_concurrency")]
    pub download_concurrency: usize,

    /// Directory used to stage audio before it is handed to the media store
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// User agent for Krdict, Naver and the JapanesePod101 dictionary search
    #[serde(default = "default_browser_user_agent")]
    pub browser_user_agent: String,

    /// User agent for the JapanesePod101 audio endpoint
    #[serde(default = "default_legacy_user_agent")]
    pub japanesepod101_user_agent: String,

    /// User agent for Shtooka
    #[serde(default = "default_legacy_user_agent")]
    pub shtooka_user_agent: String,
}

fn default_japanesepod101_url() -> String {
    "https://assets.languagepod101.com/dictionary/japanese/audiomp3.php".to_string()
}

fn default_japanesepod101_alt_url() -> String {
    "https://www.japanesepod101.com/learningcenter/reference/dictionary_post".to_string()
}

fn default_krdict_url() -> String {
    concat!(
        "https://krdict.korean.go.kr/eng/dicSearchDetail/searchDetailWordsResult",
        "?nation=eng&nationCode=6&searchFlag=Y&sort=C&currentPage=1&ParaWordNo=",
        "&syllablePosition=&actCategoryList=&all_gubun=ALL&gubun=W&gubun=P&gubun=E",
        "&all_wordNativeCode=ALL&wordNativeCode=1&wordNativeCode=2&wordNativeCode=3",
        "&wordNativeCode=0&all_sp_code=ALL&sp_code=1&sp_code=2&sp_code=3&sp_code=4",
        "&sp_code=5&sp_code=6&sp_code=7&sp_code=8&sp_code=9&sp_code=10&sp_code=11",
        "&sp_code=12&sp_code=13&sp_code=14&sp_code=27&all_imcnt=ALL&imcnt=1&imcnt=2",
        "&imcnt=3&imcnt=0&all_multimedia=ALL&multimedia=P&multimedia=I&multimedia=V",
        "&multimedia=A&multimedia=S&multimedia=N&searchSyllableStart=&searchSyllableEnd=",
        "&searchOp=AND&searchTarget=word&searchOrglanguage=all&wordCondition=wordSame",
        "&query="
    )
    .to_string()
}

fn default_naver_url() -> String {
    "https://korean.dict.naver.com/api3/koen/search?m=mobile&shouldSearchVlive=true&lang=en&query="
        .to_string()
}

fn default_shtooka_url() -> String {
    "https://shtooka.net/search.php?str=".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_download_concurrency() -> usize {
    1
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("pronunciation-scratch")
}

fn default_browser_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

fn default_legacy_user_agent() -> String {
    LEGACY_USER_AGENT.to_string()
}

impl Default for PronunciationConfig {
    fn default() -> Self {
        Self {
            replace_characters: Vec::new(),
            japanesepod101_url: default_japanesepod101_url(),
            japanesepod101_alt_url: default_japanesepod101_alt_url(),
            krdict_url: default_krdict_url(),
            naver_url: default_naver_url(),
            shtooka_url: default_shtooka_url(),
            timeout_secs: default_timeout_secs(),
            download_concurrency: default_download_concurrency(),
            scratch_dir: default_scratch_dir(),
            browser_user_agent: default_browser_user_agent(),
            japanesepod101_user_agent: default_legacy_user_agent(),
            shtooka_user_agent: default_legacy_user_agent(),
        }
    }
}

impl PronunciationConfig {
    /// Create a configuration for testing (short timeout)
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Point every provider at a single base URL, keeping the default paths
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.japanesepod101_url = format!("{base_url}/dictionary/japanese/audiomp3.php");
        self.japanesepod101_alt_url =
            format!("{base_url}/learningcenter/reference/dictionary_post");
        self.krdict_url = format!("{base_url}/eng/dicSearchDetail/searchDetailWordsResult?query=");
        self.naver_url = format!("{base_url}/api3/koen/search?m=mobile&lang=en&query=");
        self.shtooka_url = format!("{base_url}/search.php?str=");
        self
    }

    /// Query normalizer built from `replace_characters`
    #[must_use]
    pub fn normalizer(&self) -> QueryNormalizer {
        QueryNormalizer::new(self.replace_characters.iter().copied())
    }

    /// Request timeout, if enabled
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Check if downloads run in parallel
    #[must_use]
    pub const fn parallel_downloads(&self) -> bool {
        self.download_concurrency > 1
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.download_concurrency == 0 {
            return Err("download_concurrency must be greater than 0".to_string());
        }

        if self.download_concurrency > 16 {
            return Err("download_concurrency must be 16 or less".to_string());
        }

        let endpoints = [
            ("japanesepod101_url", &self.japanesepod101_url),
            ("japanesepod101_alt_url", &self.japanesepod101_alt_url),
            ("krdict_url", &self.krdict_url),
            ("naver_url", &self.naver_url),
            ("shtooka_url", &self.shtooka_url),
        ];
        for (name, value) in endpoints {
            if url::Url::parse(value).is_err() {
                return Err(format!("{name} is not a valid URL: {value}"));
            }
        }

        if self.scratch_dir.as_os_str().is_empty() {
            return Err("scratch_dir cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PronunciationConfig::default();
        assert!(config.replace_characters.is_empty());
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.download_concurrency, 1);
        assert!(!config.parallel_downloads());
        assert!(config.krdict_url.ends_with("&query="));
        assert_eq!(config.shtooka_user_agent, LEGACY_USER_AGENT);
    }

    #[test]
    fn test_testing_config() {
        let config = PronunciationConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_disables_timeout() {
        let config = PronunciationConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_normalizer_uses_replace_characters() {
        let config = PronunciationConfig {
            replace_characters: vec!['(', ')'],
            ..Default::default()
        };
        assert_eq!(config.normalizer().normalize(" (猫) "), "猫");
    }

    #[test]
    fn test_with_base_url() {
        let config = PronunciationConfig::default().with_base_url("http://127.0.0.1:9999/");
        assert_eq!(
            config.japanesepod101_url,
            "http://127.0.0.1:9999/dictionary/japanese/audiomp3.php"
        );
        assert_eq!(config.shtooka_url, "http://127.0.0.1:9999/search.php?str=");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_success() {
        let config = PronunciationConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_concurrency() {
        let config = PronunciationConfig {
            download_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PronunciationConfig {
            download_concurrency: 17,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_endpoint() {
        let config = PronunciationConfig {
            naver_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("naver_url"));
    }

    #[test]
    fn test_serialization() {
        let config: PronunciationConfig =
            serde_json::from_str(r#"{"replace_characters": ["~"], "download_concurrency": 4}"#)
                .unwrap();
        assert_eq!(config.replace_characters, vec!['~']);
        assert_eq!(config.download_concurrency, 4);
        assert_eq!(config.timeout_secs, 30);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PronunciationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.naver_url, config.naver_url);
    }
}
