//! Pronunciation provider identifier

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// The web source a pronunciation was retrieved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// JapanesePod101 audio endpoint (kanji + kana lookup)
    JapanesePod101,
    /// JapanesePod101 dictionary search (form POST)
    #[serde(rename = "japanesepod101-alt")]
    JapanesePod101Alt,
    /// Korean Basic Dictionary (krdict.korean.go.kr)
    Krdict,
    /// Naver Korean-English dictionary JSON API
    Naver,
    /// Shtooka recordings archive
    Shtooka,
}

impl ProviderKind {
    /// All providers in their default lookup order
    pub const ALL: [Self; 5] = [
        Self::JapanesePod101,
        Self::JapanesePod101Alt,
        Self::Krdict,
        Self::Naver,
        Self::Shtooka,
    ];

    /// Stable identifier used in configuration and on the command line
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::JapanesePod101 => "japanesepod101",
            Self::JapanesePod101Alt => "japanesepod101-alt",
            Self::Krdict => "krdict",
            Self::Naver => "naver",
            Self::Shtooka => "shtooka",
        }
    }

    /// Language tag the provider serves
    #[must_use]
    pub const fn default_language(&self) -> &'static str {
        match self {
            Self::JapanesePod101 | Self::JapanesePod101Alt => "ja",
            Self::Krdict | Self::Naver => "ko",
            Self::Shtooka => "zh",
        }
    }

    /// Whether the provider accepts a kana reading hint
    #[must_use]
    pub const fn accepts_reading_hint(&self) -> bool {
        matches!(self, Self::JapanesePod101)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == needle)
            .ok_or(DomainError::UnknownProvider(needle))
    }
}
