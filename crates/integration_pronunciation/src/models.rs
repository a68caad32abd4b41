//! Lookup request and outcome models

use domain::Pronunciation;

/// A normalized lookup against a single provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    /// Normalized term sent to the provider
    pub term: String,

    /// Language tag stamped on every produced record
    pub language: String,

    /// Kana reading hint (JapanesePod101 only)
    pub reading: Option<String>,
}

impl LookupQuery {
    /// Create a query for an already normalized term
    pub fn new(term: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            language: language.into(),
            reading: None,
        }
    }

    /// Attach a kana reading hint
    #[must_use]
    pub fn with_reading(mut self, reading: impl Into<String>) -> Self {
        self.reading = Some(reading.into());
        self
    }

    /// Reading hint, or an empty string when none was supplied
    pub fn reading_or_empty(&self) -> &str {
        self.reading.as_deref().unwrap_or_default()
    }
}

/// Result of a provider lookup that did not fail
///
/// `NoResults` is the provider's own statement that no audio exists for the
/// term, while `Empty` is a well-formed response that simply parsed to zero
/// records. Neither is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// One or more pronunciations, in provider order
    Found(Vec<Pronunciation>),
    /// The provider reports that no audio exists
    NoResults,
    /// The response was valid but contained no pronunciations
    Empty,
}

impl LookupOutcome {
    /// Wrap parsed records, mapping an empty list to [`LookupOutcome::Empty`]
    #[must_use]
    pub fn from_records(records: Vec<Pronunciation>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Found(records)
        }
    }

    /// Check whether any pronunciation was found
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Number of records carried by the outcome
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Check whether the outcome carries no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Borrow the records (empty for `NoResults` and `Empty`)
    #[must_use]
    pub fn records(&self) -> &[Pronunciation] {
        match self {
            Self::Found(records) => records,
            Self::NoResults | Self::Empty => &[],
        }
    }

    /// Take the records out of the outcome
    #[must_use]
    pub fn into_records(self) -> Vec<Pronunciation> {
        match self {
            Self::Found(records) => records,
            Self::NoResults | Self::Empty => Vec::new(),
        }
    }

    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NoResults => "no_results",
            Self::Empty => "empty",
        }
    }
}
