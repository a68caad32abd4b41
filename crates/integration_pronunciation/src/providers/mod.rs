//! Concrete pronunciation providers

pub mod japanesepod101;
pub mod japanesepod101_alt;
pub mod krdict;
pub mod naver;
pub mod shtooka;

use domain::{DomainError, Pronunciation, ProviderKind};
use tracing::warn;

/// Keep a parsed record, logging and dropping rows that violate record invariants
pub(crate) fn push_record(
    records: &mut Vec<Pronunciation>,
    provider: ProviderKind,
    record: Result<Pronunciation, DomainError>,
) {
    match record {
        Ok(record) => records.push(record),
        Err(e) => warn!(provider = %provider, error = %e, "Skipping malformed pronunciation"),
    }
}

/// Append an encoded parameter list to an endpoint that may already carry a query
pub(crate) fn with_query(endpoint: &str, query: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}{query}")
}
