//! Value Objects - Immutable, identity-less domain primitives

mod media_ref;
mod provider_kind;
mod query_normalizer;

pub use media_ref::MediaRef;
pub use provider_kind::ProviderKind;
pub use query_normalizer::QueryNormalizer;
