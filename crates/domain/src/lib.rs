//! Domain layer for pronunciation retrieval
//!
//! Contains the uniform pronunciation record, query normalization and the
//! identifiers shared by every provider integration.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
