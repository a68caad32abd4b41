//! Domain entities - Objects with identity and lifecycle

mod pronunciation;

pub use pronunciation::{AudioSource, Pronunciation};
