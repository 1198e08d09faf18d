pub mod random;
pub mod seq;

use gurl_core::ShortKey;

pub use random::{generate_key, RandomKeyGenerator, ALPHABET};
pub use seq::SeqGenerator;

/// Trait for generating short keys.
///
/// Implementations are pure generators that don't interact with storage.
/// They do not guarantee uniqueness; the store checks every candidate
/// against existing keys before writing it.
pub trait Generator: Send + Sync + 'static {
    /// Produces a candidate key.
    fn generate(&self) -> ShortKey;
}
