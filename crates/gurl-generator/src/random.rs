use crate::Generator;
use gurl_core::key::SEPARATOR;
use gurl_core::{LinkSettings, ShortKey};
use rand::Rng;
use typed_builder::TypedBuilder;

/// The 62 URL-safe symbols keys are drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws `length` characters uniformly from [`ALPHABET`], inserting a
/// [`SEPARATOR`] before every `separator_every`-th character.
///
/// The separator never lands at the first or last position, so the output
/// is `length + (length - 1) / separator_every` characters long. A
/// `separator_every` of zero disables separators.
pub fn generate_key<R: Rng + ?Sized>(rng: &mut R, length: usize, separator_every: usize) -> String {
    let separators = match (length, separator_every) {
        (0, _) | (_, 0) => 0,
        _ => (length - 1) / separator_every,
    };
    let mut key = String::with_capacity(length + separators);

    for position in 0..length {
        if separator_every != 0 && position != 0 && position % separator_every == 0 {
            key.push(SEPARATOR);
        }
        key.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char);
    }

    key
}

/// Random key generator backed by the thread-local CSPRNG.
///
/// `rand::rng()` is seeded from the operating system and periodically
/// reseeded, so generated keys are not predictable from earlier ones.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RandomKeyGenerator {
    #[builder(default = 10)]
    length: usize,
    #[builder(default = 5)]
    separator_every: usize,
}

impl RandomKeyGenerator {
    pub fn new(length: usize, separator_every: usize) -> Self {
        Self {
            length,
            separator_every,
        }
    }

    pub fn from_settings(settings: &LinkSettings) -> Self {
        Self::new(settings.key_length, settings.separator_every)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn separator_every(&self) -> usize {
        self.separator_every
    }
}

impl Generator for RandomKeyGenerator {
    fn generate(&self) -> ShortKey {
        let key = generate_key(&mut rand::rng(), self.length, self.separator_every);
        ShortKey::new_unchecked(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn assert_shape(key: &str, length: usize, separator_every: usize) {
        let chars: Vec<char> = key.chars().collect();
        let separators = chars.iter().filter(|&&c| c == SEPARATOR).count();
        let expected_separators = (length - 1) / separator_every;

        assert_eq!(separators, expected_separators, "key {key:?}");
        assert_eq!(chars.len(), length + expected_separators, "key {key:?}");
        assert_ne!(chars.first(), Some(&SEPARATOR), "key {key:?}");
        assert_ne!(chars.last(), Some(&SEPARATOR), "key {key:?}");
        assert!(
            chars
                .iter()
                .all(|c| *c == SEPARATOR || ALPHABET.contains(&(*c as u8))),
            "key {key:?}"
        );
    }

    #[test]
    fn output_shape_holds_for_all_small_configs() {
        let mut rng = StdRng::seed_from_u64(7);

        for length in 1..=40 {
            for separator_every in 1..=12 {
                let key = generate_key(&mut rng, length, separator_every);
                assert_shape(&key, length, separator_every);
            }
        }
    }

    #[test]
    fn separators_land_on_configured_boundaries() {
        let mut rng = StdRng::seed_from_u64(42);
        let key = generate_key(&mut rng, 10, 5);

        assert_eq!(key.len(), 11);
        assert_eq!(key.find(SEPARATOR), Some(5));
    }

    #[test]
    fn exact_multiple_does_not_end_in_separator() {
        let mut rng = StdRng::seed_from_u64(1);
        let key = generate_key(&mut rng, 15, 5);

        // two separators, not three
        assert_eq!(key.matches(SEPARATOR).count(), 2);
        assert!(!key.ends_with(SEPARATOR));
    }

    #[test]
    fn zero_separator_frequency_disables_separators() {
        let mut rng = StdRng::seed_from_u64(3);
        let key = generate_key(&mut rng, 8, 0);

        assert_eq!(key.len(), 8);
        assert!(!key.contains(SEPARATOR));
    }

    #[test]
    fn random_generator_produces_valid_keys() {
        let generator = RandomKeyGenerator::from_settings(&LinkSettings::default());

        let key = generator.generate();

        assert!(ShortKey::new(key.as_str()).is_ok());
        assert_shape(key.as_str(), 10, 5);
    }

    #[test]
    fn random_generator_rarely_repeats() {
        let generator = RandomKeyGenerator::builder().length(10).build();

        let keys: HashSet<_> = (0..1_000).map(|_| generator.generate()).collect();

        assert_eq!(keys.len(), 1_000);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomKeyGenerator>();
    }
}
