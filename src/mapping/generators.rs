//! Fake value generators
//!
//! Pluggable generators behind [`FakeValueGenerator`]; the built-in ones wrap
//! the `fake` crate with English and Portuguese locales. Each generator owns
//! its RNG so the mapping cache can call it from a single guarded point, and
//! an explicit seed makes a run reproducible when the host needs it.

use fake::faker::internet::raw::SafeEmail;
use fake::faker::name::raw::Name;
use fake::locales::{EN, PT_BR};
use fake::Fake;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Output locale for generated person names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English naming conventions
    #[default]
    En,
    /// Portuguese naming conventions
    Pt,
}

/// Produces one fake value per call
///
/// Implementations must be able to produce an effectively unbounded number of
/// distinct values; uniqueness against already-issued values is enforced by
/// the mapping cache, not the generator.
pub trait FakeValueGenerator: Send + Sync {
    /// Generate a new candidate fake value
    fn generate(&self) -> String;
}

/// Person-name generator backed by the `fake` crate
pub struct PersonNameGenerator {
    locale: Locale,
    rng: Mutex<StdRng>,
}

impl PersonNameGenerator {
    /// Create a generator seeded from entropy
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a reproducible generator from an explicit seed
    pub fn with_seed(locale: Locale, seed: u64) -> Self {
        Self {
            locale,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl FakeValueGenerator for PersonNameGenerator {
    fn generate(&self) -> String {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match self.locale {
            Locale::En => Name(EN).fake_with_rng(&mut *rng),
            Locale::Pt => Name(PT_BR).fake_with_rng(&mut *rng),
        }
    }
}

/// Email generator backed by the `fake` crate
///
/// Produces addresses on reserved example domains so generated data can never
/// reach a real mailbox.
pub struct EmailAddressGenerator {
    rng: Mutex<StdRng>,
}

impl EmailAddressGenerator {
    /// Create a generator seeded from entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a reproducible generator from an explicit seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for EmailAddressGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeValueGenerator for EmailAddressGenerator {
    fn generate(&self) -> String {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        SafeEmail(EN).fake_with_rng(&mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::PatternValidators;

    #[test]
    fn test_name_generator_produces_nonempty_values() {
        let generator = PersonNameGenerator::new(Locale::Pt);
        for _ in 0..10 {
            assert!(!generator.generate().trim().is_empty());
        }
    }

    #[test]
    fn test_email_generator_produces_valid_addresses() {
        let validators = PatternValidators::new().unwrap();
        let generator = EmailAddressGenerator::new();
        for _ in 0..10 {
            let email = generator.generate();
            assert!(validators.is_valid_email(&email), "invalid email: {email}");
        }
    }

    #[test]
    fn test_seeded_generators_are_reproducible() {
        let a = PersonNameGenerator::with_seed(Locale::En, 7);
        let b = PersonNameGenerator::with_seed(Locale::En, 7);
        let left: Vec<String> = (0..5).map(|_| a.generate()).collect();
        let right: Vec<String> = (0..5).map(|_| b.generate()).collect();
        assert_eq!(left, right);
    }
}
