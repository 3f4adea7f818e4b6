//! Value mapping
//!
//! The run-scoped consistency cache and the fake value generators it draws
//! from.

pub mod cache;
pub mod generators;

pub use cache::{ExportedMapping, MappingCache, MappingKey, MAX_GENERATION_RETRIES};
pub use generators::{
    EmailAddressGenerator, FakeValueGenerator, Locale, PersonNameGenerator,
};
