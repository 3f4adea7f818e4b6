//! PII detection
//!
//! Keyword registry, pattern validators, the entity recognizer boundary and
//! the field classifier that combines them.

pub mod classifier;
pub mod keywords;
pub mod recognizer;
pub mod validators;

pub use classifier::{ClassifierThresholds, FieldClassifier};
pub use keywords::{KeywordRegistry, KeywordSignal};
pub use recognizer::{EntityRecognizer, LexiconRecognizer, PersonSpan};
pub use validators::{looks_like_person_name, name_token_runs, PatternValidators};
