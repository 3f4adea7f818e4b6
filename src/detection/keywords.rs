//! Field-name keyword registry
//!
//! Keyword sets live in a TOML document embedded at build time, with an
//! optional override file for deployments that need extra terms.

use crate::domain::PiiKind;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Keyword set definition from TOML
#[derive(Debug, Deserialize)]
struct KeywordSet {
    terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordSets {
    name: KeywordSet,
    email: KeywordSet,
}

#[derive(Debug, Deserialize)]
struct KeywordLibrary {
    keywords: KeywordSets,
}

/// Signal produced by matching a field name against the keyword sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordSignal {
    /// Length of the longest NAME term found, 0 if none
    pub name_term_len: usize,
    /// Length of the longest EMAIL term found, 0 if none
    pub email_term_len: usize,
}

impl KeywordSignal {
    /// Resolve the signal to one kind
    ///
    /// When terms from both sets match, the longer matched term wins (so
    /// `contact_person` resolves NAME over the shorter `contact` EMAIL term);
    /// an exact tie resolves EMAIL, consistent with the classifier's overall
    /// email-first resolution.
    pub fn hit(&self) -> Option<PiiKind> {
        match (self.name_term_len, self.email_term_len) {
            (0, 0) => None,
            (n, e) if n > e => Some(PiiKind::Name),
            _ => Some(PiiKind::Email),
        }
    }
}

/// Curated keyword sets for NAME and EMAIL field names
#[derive(Debug)]
pub struct KeywordRegistry {
    name_terms: Vec<String>,
    email_terms: Vec<String>,
}

impl KeywordRegistry {
    /// Create a registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read keyword library: {}",
                path.as_ref().display()
            )
        })?;
        Self::from_toml(&content)
    }

    /// Create a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: KeywordLibrary =
            toml::from_str(content).context("Failed to parse keyword library TOML")?;

        Ok(Self {
            name_terms: Self::normalize_terms(library.keywords.name.terms),
            email_terms: Self::normalize_terms(library.keywords.email.terms),
        })
    }

    /// Create a registry with the built-in keyword sets
    pub fn default_terms() -> Result<Self> {
        let default_toml = include_str!("../../patterns/keywords.toml");
        Self::from_toml(default_toml)
    }

    fn normalize_terms(terms: Vec<String>) -> Vec<String> {
        terms
            .into_iter()
            .map(|t| normalize_field_name(&t))
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Match a field's terminal name segment against both keyword sets
    pub fn match_field(&self, field_name: &str) -> KeywordSignal {
        let normalized = normalize_field_name(field_name);
        KeywordSignal {
            name_term_len: longest_contained(&normalized, &self.name_terms),
            email_term_len: longest_contained(&normalized, &self.email_terms),
        }
    }
}

fn longest_contained(normalized: &str, terms: &[String]) -> usize {
    terms
        .iter()
        .filter(|term| normalized.contains(term.as_str()))
        .map(|term| term.len())
        .max()
        .unwrap_or(0)
}

/// Normalize a field name for keyword matching
///
/// Lower-cases and strips separator characters so `Contact-Email`,
/// `contact_email` and `contactEmail` all normalize identically.
pub fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("customer_name", Some(PiiKind::Name); "suffix name")]
    #[test_case("full_name", Some(PiiKind::Name); "full name")]
    #[test_case("author", Some(PiiKind::Name); "author")]
    #[test_case("reviewer_name", Some(PiiKind::Name); "reviewer name")]
    #[test_case("pessoa", Some(PiiKind::Name); "portuguese pessoa")]
    #[test_case("criador", Some(PiiKind::Name); "portuguese criador")]
    #[test_case("email", Some(PiiKind::Email); "plain email")]
    #[test_case("contact_email", Some(PiiKind::Email); "contact email")]
    #[test_case("correio", Some(PiiKind::Email); "portuguese correio")]
    #[test_case("mail", Some(PiiKind::Email); "mail")]
    #[test_case("amount", None; "amount is neither")]
    #[test_case("description", None; "description is neither")]
    fn test_match_field(field: &str, expected: Option<PiiKind>) {
        let registry = KeywordRegistry::default_terms().unwrap();
        assert_eq!(registry.match_field(field).hit(), expected);
    }

    #[test]
    fn test_contact_person_prefers_name() {
        let registry = KeywordRegistry::default_terms().unwrap();
        // "contactperson" contains both the EMAIL term "contact" and the
        // NAME term "contactperson"; the longer match wins.
        assert_eq!(
            registry.match_field("contact_person").hit(),
            Some(PiiKind::Name)
        );
    }

    #[test]
    fn test_normalization_strips_separators() {
        assert_eq!(normalize_field_name("Contact-Email"), "contactemail");
        assert_eq!(normalize_field_name("member name"), "membername");
    }

    #[test]
    fn test_custom_library() {
        let registry = KeywordRegistry::from_toml(
            r#"
            [keywords.name]
            terms = ["subscriber"]
            [keywords.email]
            terms = ["inbox"]
            "#,
        )
        .unwrap();
        assert_eq!(
            registry.match_field("subscriber").hit(),
            Some(PiiKind::Name)
        );
        assert_eq!(registry.match_field("inbox_addr").hit(), Some(PiiKind::Email));
        assert_eq!(registry.match_field("email").hit(), None);
    }
}
