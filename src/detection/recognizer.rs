//! Entity recognizer boundary
//!
//! The engine consumes any `tag_persons` implementation behind the
//! [`EntityRecognizer`] trait; a host can plug a full NLP model here. The
//! built-in [`LexiconRecognizer`] anchors spans on a given-name lexicon and is
//! deliberately modest: when no recognizer is available at all, detection
//! degrades to the structural heuristics and the run records the degraded
//! mode instead of failing.

use crate::detection::validators::{scan_tokens, Token};
use anyhow::Result;
use std::collections::HashSet;

/// Longest span the lexicon recognizer will extend to, in tokens
const MAX_PERSON_SPAN_TOKENS: usize = 4;

/// Common given names anchoring the lexicon recognizer (English + Portuguese)
const GIVEN_NAMES: &[&str] = &[
    // Portuguese
    "joão", "joao", "maria", "pedro", "ana", "josé", "jose", "antónio", "antonio", "francisco",
    "carlos", "paulo", "luís", "luis", "miguel", "rui", "tiago", "sofia", "inês", "ines",
    "beatriz", "catarina", "mariana", "ricardo", "bruno", "andré", "andre", "nuno", "diogo",
    "teresa", "isabel", "manuel", "joaquim", "fernanda", "helena", "rita", "sara", "vasco",
    // English
    "john", "jane", "mary", "james", "robert", "michael", "william", "david", "richard",
    "thomas", "charles", "george", "edward", "henry", "peter", "paul", "mark", "andrew",
    "patricia", "jennifer", "linda", "elizabeth", "susan", "margaret", "sarah", "karen",
    "emma", "olivia", "alice", "laura", "anna", "emily", "grace", "lucy",
];

/// A PERSON-tagged span located in free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSpan {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// The tagged substring
    pub text: String,
}

/// Tags PERSON-type spans in prose
///
/// Implementations are stateless per call and loaded once at process start.
/// The engine treats the recognizer as optional: absence or a per-call error
/// degrades NAME detection rather than failing the run.
pub trait EntityRecognizer: Send + Sync {
    /// Locate every PERSON span in the given text
    fn tag_persons(&self, text: &str) -> Result<Vec<PersonSpan>>;
}

/// Dictionary-backed recognizer
///
/// A span starts at a capitalized token whose lower-cased form is in the
/// given-name lexicon and extends over following capitalized tokens, up to
/// four tokens total.
pub struct LexiconRecognizer {
    given_names: HashSet<String>,
}

impl LexiconRecognizer {
    /// Create a recognizer with the built-in EN/PT given-name lexicon
    pub fn new() -> Self {
        Self {
            given_names: GIVEN_NAMES.iter().map(|n| (*n).to_string()).collect(),
        }
    }

    /// Create a recognizer over a custom lexicon of given names
    pub fn with_lexicon<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            given_names: names
                .into_iter()
                .map(|n| n.into().to_lowercase())
                .collect(),
        }
    }

    fn is_capitalized(text: &str, token: Token) -> bool {
        text[token.start..token.end]
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase())
    }

    fn is_given_name(&self, text: &str, token: Token) -> bool {
        Self::is_capitalized(text, token)
            && self
                .given_names
                .contains(&text[token.start..token.end].to_lowercase())
    }

    fn adjacent(text: &str, prev: Token, next: Token) -> bool {
        let gap = &text[prev.end..next.start];
        !gap.is_empty() && !gap.contains('\n') && gap.chars().all(char::is_whitespace)
    }
}

impl Default for LexiconRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRecognizer for LexiconRecognizer {
    fn tag_persons(&self, text: &str) -> Result<Vec<PersonSpan>> {
        let tokens = scan_tokens(text);
        let mut spans = Vec::new();
        let mut idx = 0;

        while idx < tokens.len() {
            let anchor = tokens[idx];
            if !self.is_given_name(text, anchor) {
                idx += 1;
                continue;
            }

            let mut last = anchor;
            let mut consumed = 1;
            while idx + consumed < tokens.len() && consumed < MAX_PERSON_SPAN_TOKENS {
                let next = tokens[idx + consumed];
                if Self::is_capitalized(text, next) && Self::adjacent(text, last, next) {
                    last = next;
                    consumed += 1;
                } else {
                    break;
                }
            }

            spans.push(PersonSpan {
                start: anchor.start,
                end: last.end,
                text: text[anchor.start..last.end].to_string(),
            });
            idx += consumed;
        }

        Ok(spans)
    }
}
