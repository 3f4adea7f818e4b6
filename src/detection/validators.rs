//! Pattern validators
//!
//! Pure structural checks answering "does this value look like an email" /
//! "does this value look like a person name", plus the tokenizer shared by
//! the free-text heuristics. No state beyond compiled patterns.

use crate::domain::{PiiKind, SpanOrigin, TextSpan};
use anyhow::{Context, Result};
use regex::Regex;

/// Email syntax pattern, matched against whole values and text substrings
pub const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

/// Shortest name-like token the heuristics will accept
const MIN_NAME_TOKEN_CHARS: usize = 2;

/// Capitalized tokens that never start or join a heuristic name run
///
/// Sentence-initial function words and salutation lead-ins (English and
/// Portuguese) that otherwise look like name tokens.
const NAME_RUN_STOPWORDS: &[&str] = &[
    "the", "this", "that", "these", "those", "and", "but", "for", "with", "from", "dear",
    "hello", "thanks", "regards", "please", "contact", "article", "review", "reviewed",
    "approved", "plano", "artigo", "contacte", "contato", "caro", "cara", "prezado",
    "prezada", "cumprimentos", "obrigado", "obrigada", "aprovado", "revisto",
];

/// A token located inside a larger text
#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub start: usize,
    pub end: usize,
}

/// Compiled pattern validators for whole-value and in-text matching
#[derive(Debug)]
pub struct PatternValidators {
    email_exact: Regex,
    email_search: Regex,
}

impl PatternValidators {
    /// Compile the validator patterns
    pub fn new() -> Result<Self> {
        let email_exact = Regex::new(&format!("^(?:{EMAIL_PATTERN})$"))
            .context("Failed to compile anchored email pattern")?;
        let email_search =
            Regex::new(EMAIL_PATTERN).context("Failed to compile email search pattern")?;
        Ok(Self {
            email_exact,
            email_search,
        })
    }

    /// Whether a whole value is a syntactically valid email address
    pub fn is_valid_email(&self, value: &str) -> bool {
        self.email_exact.is_match(value.trim())
    }

    /// Collect every email substring in a text as EMAIL spans
    pub fn email_spans(&self, text: &str) -> Vec<TextSpan> {
        self.email_search
            .find_iter(text)
            .map(|m| TextSpan {
                start: m.start(),
                end: m.end(),
                kind: PiiKind::Email,
                origin: SpanOrigin::Pattern,
                text: m.as_str().to_string(),
            })
            .collect()
    }
}

/// Structural whole-value person-name heuristic
///
/// Accepts 2–4 whitespace-separated tokens, each starting with an uppercase
/// letter, with no digits anywhere in the value.
pub fn looks_like_person_name(value: &str) -> bool {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if !(2..=4).contains(&tokens.len()) {
        return false;
    }
    tokens.iter().all(|token| {
        let mut chars = token.chars();
        let leading_upper = chars.next().is_some_and(|c| c.is_uppercase());
        leading_upper
            && token
                .chars()
                .all(|c| c.is_alphabetic() || matches!(c, '-' | '\'' | '.'))
    })
}

/// Tokenize a text into alphabetic word tokens with byte offsets
pub(crate) fn scan_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        let word_char = ch.is_alphabetic() || matches!(ch, '-' | '\'');
        match (word_char, start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                tokens.push(Token { start: s, end: idx });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            start: s,
            end: text.len(),
        });
    }
    tokens
}

fn is_name_token(text: &str, token: Token) -> bool {
    let word = &text[token.start..token.end];
    if word.chars().count() < MIN_NAME_TOKEN_CHARS {
        return false;
    }
    let mut chars = word.chars();
    if !chars.next().is_some_and(|c| c.is_uppercase()) {
        return false;
    }
    !NAME_RUN_STOPWORDS.contains(&word.to_lowercase().as_str())
}

fn joins_previous(text: &str, prev: Token, next: Token) -> bool {
    let gap = &text[prev.end..next.start];
    !gap.is_empty() && !gap.contains('\n') && gap.chars().all(char::is_whitespace)
}

/// Locate runs of 2–4 consecutive capitalized tokens in free text
///
/// Runs longer than four tokens are not flagged; all-capitalized headlines
/// produce them and the recognizer can still tag true names inside.
pub fn name_token_runs(text: &str) -> Vec<(usize, usize)> {
    let tokens = scan_tokens(text);
    let mut runs = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    let mut flush = |run: &mut Vec<Token>| {
        if (2..=4).contains(&run.len()) {
            // run is non-empty here, guarded by the length check
            if let (Some(first), Some(last)) = (run.first(), run.last()) {
                runs.push((first.start, last.end));
            }
        }
        run.clear();
    };

    for token in tokens {
        let joins = match current.last() {
            Some(&prev) => joins_previous(text, prev, token),
            None => true,
        };
        if is_name_token(text, token) && joins {
            current.push(token);
        } else {
            flush(&mut current);
            if is_name_token(text, token) {
                current.push(token);
            }
        }
    }
    flush(&mut current);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("test@example.com", true; "plain address")]
    #[test_case("user.name+tag@domain.pt", true; "plus tag")]
    #[test_case("  padded@example.org  ", true; "surrounding whitespace trimmed")]
    #[test_case("notanemail", false; "missing at sign")]
    #[test_case("user@nodomain", false; "missing tld")]
    #[test_case("", false; "empty")]
    fn test_is_valid_email(value: &str, expected: bool) {
        let validators = PatternValidators::new().unwrap();
        assert_eq!(validators.is_valid_email(value), expected);
    }

    #[test]
    fn test_email_spans_in_text() {
        let validators = PatternValidators::new().unwrap();
        let text = "Reach joao@example.com or maria.santos@blog.pt today";
        let spans = validators.email_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "joao@example.com");
        assert_eq!(spans[1].text, "maria.santos@blog.pt");
        assert_eq!(&text[spans[1].start..spans[1].end], "maria.santos@blog.pt");
    }

    #[test]
    fn test_email_span_excludes_trailing_period() {
        let validators = PatternValidators::new().unwrap();
        let spans = validators.email_spans("Write to joao@example.com.");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "joao@example.com");
    }

    #[test_case("João Silva", true; "two tokens accented")]
    #[test_case("Maria José Santos", true; "three tokens")]
    #[test_case("José Luís Ferreira Dias", true; "four tokens")]
    #[test_case("Madonna", false; "single token")]
    #[test_case("One Two Three Four Five", false; "five tokens")]
    #[test_case("john smith", false; "lowercase")]
    #[test_case("Agent 007", false; "digits")]
    #[test_case("This is a description", false; "prose")]
    fn test_looks_like_person_name(value: &str, expected: bool) {
        assert_eq!(looks_like_person_name(value), expected);
    }

    #[test]
    fn test_name_token_runs_basic() {
        let text = "Plano revisto por João Silva e aprovado por Maria Santos";
        let runs = name_token_runs(text);
        let found: Vec<&str> = runs.iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(found, vec!["João Silva", "Maria Santos"]);
    }

    #[test]
    fn test_name_token_runs_skip_stopword_lead_in() {
        let text = "Contact João Silva for details";
        let runs = name_token_runs(text);
        let found: Vec<&str> = runs.iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(found, vec!["João Silva"]);
    }

    #[test]
    fn test_name_token_runs_ignore_long_headline() {
        let text = "Quarterly Revenue Report Summary Draft Edition";
        assert!(name_token_runs(text).is_empty());
    }

    #[test]
    fn test_name_token_runs_break_on_newline() {
        let text = "Maria\nSantos";
        assert!(name_token_runs(text).is_empty());
    }
}
