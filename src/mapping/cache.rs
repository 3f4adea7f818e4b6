//! Mapping cache
//!
//! The consistency store behind every substitution: a (kind, normalized
//! original) key resolves to exactly one fake value for the lifetime of a
//! run, and a fake value, once issued, is never reused for a different key of
//! the same kind. One mutex guards the whole generate-or-fetch path, which is
//! all the locking concurrent record processing needs.

use crate::domain::PiiKind;
use crate::mapping::generators::FakeValueGenerator;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Generation attempts before falling back to a disambiguating suffix
pub const MAX_GENERATION_RETRIES: usize = 16;

/// Lookup key: kind plus the normalized original value
///
/// Normalization trims surrounding whitespace and case-folds so a free-text
/// span that case-differs from a structured value still resolves to the same
/// fake; the stored entry keeps the exact original for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingKey {
    kind: PiiKind,
    normalized: String,
}

impl MappingKey {
    /// Build a key from a raw original value
    pub fn new(kind: PiiKind, original: &str) -> Self {
        Self {
            kind,
            normalized: original.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone)]
struct MappingEntry {
    original: String,
    fake: String,
}

/// One original → fake mapping, as exported for host-driven seeding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedMapping {
    /// PII kind the mapping belongs to
    pub kind: PiiKind,
    /// Original value with exact casing preserved
    pub original: String,
    /// Fake value issued for it
    pub fake: String,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<MappingKey, MappingEntry>,
    issued: HashMap<PiiKind, HashSet<String>>,
}

/// Run-scoped consistency store mapping originals to fake values
///
/// Explicitly constructed and explicitly scoped to one run; never ambient
/// global state. Re-running produces a fresh fake identity set unless the
/// host deliberately [`seed`](Self::seed)s from a prior
/// [`export`](Self::export).
pub struct MappingCache {
    name_generator: Box<dyn FakeValueGenerator>,
    email_generator: Box<dyn FakeValueGenerator>,
    inner: Mutex<CacheInner>,
}

impl MappingCache {
    /// Create a cache over kind-appropriate generators
    pub fn new(
        name_generator: Box<dyn FakeValueGenerator>,
        email_generator: Box<dyn FakeValueGenerator>,
    ) -> Self {
        Self {
            name_generator,
            email_generator,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Resolve an original value to its fake, generating on first sight
    ///
    /// Blank originals pass through unchanged without consuming a cache slot.
    pub fn resolve(&self, kind: PiiKind, original: &str) -> String {
        if original.trim().is_empty() {
            return original.to_string();
        }

        let key = MappingKey::new(kind, original);
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(entry) = inner.entries.get(&key) {
            return entry.fake.clone();
        }

        let fake = self.generate_unique(&inner, kind);
        inner
            .issued
            .entry(kind)
            .or_default()
            .insert(fake.clone());
        inner.entries.insert(
            key,
            MappingEntry {
                original: original.trim().to_string(),
                fake: fake.clone(),
            },
        );
        fake
    }

    /// Number of mappings issued for a kind
    pub fn len(&self, kind: PiiKind) -> usize {
        let inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.issued.get(&kind).map_or(0, HashSet::len)
    }

    /// Whether no mappings have been issued yet
    pub fn is_empty(&self) -> bool {
        self.len(PiiKind::Name) == 0 && self.len(PiiKind::Email) == 0
    }

    /// Export every mapping, e.g. for a host that needs cross-run consistency
    pub fn export(&self) -> Vec<ExportedMapping> {
        let inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut mappings: Vec<ExportedMapping> = inner
            .entries
            .iter()
            .map(|(key, entry)| ExportedMapping {
                kind: key.kind,
                original: entry.original.clone(),
                fake: entry.fake.clone(),
            })
            .collect();
        mappings.sort_by(|a, b| (a.kind, &a.original).cmp(&(b.kind, &b.original)));
        mappings
    }

    /// Preload mappings from a prior export; existing keys are kept
    pub fn seed<I>(&self, mappings: I)
    where
        I: IntoIterator<Item = ExportedMapping>,
    {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for mapping in mappings {
            if mapping.original.trim().is_empty() || mapping.fake.is_empty() {
                continue;
            }
            let key = MappingKey::new(mapping.kind, &mapping.original);
            if inner.entries.contains_key(&key) {
                continue;
            }
            inner
                .issued
                .entry(mapping.kind)
                .or_default()
                .insert(mapping.fake.clone());
            inner.entries.insert(
                key,
                MappingEntry {
                    original: mapping.original.trim().to_string(),
                    fake: mapping.fake,
                },
            );
        }
    }

    /// A bounded sample of mappings for one kind, ordered by original value
    pub fn sample(&self, kind: PiiKind, limit: usize) -> Vec<ExportedMapping> {
        let mut mappings: Vec<ExportedMapping> = self
            .export()
            .into_iter()
            .filter(|m| m.kind == kind)
            .collect();
        mappings.truncate(limit);
        mappings
    }

    fn generate_unique(&self, inner: &CacheInner, kind: PiiKind) -> String {
        let generator = match kind {
            PiiKind::Name => &self.name_generator,
            PiiKind::Email => &self.email_generator,
        };
        let issued = inner.issued.get(&kind);
        let taken = |candidate: &str| issued.is_some_and(|set| set.contains(candidate));

        let mut last = String::new();
        for _ in 0..MAX_GENERATION_RETRIES {
            let candidate = generator.generate();
            if !taken(&candidate) {
                return candidate;
            }
            last = candidate;
        }

        // Retries exhausted: suffix the last candidate instead of failing.
        let mut attempt = 2usize;
        loop {
            let candidate = disambiguate(kind, &last, attempt);
            if !taken(&candidate) {
                return candidate;
            }
            attempt += 1;
        }
    }
}

/// Append a kind-appropriate disambiguating suffix
///
/// Keeps emails syntactically valid by suffixing the local part.
fn disambiguate(kind: PiiKind, base: &str, attempt: usize) -> String {
    match kind {
        PiiKind::Email => match base.split_once('@') {
            Some((local, domain)) => format!("{local}{attempt}@{domain}"),
            None => format!("{base}{attempt}"),
        },
        PiiKind::Name => format!("{base} {attempt}"),
    }
}
