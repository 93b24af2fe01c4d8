//! Resolution Engine
//!
//! Classifies a batch of OCR fragments against one dictionary snapshot. Per
//! fragment:
//!
//! ```text
//! START -> EXACT_CHECK -> (MATCHED | FUZZY_CHECK) -> (MATCHED | NO_MATCH) -> DONE
//! ```
//!
//! The snapshot is loaded once per batch. A store failure at that point aborts
//! the batch; after it, classification cannot fail.

use crate::config::ResolverConfig;
use crate::db::{DictionarySnapshot, DictionaryStore};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::tokenizer::{normalize, tokenize};
use crate::types::{ClassificationRecord, Fragment, MatchOutcome};
use rayon::prelude::*;
use tracing::{debug, info};

pub struct ResolutionEngine<S: DictionaryStore> {
    store: S,
    matcher: Matcher,
}

/// Per-outcome counts for a resolved batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub exact: usize,
    pub fuzzy: usize,
    pub no_match: usize,
}

impl BatchStats {
    pub fn from_records(records: &[ClassificationRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut stats, record| {
                match record.outcome {
                    MatchOutcome::Exact { .. } => stats.exact += 1,
                    MatchOutcome::Fuzzy { .. } => stats.fuzzy += 1,
                    MatchOutcome::NoMatch => stats.no_match += 1,
                }
                stats
            })
    }
}

impl<S: DictionaryStore> ResolutionEngine<S> {
    pub fn new(store: S, config: &ResolverConfig) -> Self {
        Self {
            store,
            matcher: Matcher::from_config(config),
        }
    }

    pub fn with_matcher(store: S, matcher: Matcher) -> Self {
        Self { store, matcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Resolve a batch, one record per fragment in input order.
    pub fn resolve(&self, fragments: &[Fragment]) -> Result<Vec<ClassificationRecord>> {
        let snapshot = self.load_snapshot(fragments.len())?;
        let records: Vec<_> = fragments
            .iter()
            .map(|fragment| self.classify(&snapshot, &fragment.text))
            .collect();
        log_summary(&records);
        Ok(records)
    }

    /// Same as [`resolve`](Self::resolve) for plain strings.
    pub fn resolve_texts<T: AsRef<str>>(&self, texts: &[T]) -> Result<Vec<ClassificationRecord>> {
        let fragments: Vec<Fragment> = texts.iter().map(|t| Fragment::new(t.as_ref())).collect();
        self.resolve(&fragments)
    }

    /// Classify one fragment against an already loaded snapshot.
    pub fn classify(&self, snapshot: &DictionarySnapshot, text: &str) -> ClassificationRecord {
        let normalized = normalize(text);

        if let Some(exact) = self.matcher.exact(snapshot, &normalized) {
            return ClassificationRecord::new(text, exact);
        }

        let tokens = tokenize(&normalized);
        ClassificationRecord::new(text, self.matcher.fuzzy(snapshot, &tokens))
    }

    fn load_snapshot(&self, batch_len: usize) -> Result<DictionarySnapshot> {
        let snapshot = self.store.snapshot()?;
        debug!(
            "Resolving {} fragments against {} canonical names ({} mode)",
            batch_len,
            snapshot.len(),
            self.matcher.mode
        );
        Ok(snapshot)
    }
}

impl<S: DictionaryStore + Sync> ResolutionEngine<S> {
    /// Classify each fragment on the rayon pool. Output order matches input.
    pub fn resolve_parallel(&self, fragments: &[Fragment]) -> Result<Vec<ClassificationRecord>> {
        let snapshot = self.load_snapshot(fragments.len())?;
        let records: Vec<_> = fragments
            .par_iter()
            .map(|fragment| self.classify(&snapshot, &fragment.text))
            .collect();
        log_summary(&records);
        Ok(records)
    }
}

fn log_summary(records: &[ClassificationRecord]) {
    let stats = BatchStats::from_records(records);
    info!(
        "Resolved {} fragments: {} exact, {} fuzzy, {} no match",
        records.len(),
        stats.exact,
        stats.fuzzy,
        stats.no_match
    );
}
