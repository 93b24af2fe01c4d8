use super::{DictionaryStore, SeedSummary};
use crate::error::Result;
use crate::tokenizer::normalize;
use std::collections::HashSet;

/// Dictionary kept entirely in memory, in insertion order.
///
/// Used for flat seed files that are reloaded on every start and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDictionaryStore {
    names: Vec<String>,
    index: HashSet<String>,
}

impl InMemoryDictionaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        store.seed(names);
        store
    }

    /// Insert a name, ignoring blanks and duplicates. Returns whether it was new.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = normalize(name);
        if name.is_empty() || self.index.contains(&name) {
            return false;
        }
        self.index.insert(name.clone());
        self.names.push(name);
        true
    }

    /// Insert-or-ignore every name. Blank names are not counted as offered.
    pub fn seed<I, S>(&mut self, names: I) -> SeedSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = SeedSummary::default();
        for name in names {
            if normalize(name.as_ref()).is_empty() {
                continue;
            }
            summary.offered += 1;
            if self.insert(name.as_ref()) {
                summary.inserted += 1;
            }
        }
        summary.total = self.names.len();
        summary
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl DictionaryStore for InMemoryDictionaryStore {
    fn load_all(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }

    fn exact_lookup(&self, normalized_word: &str) -> Result<Option<String>> {
        Ok(self.index.get(normalized_word).cloned())
    }
}
