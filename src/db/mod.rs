//! Reference dictionary storage
//!
//! Canonical medicine names live in a store that is seeded once and read many
//! times. Resolution only ever reads it, through [`DictionaryStore`].

pub mod memory;
pub mod seed;
pub mod snapshot;
pub mod sqlite;

pub use memory::InMemoryDictionaryStore;
pub use seed::{SeedSource, SeedSummary, BUILTIN_SAMPLES, MED_NAME_LABEL};
pub use snapshot::DictionarySnapshot;
pub use sqlite::SqliteDictionaryStore;

use crate::error::Result;

/// Read access to canonical names.
///
/// `load_all` must return names in a fixed order across calls; first-match
/// resolution depends on it.
pub trait DictionaryStore {
    /// Every stored name, normalized, in store order.
    fn load_all(&self) -> Result<Vec<String>>;

    /// Equality lookup on a normalized key.
    fn exact_lookup(&self, normalized_word: &str) -> Result<Option<String>>;

    /// Load an immutable snapshot for one resolution batch.
    fn snapshot(&self) -> Result<DictionarySnapshot> {
        Ok(DictionarySnapshot::new(self.load_all()?))
    }
}

impl<S: DictionaryStore + ?Sized> DictionaryStore for &S {
    fn load_all(&self) -> Result<Vec<String>> {
        (**self).load_all()
    }

    fn exact_lookup(&self, normalized_word: &str) -> Result<Option<String>> {
        (**self).exact_lookup(normalized_word)
    }
}
