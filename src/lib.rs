pub mod config;
pub mod db;
pub mod error;
pub mod matcher;
pub mod report;
pub mod resolution;
pub mod tokenizer;
pub mod types;

pub use config::ResolverConfig;
pub use db::{DictionarySnapshot, DictionaryStore, InMemoryDictionaryStore, SqliteDictionaryStore};
pub use error::{ResolveError, Result};
pub use matcher::{MatchMode, Matcher};
pub use resolution::{BatchStats, ResolutionEngine};
pub use types::{ClassificationRecord, Fragment, MatchOutcome};
