//! Resolver configuration
//!
//! Values come from defaults, then from the environment (a `.env` file is
//! honoured by the binary through `dotenv`), then from CLI flags.

use crate::error::{ResolveError, Result};
use crate::matcher::MatchMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "MEDID_DB_PATH";
pub const ENV_MAX_TYPO_TOLERANCE: &str = "MEDID_MAX_TYPO_TOLERANCE";
pub const ENV_MIN_TOKEN_LEN: &str = "MEDID_MIN_TOKEN_LEN";
pub const ENV_MATCH_MODE: &str = "MEDID_MATCH_MODE";
pub const ENV_FUZZY_BUDGET_MS: &str = "MEDID_FUZZY_BUDGET_MS";
pub const ENV_STORE_OPEN_ATTEMPTS: &str = "MEDID_STORE_OPEN_ATTEMPTS";

pub const DEFAULT_DB_PATH: &str = "meds_db.sqlite";
pub const DEFAULT_MAX_TYPO_TOLERANCE: usize = 2;
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;
pub const DEFAULT_STORE_OPEN_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// SQLite file holding the reference dictionary
    pub db_path: PathBuf,

    /// Largest edit distance still accepted as a fuzzy match
    pub max_distance: usize,

    /// Tokens at or below this many characters never enter the fuzzy stage
    pub min_token_len: usize,

    pub mode: MatchMode,

    /// Per-fragment time budget for the fuzzy stage; `None` means unbounded
    pub fuzzy_budget: Option<Duration>,

    /// Connection attempts before the store is reported unavailable
    pub store_open_attempts: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            max_distance: DEFAULT_MAX_TYPO_TOLERANCE,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            mode: MatchMode::First,
            fuzzy_budget: None,
            store_open_attempts: DEFAULT_STORE_OPEN_ATTEMPTS,
        }
    }
}

impl ResolverConfig {
    /// Build a config from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep their
    /// defaults; set but unparsable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_MAX_TYPO_TOLERANCE) {
            config.max_distance = parse_value(ENV_MAX_TYPO_TOLERANCE, &value)?;
        }
        if let Some(value) = lookup(ENV_MIN_TOKEN_LEN) {
            config.min_token_len = parse_value(ENV_MIN_TOKEN_LEN, &value)?;
        }
        if let Some(value) = lookup(ENV_MATCH_MODE) {
            config.mode = parse_value(ENV_MATCH_MODE, &value)?;
        }
        if let Some(value) = lookup(ENV_FUZZY_BUDGET_MS) {
            let millis: u64 = parse_value(ENV_FUZZY_BUDGET_MS, &value)?;
            config.fuzzy_budget = Some(Duration::from_millis(millis));
        }
        if let Some(value) = lookup(ENV_STORE_OPEN_ATTEMPTS) {
            config.store_open_attempts = parse_value(ENV_STORE_OPEN_ATTEMPTS, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_distance == 0 {
            return Err(ResolveError::Config(
                "max typo tolerance must be at least 1".to_string(),
            ));
        }
        if self.store_open_attempts == 0 {
            return Err(ResolveError::Config(
                "store open attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ResolveError::Config(format!("invalid value {:?} for {}: {}", raw, key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = ResolverConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.max_distance, 2);
        assert_eq!(config.min_token_len, 3);
        assert_eq!(config.mode, MatchMode::First);
        assert!(config.fuzzy_budget.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ResolverConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/meds.sqlite"),
            (ENV_MAX_TYPO_TOLERANCE, "1"),
            (ENV_MIN_TOKEN_LEN, " 4 "),
            (ENV_MATCH_MODE, "best"),
            (ENV_FUZZY_BUDGET_MS, "50"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/meds.sqlite"));
        assert_eq!(config.max_distance, 1);
        assert_eq!(config.min_token_len, 4);
        assert_eq!(config.mode, MatchMode::Best);
        assert_eq!(config.fuzzy_budget, Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = ResolverConfig::from_lookup(lookup_from(&[(ENV_MIN_TOKEN_LEN, "three")]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Config(_)));

        let err = ResolverConfig::from_lookup(lookup_from(&[(ENV_MATCH_MODE, "closest")]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Config(_)));

        let err = ResolverConfig::from_lookup(lookup_from(&[(ENV_MAX_TYPO_TOLERANCE, "0")]))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Config(_)));
    }
}
