//! Word-level matching against the reference dictionary
//!
//! Two stages:
//! 1. Exact: the normalized word is a canonical name.
//! 2. Fuzzy: a token longer than the minimum length is within
//!    `1..=max_distance` Levenshtein edits of a canonical name.
//!
//! In [`MatchMode::First`] tokens are scanned left to right and, for each
//! token, names in dictionary load order; the first qualifying pair wins.
//! [`MatchMode::Best`] keeps scanning and returns the smallest distance,
//! breaking ties by that same scan order.

use crate::config::{ResolverConfig, DEFAULT_MAX_TYPO_TOLERANCE, DEFAULT_MIN_TOKEN_LEN};
use crate::db::DictionarySnapshot;
use crate::error::ResolveError;
use crate::tokenizer::{char_len, normalize};
use crate::types::MatchOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use strsim::levenshtein;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// First qualifying token/name pair in scan order.
    #[default]
    First,
    /// Closest qualifying pair across all tokens and names.
    Best,
}

impl FromStr for MatchMode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(MatchMode::First),
            "best" => Ok(MatchMode::Best),
            other => Err(ResolveError::Config(format!(
                "unknown match mode '{}', expected 'first' or 'best'",
                other
            ))),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::First => write!(f, "first"),
            MatchMode::Best => write!(f, "best"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Matcher {
    pub max_distance: usize,
    pub min_token_len: usize,
    pub mode: MatchMode,
    pub budget: Option<Duration>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_TYPO_TOLERANCE,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            mode: MatchMode::First,
            budget: None,
        }
    }
}

/// Candidate produced while scanning, referencing the snapshot's names.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    token: &'a str,
    name: &'a str,
    distance: usize,
}

impl Matcher {
    pub fn new(max_distance: usize, min_token_len: usize) -> Self {
        Self {
            max_distance,
            min_token_len,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            max_distance: config.max_distance,
            min_token_len: config.min_token_len,
            mode: config.mode,
            budget: config.fuzzy_budget,
        }
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Exact stage. Returns `None` when the word is not a canonical name.
    pub fn exact(&self, snapshot: &DictionarySnapshot, word: &str) -> Option<MatchOutcome> {
        snapshot
            .exact_lookup(&normalize(word))
            .map(|name| MatchOutcome::Exact {
                name: name.to_string(),
            })
    }

    /// Whether a token is long enough to enter the fuzzy stage.
    pub fn is_candidate_token(&self, token: &str) -> bool {
        char_len(token) > self.min_token_len
    }

    /// Edit distance between `token` and `name` if it falls inside
    /// `1..=max_distance`.
    pub fn bounded_distance(&self, token: &str, name: &str) -> Option<usize> {
        // Edit distance is at least the length difference.
        if char_len(token).abs_diff(char_len(name)) > self.max_distance {
            return None;
        }
        let distance = levenshtein(token, name);
        (distance > 0 && distance <= self.max_distance).then_some(distance)
    }

    /// Fuzzy stage over already-tokenized, normalized words.
    pub fn fuzzy(&self, snapshot: &DictionarySnapshot, tokens: &[&str]) -> MatchOutcome {
        let deadline = self.budget.map(|budget| Instant::now() + budget);
        let mut best: Option<Candidate<'_>> = None;

        for &token in tokens.iter().filter(|t| self.is_candidate_token(t)) {
            for name in snapshot.names() {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    warn!(
                        "Fuzzy match budget of {:?} exhausted at token '{}', treating fragment as no match",
                        self.budget.unwrap_or_default(),
                        token
                    );
                    return MatchOutcome::NoMatch;
                }

                let Some(distance) = self.bounded_distance(token, name) else {
                    continue;
                };
                let candidate = Candidate {
                    token,
                    name,
                    distance,
                };

                match self.mode {
                    MatchMode::First => return candidate.into_outcome(),
                    MatchMode::Best => {
                        if best.map_or(true, |b| distance < b.distance) {
                            best = Some(candidate);
                        }
                        if distance == 1 {
                            return candidate.into_outcome();
                        }
                    }
                }
            }
        }

        best.map_or(MatchOutcome::NoMatch, Candidate::into_outcome)
    }
}

impl Candidate<'_> {
    fn into_outcome(self) -> MatchOutcome {
        MatchOutcome::Fuzzy {
            name: self.name.to_string(),
            token: self.token.to_string(),
            distance: self.distance,
        }
    }
}
