use serde::{Deserialize, Serialize};

/// One unit of raw text handed over by the OCR stage.
///
/// Accepts both the OCR output shape `{"text": "...", "confidence": 0.93}`
/// and a bare JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FragmentRepr")]
pub struct Fragment {
    pub text: String,

    /// Upstream recognition confidence. Not used for resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FragmentRepr {
    Bare(String),
    Scored {
        text: String,
        #[serde(default)]
        confidence: Option<f64>,
    },
}

impl From<FragmentRepr> for Fragment {
    fn from(repr: FragmentRepr) -> Self {
        match repr {
            FragmentRepr::Bare(text) => Fragment { text, confidence: None },
            FragmentRepr::Scored { text, confidence } => Fragment { text, confidence },
        }
    }
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }

    /// True when the OCR score is strictly above `threshold`. Unscored fragments pass.
    pub fn passes_confidence(&self, threshold: f64) -> bool {
        self.confidence.map_or(true, |c| c > threshold)
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::new(text)
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::new(text)
    }
}

/// How a fragment was resolved against the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The whole normalized fragment is a canonical name.
    Exact { name: String },
    /// A token of the fragment is within the typo tolerance of a name.
    Fuzzy {
        name: String,
        token: String,
        distance: usize,
    },
    NoMatch,
}

impl MatchOutcome {
    pub fn standard_name(&self) -> Option<&str> {
        match self {
            MatchOutcome::Exact { name } | MatchOutcome::Fuzzy { name, .. } => Some(name),
            MatchOutcome::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, MatchOutcome::NoMatch)
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MatchOutcome::Exact { .. })
    }

    /// Binary confidence: 1.0 for any match, 0.0 otherwise.
    pub fn confidence(&self) -> f64 {
        if self.is_match() {
            1.0
        } else {
            0.0
        }
    }
}

/// Per-fragment resolution result.
///
/// Only constructed from a [`MatchOutcome`], so `exact_match` implies
/// `is_medicine`, and `standard_name` is present exactly when `is_medicine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub original_text: String,
    pub is_medicine: bool,
    pub confidence: f64,
    pub standard_name: Option<String>,
    pub exact_match: bool,
    pub outcome: MatchOutcome,
}

impl ClassificationRecord {
    pub fn new(original_text: impl Into<String>, outcome: MatchOutcome) -> Self {
        Self {
            original_text: original_text.into(),
            is_medicine: outcome.is_match(),
            confidence: outcome.confidence(),
            standard_name: outcome.standard_name().map(str::to_string),
            exact_match: outcome.is_exact(),
            outcome,
        }
    }

    pub fn no_match(original_text: impl Into<String>) -> Self {
        Self::new(original_text, MatchOutcome::NoMatch)
    }
}
