//! Seed sources for the reference dictionary
//!
//! Seeding is an offline setup step. Every source yields normalized names in
//! source order; duplicates are left for the store to ignore.

use crate::error::Result;
use crate::tokenizer::normalize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Label marking a medicine name in labeled sample data.
pub const MED_NAME_LABEL: &str = "MED_NAME";

/// Built-in labeled samples used when no seed file is given.
pub const BUILTIN_SAMPLES: &[(&str, &str)] = &[
    ("Paracetamol", MED_NAME_LABEL),
    ("Ibuprofen", MED_NAME_LABEL),
    ("Amoxicillin", MED_NAME_LABEL),
    ("Metformin", MED_NAME_LABEL),
    ("Loratadine", MED_NAME_LABEL),
    ("Omeprazole", MED_NAME_LABEL),
    ("Simvastatin", MED_NAME_LABEL),
    ("Azithromycin", MED_NAME_LABEL),
    ("Diclofenac", MED_NAME_LABEL),
    ("Atorvastatin", MED_NAME_LABEL),
    ("Losartan", MED_NAME_LABEL),
    ("Amlodipine", MED_NAME_LABEL),
    ("Clopidogrel", MED_NAME_LABEL),
    ("Hydroxyzine", MED_NAME_LABEL),
    ("Doxycycline", MED_NAME_LABEL),
    ("Prednisone", MED_NAME_LABEL),
    ("Montelukast", MED_NAME_LABEL),
    ("Xyzmab", MED_NAME_LABEL),
    ("Cardiprene", MED_NAME_LABEL),
    ("Neurozol", MED_NAME_LABEL),
    ("Fluconazole", MED_NAME_LABEL),
    ("Ranitidine", MED_NAME_LABEL),
];

/// Counts reported after an insert-or-ignore seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    /// Names handed to the store
    pub offered: usize,
    /// Names that were not already present
    pub inserted: usize,
    /// Size of the store afterwards
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    BuiltIn,
    /// CSV with a `text,label` header; only `MED_NAME` rows are kept
    Csv(PathBuf),
    /// One name per line; blank lines and `#` comments are ignored
    Text(PathBuf),
}

#[derive(Debug, Deserialize)]
struct LabeledRow {
    text: String,
    label: String,
}

impl SeedSource {
    pub fn load(&self) -> Result<Vec<String>> {
        let names = match self {
            SeedSource::BuiltIn => labeled_names(
                BUILTIN_SAMPLES
                    .iter()
                    .map(|(text, label)| (text.to_string(), label.to_string())),
            ),
            SeedSource::Csv(path) => {
                let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
                let mut rows = Vec::new();
                for row in reader.deserialize::<LabeledRow>() {
                    let row = row?;
                    rows.push((row.text, row.label));
                }
                labeled_names(rows)
            }
            SeedSource::Text(path) => {
                let content = std::fs::read_to_string(path)?;
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(normalize)
                    .collect()
            }
        };

        debug!("Loaded {} seed names from {:?}", names.len(), self);
        Ok(names)
    }
}

fn labeled_names<I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    rows.into_iter()
        .filter(|(_, label)| label == MED_NAME_LABEL)
        .map(|(text, _)| normalize(&text))
        .filter(|name| !name.is_empty())
        .collect()
}
