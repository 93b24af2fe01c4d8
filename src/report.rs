//! Plain-text rendering of resolved batches for the CLI

use crate::resolution::BatchStats;
use crate::types::{ClassificationRecord, MatchOutcome};
use itertools::Itertools;

pub fn verdict(record: &ClassificationRecord) -> &'static str {
    match record.outcome {
        MatchOutcome::Exact { .. } => "EXACT MATCH",
        MatchOutcome::Fuzzy { .. } => "FUZZY WARNING",
        MatchOutcome::NoMatch => "NOT MEDICINE",
    }
}

pub fn render_line(record: &ClassificationRecord) -> String {
    let corrected = match &record.outcome {
        MatchOutcome::Exact { name } => name.clone(),
        MatchOutcome::Fuzzy { name, distance, .. } => format!("{} (distance {})", name, distance),
        MatchOutcome::NoMatch => "-".to_string(),
    };
    format!(
        "{:^15} | {:<30} -> {}",
        verdict(record),
        format!("'{}'", record.original_text),
        corrected
    )
}

pub fn render_report(records: &[ClassificationRecord]) -> String {
    let stats = BatchStats::from_records(records);
    let body = records.iter().map(render_line).join("\n");
    format!(
        "{}\n\n{} fragments: {} exact, {} fuzzy, {} not medicine",
        body,
        records.len(),
        stats.exact,
        stats.fuzzy,
        stats.no_match
    )
}
