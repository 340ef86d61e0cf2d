pub mod build;
pub mod classify;
pub mod diff;
pub mod lines;
pub mod normalize;
pub mod record;
pub mod segment;

use crate::vocab::Vocabulary;
use record::{DailyRecord, OutputRecord};

/// Lines → per-date blocks → matches, ascending by date. No normalization
/// and no resolved entries.
pub fn daily_records(text: &str, vocab: &Vocabulary) -> Vec<DailyRecord> {
    let lines = lines::classify_lines(text, vocab);
    let mut days = segment::segment(&lines);
    days.sort_by_key(|d| d.date);
    days.iter()
        .map(|day| classify::classify_day(day, vocab))
        .collect()
}

/// Full pipeline: raw note text → presentation records with day-over-day
/// resolutions.
pub fn process_document(text: &str, vocab: &Vocabulary) -> Vec<OutputRecord> {
    build::build_records(&daily_records(text, vocab), vocab)
}

// ── Tests ──
