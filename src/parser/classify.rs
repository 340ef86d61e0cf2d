use tracing::debug;

use super::record::{DailyRecord, Match};
use super::segment::DaySegment;
use crate::vocab::Vocabulary;

/// Turn one date's blocks into its matches.
///
/// A block that hits any exclusion rule contributes nothing. Otherwise each
/// label rule that matches adds the block, unless an earlier block on the
/// same date already claimed that label.
pub fn classify_day(day: &DaySegment, vocab: &Vocabulary) -> DailyRecord {
    let mut record = DailyRecord::new(day.date);

    for block in &day.blocks {
        if let Some(rule) = vocab.exclusion_rules().find(|r| r.is_match(block)) {
            debug!("{}: block vetoed by '{}': {}", day.date, rule.label(), block);
            continue;
        }

        for rule in vocab.label_rules().filter(|r| r.is_match(block)) {
            if record.has_label(rule.label()) {
                debug!("{}: '{}' already recorded, dropping: {}", day.date, rule.label(), block);
                continue;
            }
            record.matches.push(Match {
                label: rule.label().to_string(),
                detail: block.clone(),
            });
        }
    }

    record
}
