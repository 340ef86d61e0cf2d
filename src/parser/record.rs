use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Detail text of a synthesized entry for a symptom that disappeared since
/// the previous date. Never passed through cause normalization.
pub const RESOLVED_MARKER: &str = "resolved";

/// A label confirmed in one block, with that block's raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub label: String,
    pub detail: String,
}

/// Matches for one date. Labels are unique; order is detection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub matches: Vec<Match>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            matches: Vec::new(),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.matches.iter().any(|m| m.label == label)
    }

    pub fn labels(&self) -> BTreeSet<&str> {
        self.matches.iter().map(|m| m.label.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteItem {
    pub keyword: String,
    pub detail: String,
}

impl NoteItem {
    /// True for entries emitted by the differ. `Vocabulary` rejects cause
    /// phrases equal to the marker, so a normalized detail never collides.
    pub fn is_resolved(&self) -> bool {
        self.detail == RESOLVED_MARKER
    }
}

/// Serialized as `{"date": "YYYY-MM-DD", "items": [{"keyword", "detail"}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub date: NaiveDate,
    pub items: Vec<NoteItem>,
}
