use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use super::lines::Line;

/// One date's blocks in the order they were flushed. Each block is its
/// lines joined by a single space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySegment {
    pub date: NaiveDate,
    pub blocks: Vec<String>,
}

#[derive(Debug)]
enum State {
    NoActiveDate,
    BetweenBlocks { date: NaiveDate },
    CollectingBlock { date: NaiveDate, buffer: Vec<String> },
}

#[derive(Debug)]
struct Segmenter {
    days: Vec<DaySegment>,
    index: HashMap<NaiveDate, usize>,
    state: State,
}

impl Segmenter {
    fn new() -> Self {
        Self {
            days: Vec::new(),
            index: HashMap::new(),
            state: State::NoActiveDate,
        }
    }

    fn step(mut self, line: &Line) -> Self {
        let state = std::mem::replace(&mut self.state, State::NoActiveDate);
        self.state = match (state, line) {
            (state, Line::Date(date)) => {
                self.flush(state);
                self.open_day(*date);
                State::BetweenBlocks { date: *date }
            }

            (State::NoActiveDate, _) => State::NoActiveDate,

            (State::BetweenBlocks { date }, Line::BlockStart(text)) => State::CollectingBlock {
                date,
                buffer: vec![text.clone()],
            },
            (State::CollectingBlock { date, buffer }, Line::BlockStart(text)) => {
                self.flush(State::CollectingBlock { date, buffer });
                State::CollectingBlock {
                    date,
                    buffer: vec![text.clone()],
                }
            }

            (State::CollectingBlock { date, mut buffer }, Line::Text(text)) => {
                buffer.push(text.clone());
                State::CollectingBlock { date, buffer }
            }

            // Stray text with no open block, blank lines, boilerplate.
            (state, Line::Text(_) | Line::Empty | Line::Boilerplate) => state,
        };
        self
    }

    fn finish(mut self) -> Vec<DaySegment> {
        let state = std::mem::replace(&mut self.state, State::NoActiveDate);
        self.flush(state);
        self.days
    }

    fn open_day(&mut self, date: NaiveDate) {
        if self.index.contains_key(&date) {
            debug!("Date {} repeated; merging into earlier entry", date);
            return;
        }
        self.index.insert(date, self.days.len());
        self.days.push(DaySegment {
            date,
            blocks: Vec::new(),
        });
    }

    fn flush(&mut self, state: State) {
        let State::CollectingBlock { date, buffer } = state else {
            return;
        };
        if buffer.is_empty() {
            return;
        }
        if let Some(&i) = self.index.get(&date) {
            self.days[i].blocks.push(buffer.join(" "));
        }
    }
}

/// Fold classified lines into per-date blocks, in order of first appearance.
/// Lines before the first date are dropped; a date with no blocks is kept.
pub fn segment(lines: &[Line]) -> Vec<DaySegment> {
    lines
        .iter()
        .fold(Segmenter::new(), Segmenter::step)
        .finish()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::classify_lines;
    use crate::vocab::Vocabulary;

    fn run(text: &str) -> Vec<DaySegment> {
        segment(&classify_lines(text, &Vocabulary::builtin()))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input() {
        assert!(run("").is_empty());
        assert!(run("  \n\n \t\n").is_empty());
    }

    #[test]
    fn text_before_first_date_dropped() {
        let days = run("* 욕창 있음\n수면 불량\n# 2025-08-01\n* 식사 양호");
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].blocks, vec!["* 식사 양호"]);
    }

    #[test]
    fn continuation_lines_joined() {
        let days = run("# 2025-08-01\n* 밤새 기침\n호흡 곤란\n호소함");
        assert_eq!(days[0].blocks, vec!["* 밤새 기침 호흡 곤란 호소함"]);
    }

    #[test]
    fn symptom_line_splits_blocks() {
        // A continuation that mentions a symptom opens its own block.
        let days = run("# 2025-08-01\n* 밤새 기침함\n가래 다량 배출");
        assert_eq!(days[0].blocks, vec!["* 밤새 기침함", "가래 다량 배출"]);
    }

    #[test]
    fn stray_text_without_block_ignored() {
        let days = run("# 2025-08-01\n오전 회진\n* 식사 양호");
        assert_eq!(days[0].blocks, vec!["* 식사 양호"]);
    }

    #[test]
    fn blank_lines_do_not_close_block() {
        let days = run("# 2025-08-01\n* 식사\n\n양호함");
        assert_eq!(days[0].blocks, vec!["* 식사 양호함"]);
    }

    #[test]
    fn vital_sign_line_continues_block() {
        let days = run("# 2025-08-01\n* 활력징후 측정\n120/80\n1/2");
        assert_eq!(days[0].blocks, vec!["* 활력징후 측정 120/80"]);
    }

    #[test]
    fn boilerplate_skipped_inside_block() {
        let days = run("# 2025-08-01\n* 식사\n- 2 -\n간호기록지\n양호함");
        assert_eq!(days[0].blocks, vec!["* 식사 양호함"]);
    }

    #[test]
    fn date_without_blocks_kept() {
        let days = run("# 2025-08-01\n# 2025-08-02\n* 식사 양호");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, ymd(2025, 8, 1));
        assert!(days[0].blocks.is_empty());
        assert_eq!(days[1].blocks.len(), 1);
    }

    #[test]
    fn malformed_date_folds_into_block() {
        let days = run("# 2025-08-01\n* 식사\n2025-08/02 재확인");
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].blocks, vec!["* 식사 2025-08/02 재확인"]);
    }

    #[test]
    fn repeated_date_merges() {
        let days = run("# 2025-08-01\n* 가\n# 2025-08-02\n* 나\n# 2025-08-01\n* 다");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].blocks, vec!["* 가", "* 다"]);
        assert_eq!(days[1].blocks, vec!["* 나"]);
    }

    #[test]
    fn encounter_order_preserved() {
        let days = run("# 2025-08-03\n# 2025-08-01");
        assert_eq!(days[0].date, ymd(2025, 8, 3));
        assert_eq!(days[1].date, ymd(2025, 8, 1));
    }
}
