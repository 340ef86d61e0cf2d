use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::vocab::Vocabulary;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{4})([-./])(\d{1,2})([-./])(\d{1,2})(?:\D|$)").unwrap()
});
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[*\-•·○●▶▷■□※ㆍ+]|\d{1,2}[.)]\s)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Date(NaiveDate),
    BlockStart(String),
    Text(String),
    Boilerplate,
    Empty,
}

/// Classify one raw line. Boilerplate wins over everything, then dates,
/// then block starts.
pub fn classify_line(raw: &str, vocab: &Vocabulary) -> Line {
    let line = raw.trim();

    if line.is_empty() {
        return Line::Empty;
    }
    if vocab.is_boilerplate(line) {
        return Line::Boilerplate;
    }
    if let Some(date) = find_date(line, vocab) {
        return Line::Date(date);
    }
    if BULLET_RE.is_match(line) || vocab.mentions_symptom(line) {
        return Line::BlockStart(line.to_string());
    }
    Line::Text(line.to_string())
}

pub fn classify_lines(text: &str, vocab: &Vocabulary) -> Vec<Line> {
    text.lines().map(|l| classify_line(l, vocab)).collect()
}

/// First well-formed date token on the line: one separator kind used twice,
/// a year inside the vocabulary's range, and a real calendar day.
fn find_date(line: &str, vocab: &Vocabulary) -> Option<NaiveDate> {
    DATE_RE.captures_iter(line).find_map(|caps| {
        if caps[2] != caps[4] {
            return None;
        }
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[3].parse().ok()?;
        let day: u32 = caps[5].parse().ok()?;
        if !vocab.year_in_range(year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> Line {
        classify_line(line, &Vocabulary::builtin())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_separators() {
        assert_eq!(classify("# 2025-08-01"), Line::Date(ymd(2025, 8, 1)));
        assert_eq!(classify("2025.8.3 (일)"), Line::Date(ymd(2025, 8, 3)));
        assert_eq!(classify("기록일 2025/08/04 09:00"), Line::Date(ymd(2025, 8, 4)));
    }

    #[test]
    fn malformed_dates_are_text() {
        assert_eq!(classify("2025-08/01"), Line::Text("2025-08/01".into()));
        assert_eq!(classify("2025-13-01"), Line::Text("2025-13-01".into()));
        assert_eq!(classify("2025-02-30"), Line::Text("2025-02-30".into()));
        assert_eq!(classify("1850-01-01"), Line::Text("1850-01-01".into()));
        assert_eq!(classify("12025-01-01"), Line::Text("12025-01-01".into()));
    }

    #[test]
    fn bullets_start_blocks() {
        for line in ["* 식사 양호", "- 특이사항 없음", "• 활력징후 안정", "1. 식사 양호", "2) 산책"] {
            assert_eq!(classify(line), Line::BlockStart(line.into()), "{line}");
        }
    }

    #[test]
    fn symptom_line_starts_block() {
        assert_eq!(
            classify("밤새 수면 취하지 못함"),
            Line::BlockStart("밤새 수면 취하지 못함".into())
        );
    }

    #[test]
    fn exclusion_term_alone_is_not_block_start() {
        assert_eq!(classify("보호자 교육함"), Line::Text("보호자 교육함".into()));
    }

    #[test]
    fn plain_text_trimmed() {
        assert_eq!(classify("   오후 산책함  "), Line::Text("오후 산책함".into()));
    }

    #[test]
    fn blank_and_boilerplate() {
        assert_eq!(classify("   "), Line::Empty);
        assert_eq!(classify("간호기록지"), Line::Boilerplate);
        assert_eq!(classify("출력일: 2025-08-10"), Line::Boilerplate);
        assert_eq!(classify("- 3 -"), Line::Boilerplate);
    }

    #[test]
    fn classify_all_lines() {
        let lines = classify_lines("# 2025-08-01\n\n* 욕창 드레싱", &Vocabulary::builtin());
        assert_eq!(lines.len(), 3);
        assert!(matches!(lines[1], Line::Empty));
        assert!(matches!(&lines[2], Line::BlockStart(t) if t == "* 욕창 드레싱"));
    }
}
