use super::diff::resolutions;
use super::normalize::{present_detail, present_label};
use super::record::{DailyRecord, NoteItem, OutputRecord, RESOLVED_MARKER};
use crate::vocab::Vocabulary;

/// Assemble presentation records from an ascending series of daily records:
/// each date's matches in detection order, then its resolved labels.
pub(crate) fn build_records(records: &[DailyRecord], vocab: &Vocabulary) -> Vec<OutputRecord> {
    debug_assert!(records.windows(2).all(|w| w[0].date < w[1].date));

    records
        .iter()
        .zip(resolutions(records))
        .map(|(record, resolved)| {
            let found = record.matches.iter().map(|m| NoteItem {
                keyword: present_label(&m.label, vocab).to_string(),
                detail: present_detail(&m.detail, vocab).to_string(),
            });
            let gone = resolved.into_iter().map(|label| NoteItem {
                keyword: present_label(label, vocab).to_string(),
                detail: RESOLVED_MARKER.to_string(),
            });
            OutputRecord {
                date: record.date,
                items: found.chain(gone).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::parser::record::Match;

    fn record(day: u32, matches: &[(&str, &str)]) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2025, 8, day).unwrap(),
            matches: matches
                .iter()
                .map(|(l, d)| Match {
                    label: l.to_string(),
                    detail: d.to_string(),
                })
                .collect(),
        }
    }

    fn pairs(r: &OutputRecord) -> Vec<(&str, &str)> {
        r.items
            .iter()
            .map(|i| (i.keyword.as_str(), i.detail.as_str()))
            .collect()
    }

    #[test]
    fn matches_then_resolved() {
        let v = Vocabulary::builtin();
        let series = [
            record(1, &[("욕창", "* 욕창 드레싱"), ("수면", "* 수면 불량")]),
            record(2, &[("가래", "* 가래 많음")]),
        ];
        let out = build_records(&series, &v);
        assert_eq!(out.len(), 2);
        assert_eq!(
            pairs(&out[0]),
            vec![("욕창", "욕창 부위 드레싱 시행"), ("수면장애", "* 수면 불량")]
        );
        // Resolved entries sorted by canonical label: 수면 < 욕창.
        assert_eq!(
            pairs(&out[1]),
            vec![("객담", "* 가래 많음"), ("수면장애", "resolved"), ("욕창", "resolved")]
        );
    }

    #[test]
    fn resolved_marker_not_normalized() {
        let json = r#"{
            "rules": [{"label": "cough", "terms": ["cough"]}],
            "causes": [{"trigger": "resolved", "phrase": "SHOULD NOT APPEAR"}]
        }"#;
        let v = Vocabulary::from_json_str(json).unwrap();
        let out = build_records(&[record(1, &[("cough", "cough")]), record(2, &[])], &v);
        assert_eq!(pairs(&out[1]), vec![("cough", "resolved")]);
    }

    #[test]
    fn empty_dates_kept() {
        let v = Vocabulary::builtin();
        let out = build_records(&[record(1, &[]), record(2, &[])], &v);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.items.is_empty()));
    }
}
