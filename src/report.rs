//! Plain-text renderings of parsed notes for terminals and chat prompts.

use crate::parser::record::OutputRecord;

/// One `=== date ===` header per date, one line per item, blank line between
/// dates.
pub fn render_changes(records: &[OutputRecord]) -> String {
    let mut out = Vec::new();
    for record in records {
        out.push(format!("=== {} ===", record.date));
        for item in &record.items {
            out.push(format!("- 특이사항 : {} / 원인 : {}", item.keyword, item.detail));
        }
        out.push(String::new());
    }
    out.join("\n")
}

/// Compact per-date table: date, item count, resolved count, keywords.
pub fn render_table(records: &[OutputRecord]) -> String {
    let mut out = vec![
        format!("{:<10} | {:>5} | {:>8} | {}", "Date", "Items", "Resolved", "Keywords"),
        "-".repeat(60),
    ];
    for r in records {
        let resolved = r.items.iter().filter(|i| i.is_resolved()).count();
        let keywords: Vec<&str> = r
            .items
            .iter()
            .filter(|i| !i.is_resolved())
            .map(|i| i.keyword.as_str())
            .collect();
        out.push(format!(
            "{:<10} | {:>5} | {:>8} | {}",
            r.date,
            r.items.len(),
            resolved,
            truncate(&keywords.join(", "), 40)
        ));
    }
    out.join("\n")
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::parser::record::NoteItem;

    fn records() -> Vec<OutputRecord> {
        vec![
            OutputRecord {
                date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                items: vec![NoteItem {
                    keyword: "수면장애".into(),
                    detail: "* 수면 장애 호소".into(),
                }],
            },
            OutputRecord {
                date: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
                items: vec![NoteItem {
                    keyword: "수면장애".into(),
                    detail: "resolved".into(),
                }],
            },
        ]
    }

    #[test]
    fn change_report() {
        let text = render_changes(&records());
        assert_eq!(
            text,
            "=== 2025-08-01 ===\n\
             - 특이사항 : 수면장애 / 원인 : * 수면 장애 호소\n\
             \n\
             === 2025-08-02 ===\n\
             - 특이사항 : 수면장애 / 원인 : resolved\n"
        );
    }

    #[test]
    fn empty_report() {
        assert_eq!(render_changes(&[]), "");
    }

    #[test]
    fn table_counts_resolved() {
        let table = render_table(&records());
        let rows: Vec<&str> = table.lines().skip(2).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("수면장애"));
        assert!(rows[1].contains("|        1 |"));
    }

    #[test]
    fn truncate_chars() {
        assert_eq!(truncate("수면장애", 10), "수면장애");
        assert_eq!(truncate("수면장애", 2), "수면...");
    }
}
