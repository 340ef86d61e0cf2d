use super::record::DailyRecord;

/// Labels present on `prev` and absent on `curr`, in label order.
/// Only label identity counts; details are ignored.
pub fn resolved_labels<'a>(prev: &'a DailyRecord, curr: &DailyRecord) -> Vec<&'a str> {
    prev.labels()
        .into_iter()
        .filter(|l| !curr.has_label(l))
        .collect()
}

/// Resolved labels for every record of an ascending series, index-aligned
/// with `records`. The first record has no predecessor and gets none.
pub fn resolutions(records: &[DailyRecord]) -> Vec<Vec<&str>> {
    let mut out = Vec::with_capacity(records.len());
    if !records.is_empty() {
        out.push(Vec::new());
    }
    out.extend(records.windows(2).map(|w| resolved_labels(&w[0], &w[1])));
    out
}
