use crate::vocab::Vocabulary;

/// Display form of a canonical label; unknown labels pass through.
pub fn present_label<'a>(label: &'a str, vocab: &'a Vocabulary) -> &'a str {
    vocab.symptom_presentation(label).unwrap_or(label)
}

/// Whole-detail replacement by the first cause entry whose trigger occurs
/// in the text. Without a hit the block text is returned verbatim.
pub fn present_detail<'a>(detail: &'a str, vocab: &'a Vocabulary) -> &'a str {
    vocab
        .causes()
        .iter()
        .find(|c| detail.contains(c.trigger.as_str()))
        .map(|c| c.phrase.as_str())
        .unwrap_or(detail)
}
