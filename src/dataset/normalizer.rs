//! Category label normalization.

use crate::models::Dataset;
use tracing::debug;

/// Inconsistent fat-content spellings and their canonical labels.
const FAT_CONTENT_ALIASES: [(&str, &str); 3] = [
    ("LF", "Low Fat"),
    ("low fat", "Low Fat"),
    ("reg", "Regular"),
];

/// Map a fat-content label to its canonical form.
///
/// Labels outside the alias table are returned unchanged, which makes the
/// mapping idempotent since no canonical label is itself an alias.
pub fn normalize_fat_content(value: &str) -> &str {
    FAT_CONTENT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == value)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(value)
}

/// Rewrite every record's fat content to its canonical label.
pub fn normalize(mut dataset: Dataset) -> Dataset {
    let mut rewritten = 0usize;

    for record in &mut dataset.records {
        let canonical = normalize_fat_content(&record.fat_content);
        if canonical != record.fat_content {
            record.fat_content = canonical.to_string();
            rewritten += 1;
        }
    }

    debug!("Normalized {} fat-content labels", rewritten);
    dataset
}
