use once_cell::sync::Lazy;
use regex::Regex;

/// An uppercase letter that starts a new word: followed by a non-uppercase
/// character.
static WORD_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}[^\p{Lu}]").unwrap());

/// Baseline offset and line spacing of leaf labels at a 10px font.
const LABEL_BASELINE: f64 = 13.0;
const LABEL_LINE_STEP: f64 = 10.0;

/// The last path segment of `id`.
pub fn leaf_name(id: &str, separator: char) -> &str {
    id.rsplit(separator).next().unwrap_or(id)
}

/// Splits a camel-case name into the words it is drawn as, one per line:
/// `AgglomerativeCluster` becomes `["Agglomerative", "Cluster"]`.
pub fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    for found in WORD_START_RE.find_iter(name) {
        if found.start() > start {
            words.push(&name[start..found.start()]);
            start = found.start();
        }
    }
    if start < name.len() {
        words.push(&name[start..]);
    }
    words
}

/// Vertical offset of line `index` out of `count`, relative to the circle
/// centre, for a label drawn at `font_size`.
pub fn line_offset(index: usize, count: usize, font_size: f64) -> f64 {
    let scale = font_size / 10.0;
    (LABEL_BASELINE + (index as f64 - count as f64 / 2.0 - 0.5) * LABEL_LINE_STEP) * scale
}
