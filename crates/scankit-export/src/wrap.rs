//! Greedy word wrapping against a measured line width.

/// Wraps `text` into lines no wider than `max_width` under `measure`:
/// a word is appended to the current line while the measured width stays
/// within the limit, otherwise it starts a new line. A word wider than
/// the limit gets a line of its own and overflows.
pub fn wrap_text(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
