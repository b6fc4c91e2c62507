/// Text shown when a render receives nothing drawable.
pub const PLACEHOLDER_TEXT: &str = "No text provided";

/// Normalize poem text while keeping its line structure.
///
/// - `\r\n` and lone `\r` become `\n`
/// - runs of horizontal whitespace collapse to one space and each line is trimmed
/// - consecutive blank lines collapse to a single blank line (a stanza break)
/// - leading and trailing blank lines are removed
///
/// The result is idempotent: normalizing it again returns it unchanged. Empty input (or
/// whitespace-only input) normalizes to an empty string.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for raw in unified.split('\n') {
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
        } else {
            lines.push(line);
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/text/normalize.rs"]
mod tests;
