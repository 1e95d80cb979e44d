// Output formatting: terminal display.

pub mod terminal;

/// Shorten `text` to `max_chars` characters for a fixed-width column,
/// marking the cut with "...".
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
