//! Splitting long replies into transport-sized messages.

/// Telegram's maximum message length.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Split `text` into pieces of at most `max_len` characters.
///
/// Each split happens at the last newline inside the window, or at exactly
/// `max_len` characters when the window has no newline. Whitespace at the
/// start of every remainder is trimmed, so splitting at a newline drops it.
/// Empty pieces are never returned. Text that already fits is returned as a
/// single piece.
///
/// Lengths are counted in `char`s, never splitting a code point.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut parts = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_len {
        // Byte offset of the first char past the window.
        let window_end = rest
            .char_indices()
            .nth(max_len)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let split_at = rest[..window_end].rfind('\n').unwrap_or(window_end);

        let (head, tail) = rest.split_at(split_at);
        if !head.is_empty() {
            parts.push(head.to_string());
        }
        rest = tail.trim_start();
    }

    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}
