//! Article text handling: extract cleanup, previews and sentence-aligned chunks.

pub mod clean;
pub mod sentences;

pub use clean::clean_extract;
pub use sentences::split_into_chunks;

/// Default chunk budget in characters.
pub const CHUNK_CHARS: usize = 500;

/// First `max_chars` characters of `text`, followed by `...` if anything was cut.
/// Splits on a char boundary, never inside a multi-byte character.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_preview_truncates_with_marker() {
        assert_eq!(preview("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "量子もつれは物理現象である";
        assert_eq!(preview(text, 4), "量子もつ...");
    }
}
