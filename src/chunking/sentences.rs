//! Sentence-aligned chunker for article bodies.
//!
//! Three-tier strategy:
//! 1. Split at sentence ends (`.`, `!` or `?` followed by whitespace)
//! 2. Merge consecutive sentences up to the character budget
//! 3. Last resort: split an oversized sentence at char boundaries

/// Split `text` into chunks of at most `max_len` characters.
pub fn split_into_chunks(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_chars = 0usize;

    for sentence in split_sentences(text) {
        let sentence_chars = sentence.chars().count();

        if sentence_chars > max_len {
            if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
                current_chars = 0;
            }
            split_long_sentence(sentence, max_len, &mut chunks);
            continue;
        }

        // Joining adds one space per sentence after the first.
        let joined_chars = current_chars + sentence_chars + usize::from(!current.is_empty());
        if !current.is_empty() && joined_chars > max_len {
            chunks.push(current.join(" "));
            current.clear();
            current_chars = sentence_chars;
        } else {
            current_chars = joined_chars;
        }
        current.push(sentence);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let at_end = matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|&(_, next)| next.is_whitespace());
        if at_end {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

fn split_long_sentence(sentence: &str, max_len: usize, chunks: &mut Vec<String>) {
    let chars: Vec<char> = sentence.chars().collect();
    for piece in chars.chunks(max_len) {
        let piece: String = piece.iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }
    }
}
