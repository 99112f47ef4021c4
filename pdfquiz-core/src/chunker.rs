//! Sentence-aligned text chunking.
//!
//! Chunks are the unit of work sent to the model. A chunk is built from whole
//! sentences and never split inside one, so a single sentence longer than the
//! limit is emitted on its own.

/// Separator inserted between sentences inside a chunk
const SENTENCE_SEPARATOR: &str = ". ";

/// Split `text` into sentences on runs of `.`, `!` and `?`.
///
/// Sentences are trimmed; empty ones are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split `text` into ordered chunks of at most `max_chunk_chars` characters.
///
/// Sentences are accumulated and joined with `". "`. When the next sentence
/// would push a non-empty buffer past the limit, the buffer is flushed and
/// the sentence starts a new one.
pub fn chunk_text(text: &str, max_chunk_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Tracked separately: `String::len` counts bytes, the limit counts characters
    let mut current_chars = 0usize;
    let separator_chars = SENTENCE_SEPARATOR.chars().count();

    for sentence in split_sentences(text) {
        let sentence_chars = sentence.chars().count();

        if current_chars > 0 && current_chars + separator_chars + sentence_chars > max_chunk_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if current_chars > 0 {
            current.push_str(SENTENCE_SEPARATOR);
            current_chars += separator_chars;
        }
        current.push_str(sentence);
        current_chars += sentence_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("   \n\t ", 100).is_empty());
        assert!(chunk_text("...!?", 100).is_empty());
    }

    #[test]
    fn test_no_terminal_punctuation_is_single_trimmed_chunk() {
        let text = "  A heading line\nfollowed by words without any stop  ";
        let chunks = chunk_text(text, 10);
        assert_eq!(chunks, vec![text.trim().to_string()]);
    }

    #[test]
    fn test_sentences_grouped_under_limit() {
        let text = "One two. Three four! Five six? Seven eight.";
        let chunks = chunk_text(text, 21);
        assert_eq!(chunks, vec!["One two. Three four", "Five six. Seven eight"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 21));
    }

    #[test]
    fn test_everything_fits_in_one_chunk() {
        let chunks = chunk_text("Alpha. Beta. Gamma.", 1000);
        assert_eq!(chunks, vec!["Alpha. Beta. Gamma"]);
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let long = "x".repeat(50);
        let text = format!("Short. {}. Tail.", long);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks, vec!["Short".to_string(), long, "Tail".to_string()]);
    }

    #[test]
    fn test_order_and_sentences_preserved() {
        let text = "The first idea. A second idea! Is there a third? \
                    Yes there is. And a fifth one here. Finally the sixth.";
        for max in [1, 15, 30, 60, 500] {
            let chunks = chunk_text(text, max);
            let rejoined: Vec<&str> = chunks
                .iter()
                .flat_map(|c| c.split(SENTENCE_SEPARATOR))
                .collect();
            assert_eq!(rejoined, split_sentences(text), "max = {}", max);
        }
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // Each sentence is 4 characters but 8 bytes
        let text = "éééé. éééé.";
        let chunks = chunk_text(text, 10);
        assert_eq!(chunks, vec!["éééé. éééé"]);
    }

    #[test]
    fn test_split_sentences_collapses_punctuation_runs() {
        assert_eq!(
            split_sentences("Wait... what?! Really."),
            vec!["Wait", "what", "Really"]
        );
    }
}
