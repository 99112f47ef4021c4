//! Heuristic topic extraction.
//!
//! Topics come from two passes over the whole document: a fixed vocabulary of
//! common section names, then short capitalized lines that look like
//! headings. The result is an ordered, duplicate-free list.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Maximum number of topics kept per document
pub const MAX_TOPICS: usize = 8;

/// Maximum number of heading lines considered
const MAX_HEADING_CANDIDATES: usize = 10;

/// Headings this long or longer are ignored
const MAX_HEADING_LEN: usize = 50;

/// Section names matched case-insensitively anywhere in the text
const SECTION_VOCABULARY: [&str; 15] = [
    "introduction",
    "conclusion",
    "methodology",
    "results",
    "discussion",
    "background",
    "literature review",
    "analysis",
    "implementation",
    "evaluation",
    "recommendations",
    "future work",
    "summary",
    "abstract",
    "references",
];

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z][A-Za-z \t]{3,30}$").expect("heading pattern is a valid regex")
    })
}

/// Extract up to [`MAX_TOPICS`] topic labels from document text.
///
/// Vocabulary matches come first in vocabulary order, followed by heading
/// lines in document order.
pub fn extract_topics(text: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();

    let lowered = text.to_lowercase();
    for term in SECTION_VOCABULARY {
        if lowered.contains(term) {
            push_unique(&mut topics, capitalize_first(term));
        }
    }

    for heading in heading_lines(text) {
        push_unique(&mut topics, heading.trim().to_string());
    }

    topics.truncate(MAX_TOPICS);
    debug!("Identified {} topics", topics.len());
    topics
}

/// Lines that look like section headings, in document order
fn heading_lines(text: &str) -> impl Iterator<Item = &str> {
    let pattern = heading_pattern();
    text.lines()
        .filter(move |line| pattern.is_match(line))
        .take(MAX_HEADING_CANDIDATES)
        .filter(|line| line.len() < MAX_HEADING_LEN)
}

fn push_unique(topics: &mut Vec<String>, topic: String) {
    if !topic.is_empty() && !topics.contains(&topic) {
        topics.push(topic);
    }
}

fn capitalize_first(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_matches_are_case_insensitive() {
        let text = "the INTRODUCTION sets the scene. our Results were strong. \
                    see FUTURE WORK for more.";
        let topics = extract_topics(text);
        assert_eq!(topics, vec!["Introduction", "Results", "Future work"]);
    }

    #[test]
    fn test_vocabulary_order_not_text_order() {
        let topics = extract_topics("references appear before the conclusion here");
        assert_eq!(topics, vec!["Conclusion", "References"]);
    }

    #[test]
    fn test_heading_lines_added_after_vocabulary() {
        let text = "Machine Learning Basics\nsome body text, with punctuation.\n\
                    Neural Networks\nintroduction to the topic";
        let topics = extract_topics(text);
        assert_eq!(
            topics,
            vec!["Introduction", "Machine Learning Basics", "Neural Networks"]
        );
    }

    #[test]
    fn test_heading_pattern_bounds() {
        // Too short (4 characters total are needed)
        assert!(!heading_pattern().is_match("Abc"));
        assert!(heading_pattern().is_match("Abcd"));
        // 31 characters is the longest accepted line
        let longest = format!("A{}", "b".repeat(30));
        assert!(heading_pattern().is_match(&longest));
        assert!(!heading_pattern().is_match(&format!("{}b", longest)));
        // Lowercase start, digits or punctuation disqualify
        assert!(!heading_pattern().is_match("lowercase start"));
        assert!(!heading_pattern().is_match("Chapter 1"));
        assert!(!heading_pattern().is_match("Overview:"));
    }

    #[test]
    fn test_heading_with_trailing_space_is_trimmed() {
        let topics = extract_topics("Data Collection  \nbody.");
        assert_eq!(topics, vec!["Data Collection"]);
    }

    #[test]
    fn test_only_first_ten_heading_lines_considered() {
        let text: String = (0..12)
            .map(|i| format!("Heading {}\n", "x".repeat(i + 1)))
            .collect();
        let topics = extract_topics(&text);
        assert_eq!(topics.len(), MAX_TOPICS);
        assert_eq!(topics[0], "Heading x");
    }

    #[test]
    fn test_duplicates_collapse() {
        let text = "Results\nresults again.\nResults";
        assert_eq!(extract_topics(text), vec!["Results"]);
    }

    #[test]
    fn test_capped_at_eight() {
        let text = SECTION_VOCABULARY.join(" ");
        let topics = extract_topics(&text);
        assert_eq!(topics.len(), MAX_TOPICS);
        assert_eq!(topics[0], "Introduction");
        assert_eq!(topics[6], "Literature review");
    }

    #[test]
    fn test_no_topics() {
        assert!(extract_topics("").is_empty());
        assert!(extract_topics("plain lowercase prose only.").is_empty());
    }
}
