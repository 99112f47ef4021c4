//! Adaptive question-count planning.

/// Smallest number of questions planned for any document
pub const MIN_QUESTIONS: u32 = 5;

/// Largest number of questions planned for any document
pub const MAX_QUESTIONS: u32 = 25;

/// Topics beyond this count add no further questions
const MAX_TOPIC_BONUS: u32 = 5;

/// (word count threshold, extra questions); thresholds are cumulative
const WORD_STEPS: [(u32, u32); 3] = [(5_000, 3), (10_000, 3), (20_000, 4)];

/// (page count threshold, extra questions); thresholds are cumulative
const PAGE_STEPS: [(u32, u32); 3] = [(10, 2), (25, 3), (50, 5)];

/// Number of questions to request for a whole document.
///
/// Always within [`MIN_QUESTIONS`, `MAX_QUESTIONS`] and non-decreasing in
/// each argument.
pub fn plan_question_count(word_count: u32, page_count: u32, topic_count: u32) -> u32 {
    let step_bonus = |value: u32, steps: &[(u32, u32)]| -> u32 {
        steps
            .iter()
            .filter(|(threshold, _)| value > *threshold)
            .map(|(_, bonus)| bonus)
            .sum()
    };

    let planned = MIN_QUESTIONS
        + step_bonus(word_count, &WORD_STEPS)
        + step_bonus(page_count, &PAGE_STEPS)
        + topic_count.min(MAX_TOPIC_BONUS);

    planned.min(MAX_QUESTIONS)
}

/// Questions requested from each chunk so that all chunks together cover the plan
pub fn questions_per_chunk(planned: u32, chunk_count: usize) -> u32 {
    if chunk_count == 0 {
        return 0;
    }
    planned.div_ceil(chunk_count as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_document_gets_base() {
        assert_eq!(plan_question_count(0, 0, 0), 5);
        assert_eq!(plan_question_count(5_000, 10, 0), 5);
    }

    #[test]
    fn test_worked_example() {
        // 5 + 3 (>5000) + 3 (>10000) + 2 (>10 pages) + 3 (>25 pages) + 5 topics
        assert_eq!(plan_question_count(12_000, 30, 8), 21);
    }

    #[test]
    fn test_thresholds_are_cumulative() {
        assert_eq!(plan_question_count(25_000, 0, 0), 5 + 3 + 3 + 4);
        assert_eq!(plan_question_count(0, 51, 0), 5 + 2 + 3 + 5);
        assert_eq!(plan_question_count(0, 0, 3), 8);
    }

    #[test]
    fn test_capped_at_max() {
        assert_eq!(plan_question_count(100_000, 500, 8), MAX_QUESTIONS);
        assert_eq!(plan_question_count(u32::MAX, u32::MAX, u32::MAX), MAX_QUESTIONS);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let words = [0, 4_999, 5_000, 5_001, 10_001, 20_001, 80_000];
        let pages = [0, 10, 11, 26, 51, 300];
        let topics = [0, 1, 4, 5, 6, 8];

        for &w in &words {
            for &p in &pages {
                for &t in &topics {
                    let base = plan_question_count(w, p, t);
                    assert!((MIN_QUESTIONS..=MAX_QUESTIONS).contains(&base));
                    assert!(plan_question_count(w + 1, p, t) >= base);
                    assert!(plan_question_count(w, p + 1, t) >= base);
                    assert!(plan_question_count(w, p, t + 1) >= base);
                }
            }
        }
    }

    #[test]
    fn test_questions_per_chunk_rounds_up() {
        assert_eq!(questions_per_chunk(10, 3), 4);
        assert_eq!(questions_per_chunk(10, 5), 2);
        assert_eq!(questions_per_chunk(5, 8), 1);
        assert_eq!(questions_per_chunk(10, 0), 0);
    }
}
