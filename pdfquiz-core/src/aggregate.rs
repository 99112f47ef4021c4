//! Merging per-chunk outcomes into the final quiz.
//!
//! Pure and deterministic: the same outcomes always produce the same
//! response.

use crate::model::{ProcessingInfo, Question, QuizResponse};
use crate::planner::MIN_QUESTIONS;
use crate::quiz::ChunkOutcome;
use tracing::{info, warn};

/// Summary used when no chunk produced one
pub const SUMMARY_PLACEHOLDER: &str = "Summary could not be generated.";

/// Lead-in placed before multiple chunk summaries
const MULTI_PART_INTRO: &str = "This document covers multiple key areas:";

/// Fold chunk outcomes into a [`QuizResponse`].
///
/// Failed chunks contribute nothing but still count towards
/// `chunks_processed`. Questions keep chunk order and are truncated to
/// `planned`; a shortfall is logged and never padded.
pub fn aggregate(
    outcomes: &[ChunkOutcome],
    planned: u32,
    topics: &[String],
    word_count: u32,
    page_count: u32,
) -> QuizResponse {
    let mut summaries: Vec<&str> = Vec::new();
    let mut questions: Vec<Question> = Vec::new();

    for outcome in outcomes {
        if let Ok(generated) = &outcome.result {
            if let Some(summary) = generated.summary.as_deref() {
                summaries.push(summary);
            }
            questions.extend(generated.questions.iter().cloned());
        }
    }

    questions.truncate(planned as usize);

    let expected_floor = planned.min(MIN_QUESTIONS) as usize;
    if questions.len() < expected_floor {
        warn!(
            "Only generated {} questions, expected {}",
            questions.len(),
            planned
        );
    }

    info!(
        "Generated {} questions across {} topics",
        questions.len(),
        topics.len()
    );

    QuizResponse {
        summary: combine_summaries(&summaries),
        processing_info: ProcessingInfo {
            chunks_processed: outcomes.len() as u32,
            questions_generated: questions.len() as u32,
            topics_identified: topics.len() as u32,
        },
        questions,
        topics: topics.to_vec(),
        word_count,
        page_count,
    }
}

/// Join chunk summaries into one document summary
pub fn combine_summaries(summaries: &[&str]) -> String {
    match summaries {
        [] => SUMMARY_PLACEHOLDER.to_string(),
        [only] => only.to_string(),
        many => format!("{}\n\n{}", MULTI_PART_INTRO, many.join("\n\n")),
    }
}
