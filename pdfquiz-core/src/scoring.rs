//! Scoring a completed quiz.
//!
//! Answers are compared as option texts (without the letter prefix), the way
//! a quiz UI submits them.

use crate::model::{Question, QuestionResult, ScoreReport, TopicScore};
use crate::quiz::DEFAULT_TOPIC;

/// Topics at or above this percentage count as strengths
const STRENGTH_THRESHOLD: u32 = 70;

/// Maximum entries listed as strengths or areas to review
const MAX_HIGHLIGHTS: usize = 3;

/// (minimum percentage, label), checked from the top
const PERFORMANCE_TIERS: [(u32, &str); 4] = [
    (90, "Outstanding Performance!"),
    (80, "Excellent Work!"),
    (70, "Good Job!"),
    (60, "Well Done!"),
];

const LOWEST_TIER: &str = "Keep Learning!";

/// Text of the option whose letter matches the question's answer.
///
/// The option is found case-insensitively by its `"<letter>."` prefix and
/// returned without the first two characters.
pub fn correct_answer_text(question: &Question) -> Option<String> {
    let prefix = format!("{}.", question.answer.trim().to_uppercase());
    question
        .options
        .iter()
        .find(|option| option.trim().to_uppercase().starts_with(&prefix))
        .map(|option| option.chars().skip(2).collect::<String>().trim().to_string())
}

/// Rounded percentage, 0 when there is nothing to count
fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) * 100.0 / f64::from(total)).round() as u32
}

/// Label for an overall percentage
pub fn performance_label(percentage: u32) -> &'static str {
    PERFORMANCE_TIERS
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map(|(_, label)| *label)
        .unwrap_or(LOWEST_TIER)
}

/// Score `answers` against `questions`.
///
/// `answers[i]` is the chosen option text for `questions[i]`; a missing entry
/// counts as wrong. Topic breakdown keeps the order topics first appear in.
pub fn score_quiz(questions: &[Question], answers: &[String]) -> ScoreReport {
    let mut detailed_results = Vec::with_capacity(questions.len());
    let mut topic_breakdown: Vec<TopicScore> = Vec::new();
    let mut score = 0;

    for (i, question) in questions.iter().enumerate() {
        let user_answer = answers.get(i).cloned();
        let correct_answer = correct_answer_text(question);
        let is_correct = matches!(
            (&user_answer, &correct_answer),
            (Some(given), Some(expected)) if given == expected
        );
        if is_correct {
            score += 1;
        }

        let topic = question
            .topic
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        match topic_breakdown.iter_mut().find(|t| t.topic == topic) {
            Some(entry) => {
                entry.total += 1;
                entry.correct += u32::from(is_correct);
            }
            None => topic_breakdown.push(TopicScore {
                topic: topic.clone(),
                correct: u32::from(is_correct),
                total: 1,
                percentage: 0,
            }),
        }

        detailed_results.push(QuestionResult {
            question: question.question.clone(),
            user_answer,
            correct_answer: correct_answer.unwrap_or_default(),
            is_correct,
            explanation: question.explanation.clone(),
            topic,
        });
    }

    for entry in &mut topic_breakdown {
        entry.percentage = percentage(entry.correct, entry.total);
    }

    let strengths = topic_breakdown
        .iter()
        .filter(|t| t.percentage >= STRENGTH_THRESHOLD)
        .take(MAX_HIGHLIGHTS)
        .map(|t| t.topic.clone())
        .collect();

    let areas_to_review = topic_breakdown
        .iter()
        .filter(|t| t.percentage < STRENGTH_THRESHOLD)
        .take(MAX_HIGHLIGHTS)
        .map(|t| t.topic.clone())
        .collect();

    let total = questions.len() as u32;
    let overall = percentage(score, total);

    ScoreReport {
        score,
        total,
        percentage: overall,
        performance: performance_label(overall).to_string(),
        detailed_results,
        topic_breakdown,
        strengths,
        areas_to_review,
    }
}
