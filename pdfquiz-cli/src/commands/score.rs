//! `pdfquiz score` command - Score answers against a saved quiz

use anyhow::{Context, Result};
use pdfquiz_core::quiz::load_quiz_file;
use pdfquiz_core::{score_quiz, ScoreReport};
use std::path::{Path, PathBuf};

fn load_answers(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} must be a JSON array of strings", path.display()))
}

pub fn run(quiz: PathBuf, answers: PathBuf, json: bool) -> Result<()> {
    let quiz = load_quiz_file(&quiz)
        .with_context(|| format!("Failed to load quiz from {}", quiz.display()))?;
    let answers = load_answers(&answers)?;

    let report = score_quiz(&quiz.questions, &answers);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ScoreReport) {
    println!(
        "🎯 {} / {} correct ({}%) - {}",
        report.score, report.total, report.percentage, report.performance
    );

    println!("\nBy topic:");
    for topic in &report.topic_breakdown {
        println!(
            "  {:<30} {}/{} ({}%)",
            topic.topic, topic.correct, topic.total, topic.percentage
        );
    }

    if !report.strengths.is_empty() {
        println!("\n💪 Strengths: {}", report.strengths.join(", "));
    }
    if !report.areas_to_review.is_empty() {
        println!("📚 Review:    {}", report.areas_to_review.join(", "));
    }

    let missed: Vec<_> = report
        .detailed_results
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_correct)
        .collect();

    if !missed.is_empty() {
        println!("\nMissed questions:");
        for (i, result) in missed {
            println!("  {}. {}", i + 1, result.question);
            println!(
                "     Your answer: {}",
                result.user_answer.as_deref().unwrap_or("(none)")
            );
            println!("     Correct:     {}", result.correct_answer);
            if !result.explanation.is_empty() {
                println!("     {}", result.explanation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_answers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, r#"["London", "Paris"]"#).unwrap();

        assert_eq!(load_answers(&path).unwrap(), vec!["London", "Paris"]);
    }

    #[test]
    fn test_load_answers_rejects_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, r#"{"1": "London"}"#).unwrap();

        let err = load_answers(&path).unwrap_err();
        assert!(err.to_string().contains("JSON array of strings"));
    }
}
