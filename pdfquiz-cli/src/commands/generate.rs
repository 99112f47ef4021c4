//! `pdfquiz generate` command - Summarize a PDF and build a quiz

use crate::OutputFormat;
use anyhow::{bail, Result};
use pdfquiz_core::quiz::quiz_to_markdown;
use pdfquiz_core::{Config, QuizGenerator};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where an output of the given extension goes
fn output_path(file: &Path, out: Option<&Path>, extension: &str) -> PathBuf {
    match out {
        Some(path) => path.with_extension(extension),
        None => {
            let base_name = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            PathBuf::from(format!("{}_quiz.{}", base_name, extension))
        }
    }
}

pub async fn run(
    config: Config,
    file: PathBuf,
    format: OutputFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    if !file.exists() {
        bail!("File not found: {}", file.display());
    }

    println!("📄 Generating quiz from: {}", file.display());

    let generator = QuizGenerator::from_config(&config)?;

    info!("Starting quiz generation...");
    let quiz = generator.generate_from_pdf(&file).await?;

    if format.writes_json() {
        let json_path = output_path(&file, out.as_deref(), "json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&quiz)?)?;
        println!("✅ JSON saved to: {}", json_path.display());
    }

    if format.writes_markdown() {
        let md_path = output_path(&file, out.as_deref(), "md");
        std::fs::write(&md_path, quiz_to_markdown(&quiz))?;
        println!("✅ Markdown saved to: {}", md_path.display());
    }

    println!("\n{}", "─".repeat(60));
    println!("\n{}\n", quiz.summary);
    if !quiz.topics.is_empty() {
        println!("Topics: {}", quiz.topics.join(", "));
    }
    println!(
        "📝 {} questions from {} pages ({} words, {} chunks)",
        quiz.questions.len(),
        quiz.page_count,
        quiz.word_count,
        quiz.processing_info.chunks_processed
    );

    Ok(())
}
