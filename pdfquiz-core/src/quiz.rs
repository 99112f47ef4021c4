//! Quiz generation pipeline.
//!
//! Extracts a document, plans how many questions to ask, sends each chunk to
//! the model one at a time and folds the per-chunk outcomes into a single
//! [`QuizResponse`]. A failing chunk is logged and skipped; it never fails
//! the document.

use crate::aggregate::aggregate;
use crate::chunker::chunk_text;
use crate::config::Config;
use crate::gemini::{GeminiClient, GeminiError, TextGenerator};
use crate::model::{GenerationResult, Question, QuizResponse};
use crate::pdf::{count_words, PdfDocument, PdfError};
use crate::planner::{plan_question_count, questions_per_chunk};
use crate::topics::extract_topics;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Label used in prompts when a document has no topics
pub const DEFAULT_TOPIC: &str = "General";

/// Errors that fail a whole generation run
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Coarse failure categories shown to end users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    FileProcessing,
    ResponseParsing,
    Internal,
}

impl FailureKind {
    /// Fixed user-facing message for this category
    pub fn message(self) -> &'static str {
        match self {
            FailureKind::Timeout => "Processing timeout - document may be too large or complex",
            FailureKind::FileProcessing => "File processing error - please try uploading again",
            FailureKind::ResponseParsing => "AI response parsing error - please try again",
            FailureKind::Internal => "Internal Server Error",
        }
    }
}

impl QuizError {
    pub fn kind(&self) -> FailureKind {
        match self {
            QuizError::Gemini(e) if e.is_timeout() => FailureKind::Timeout,
            QuizError::Pdf(_) | QuizError::Io(_) => FailureKind::FileProcessing,
            QuizError::Json(_) => FailureKind::ResponseParsing,
            QuizError::Gemini(_) | QuizError::Task(_) => FailureKind::Internal,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().message()
    }
}

/// Why a single chunk contributed nothing
#[derive(Debug, Error)]
pub enum ChunkFailure {
    #[error("generation call failed: {0}")]
    Generation(#[from] GeminiError),

    #[error("no JSON object found in model response")]
    NoJson,

    #[error("malformed JSON in model response: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Result of processing one chunk
#[derive(Debug)]
pub struct ChunkOutcome {
    /// Position of the chunk in the document (0-based)
    pub index: usize,
    pub result: Result<GenerationResult, ChunkFailure>,
}

/// Model text interpreted as a generation result
#[derive(Debug)]
pub enum ParsedResponse {
    Parsed(GenerationResult),
    NoJson,
    Malformed(serde_json::Error),
}

impl ParsedResponse {
    pub fn into_result(self) -> Result<GenerationResult, ChunkFailure> {
        match self {
            ParsedResponse::Parsed(result) => Ok(result),
            ParsedResponse::NoJson => Err(ChunkFailure::NoJson),
            ParsedResponse::Malformed(e) => Err(ChunkFailure::MalformedJson(e)),
        }
    }
}

/// Parse raw model text.
///
/// The JSON object is taken to span from the first `{` to the last `}`, which
/// tolerates chatter or code fences around it. Missing or mistyped fields are
/// treated as absent; question entries that do not fit [`Question`] are dropped.
pub fn parse_generation_response(raw: &str) -> ParsedResponse {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return ParsedResponse::NoJson;
    };
    if end < start {
        return ParsedResponse::NoJson;
    }

    let value: serde_json::Value = match serde_json::from_str(&raw[start..=end]) {
        Ok(value) => value,
        Err(e) => return ParsedResponse::Malformed(e),
    };

    let summary = value
        .get("summary")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let questions = value
        .get("questions")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match serde_json::from_value::<Question>(item.clone()) {
                    Ok(q) => Some(q),
                    Err(e) => {
                        debug!("Dropping malformed question entry: {}", e);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    ParsedResponse::Parsed(GenerationResult { summary, questions })
}

/// Topic label for the chunk at `index`, rotating through `topics`
pub fn topic_for_chunk(topics: &[String], index: usize) -> &str {
    if topics.is_empty() {
        DEFAULT_TOPIC
    } else {
        &topics[index % topics.len()]
    }
}

/// Instruction sent to the model for one chunk
pub fn build_prompt(chunk: &str, question_count: u32, topic: &str) -> String {
    format!(
        r#"You are an expert educational content creator. Analyze the text below and produce:

1. A comprehensive summary (2-3 paragraphs) of its key concepts and main ideas
2. {question_count} high-quality multiple-choice questions, each with:
   - A clear, specific question that tests understanding
   - Exactly 4 options labelled "A.", "B.", "C.", "D."
   - The correct answer as a single letter (A, B, C or D)
   - A detailed explanation of why that answer is correct
   - A topic classification

Vary the difficulty and cover different aspects of the content: factual
recall, conceptual understanding, application, and analysis.

Respond with JSON only, in this exact format:
{{
  "summary": "Comprehensive summary of key concepts and main ideas...",
  "questions": [
    {{
      "question": "Clear, specific question text...",
      "options": ["A. First option", "B. Second option", "C. Third option", "D. Fourth option"],
      "answer": "C",
      "explanation": "Why this answer is correct and the others are not...",
      "topic": "{topic}",
      "difficulty": "medium"
    }}
  ]
}}

Text to analyze:
"""{chunk}""""#
    )
}

/// Pipeline tuning knobs
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Upper bound on chunk length in characters
    pub max_chunk_chars: usize,
    /// Pause between consecutive model calls
    pub inter_call_delay: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_chunk_chars: 12_000,
            inter_call_delay: Duration::from_secs(1),
        }
    }
}

impl GenerationOptions {
    pub fn with_max_chunk_chars(mut self, chars: usize) -> Self {
        self.max_chunk_chars = chars;
        self
    }

    pub fn with_inter_call_delay(mut self, delay: Duration) -> Self {
        self.inter_call_delay = delay;
        self
    }
}

/// Drives chunked quiz generation against a [`TextGenerator`]
pub struct QuizGenerator {
    generator: Arc<dyn TextGenerator>,
    options: GenerationOptions,
}

impl QuizGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, options: GenerationOptions) -> Self {
        Self { generator, options }
    }

    /// Build a generator backed by the Gemini HTTP client
    pub fn from_config(config: &Config) -> Result<Self, QuizError> {
        let client = GeminiClient::from_config(&config.gemini)?;
        if !client.has_api_key() {
            warn!("No Gemini API key configured; every generation call will fail");
        }

        let options = GenerationOptions::default()
            .with_max_chunk_chars(config.generation.max_chunk_chars)
            .with_inter_call_delay(config.gemini.inter_call_delay());

        Ok(Self::new(Arc::new(client), options))
    }

    /// Run the whole pipeline on a PDF file
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn generate_from_pdf(&self, path: &Path) -> Result<QuizResponse, QuizError> {
        let owned: PathBuf = path.to_path_buf();
        let doc = tokio::task::spawn_blocking(move || PdfDocument::load(&owned)).await??;

        let text = doc.full_text();
        info!(
            "Extracted PDF: {} pages, {} words",
            doc.page_count(),
            doc.word_count()
        );

        Ok(self.generate_from_text(&text, doc.page_count()).await)
    }

    /// Run the pipeline on already-extracted text
    pub async fn generate_from_text(&self, text: &str, page_count: u32) -> QuizResponse {
        let word_count = count_words(text);

        let topics = extract_topics(text);
        info!("Identified topics: {:?}", topics);

        let planned = plan_question_count(word_count, page_count, topics.len() as u32);
        info!("Planning {} questions", planned);

        let chunks = chunk_text(text, self.options.max_chunk_chars);
        info!("Processing {} text chunks", chunks.len());

        let outcomes = self.generate_chunks(&chunks, planned, &topics).await;

        aggregate(&outcomes, planned, &topics, word_count, page_count)
    }

    /// Call the model once per chunk, in order, pausing between calls.
    ///
    /// Always returns one outcome per chunk.
    pub async fn generate_chunks(
        &self,
        chunks: &[String],
        planned: u32,
        topics: &[String],
    ) -> Vec<ChunkOutcome> {
        let per_chunk = questions_per_chunk(planned, chunks.len());
        let mut outcomes = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                "Processing chunk {}/{} ({} questions)",
                index + 1,
                chunks.len(),
                per_chunk
            );

            let topic = topic_for_chunk(topics, index);
            let result = self.generate_chunk(chunk, per_chunk, topic).await;

            match &result {
                Ok(generated) => debug!(
                    "Chunk {} produced {} questions",
                    index + 1,
                    generated.questions.len()
                ),
                Err(ChunkFailure::NoJson) => {
                    warn!("No valid JSON found in chunk {} response", index + 1)
                }
                Err(e) => error!("Error processing chunk {}: {}", index + 1, e),
            }

            outcomes.push(ChunkOutcome { index, result });

            if index + 1 < chunks.len() && !self.options.inter_call_delay.is_zero() {
                tokio::time::sleep(self.options.inter_call_delay).await;
            }
        }

        outcomes
    }

    async fn generate_chunk(
        &self,
        chunk: &str,
        question_count: u32,
        topic: &str,
    ) -> Result<GenerationResult, ChunkFailure> {
        let prompt = build_prompt(chunk, question_count, topic);
        let raw = self.generator.generate(&prompt).await?;
        parse_generation_response(&raw).into_result()
    }
}

/// Load a previously saved quiz (e.g. from `pdfquiz generate`)
pub fn load_quiz_file(path: &Path) -> Result<QuizResponse, QuizError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Render a quiz as markdown
pub fn quiz_to_markdown(quiz: &QuizResponse) -> String {
    let mut md = String::new();

    md.push_str("## Summary\n\n");
    md.push_str(&quiz.summary);
    md.push_str("\n\n");

    if !quiz.topics.is_empty() {
        md.push_str(&format!("**Topics:** {}\n\n", quiz.topics.join(", ")));
    }

    md.push_str("## Questions\n\n");
    for (i, question) in quiz.questions.iter().enumerate() {
        md.push_str(&format!("### {}. {}\n\n", i + 1, question.question));
        for option in &question.options {
            md.push_str(&format!("- {}\n", option));
        }
        md.push('\n');
        md.push_str(&format!("**Answer:** {}\n\n", question.answer));
        if !question.explanation.is_empty() {
            md.push_str(&format!("*{}*\n\n", question.explanation));
        }
    }

    md.push_str(&format!(
        "---\n*{} pages, {} words, {} chunks*\n",
        quiz.page_count, quiz.word_count, quiz.processing_info.chunks_processed
    ));

    md
}
