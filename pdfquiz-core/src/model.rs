//! Shared data models for pdfquiz.
//!
//! Wire types use camelCase field names to match what browser clients send
//! and expect.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A multiple-choice question as produced by the model.
///
/// Nothing here is validated: the model may return fewer or more than four
/// options, or omit fields entirely, in which case they default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    #[serde(default)]
    pub question: String,
    /// Options prefixed with their letter, e.g. `"A. Paris"`
    #[serde(default)]
    pub options: Vec<String>,
    /// Letter of the correct option, e.g. `"B"`
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// What one chunk's model call yielded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub summary: Option<String>,
    pub questions: Vec<Question>,
}

/// Statistics about a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingInfo {
    pub chunks_processed: u32,
    pub questions_generated: u32,
    pub topics_identified: u32,
}

/// Final summary and quiz for a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub summary: String,
    pub questions: Vec<Question>,
    pub topics: Vec<String>,
    pub word_count: u32,
    pub page_count: u32,
    pub processing_info: ProcessingInfo,
}

/// Multipart form accepted by `POST /upload`
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// The PDF document
    #[schema(value_type = String, format = Binary)]
    pub pdf: Vec<u8>,
}

/// Error body returned by the upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl UploadErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub max_file_size: String,
    pub features: Vec<String>,
}

/// A quiz plus the user's chosen option texts, one per question
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreRequest {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<String>,
}

/// Outcome for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
    pub topic: String,
}

/// Per-topic tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TopicScore {
    pub topic: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
}

/// Scored quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub performance: String,
    pub detailed_results: Vec<QuestionResult>,
    pub topic_breakdown: Vec<TopicScore>,
    pub strengths: Vec<String>,
    pub areas_to_review: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_tolerates_missing_fields() {
        let q: Question = serde_json::from_str(r#"{"question": "Why?"}"#).unwrap();
        assert_eq!(q.question, "Why?");
        assert!(q.options.is_empty());
        assert!(q.topic.is_none());

        let json = serde_json::to_string(&q).unwrap();
        assert!(!json.contains("topic"));
        assert!(!json.contains("difficulty"));
    }

    #[test]
    fn test_quiz_response_uses_camel_case() {
        let response = QuizResponse {
            summary: "s".to_string(),
            questions: vec![],
            topics: vec!["Results".to_string()],
            word_count: 10,
            page_count: 1,
            processing_info: ProcessingInfo {
                chunks_processed: 1,
                questions_generated: 0,
                topics_identified: 1,
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["wordCount"], 10);
        assert_eq!(value["pageCount"], 1);
        assert_eq!(value["processingInfo"]["chunksProcessed"], 1);
        assert_eq!(value["processingInfo"]["topicsIdentified"], 1);
    }

    #[test]
    fn test_upload_error_body_omits_empty_details() {
        let body = serde_json::to_string(&UploadErrorBody::new("Internal Server Error")).unwrap();
        assert_eq!(body, r#"{"error":"Internal Server Error"}"#);

        let body = UploadErrorBody::new("x").with_details("boom");
        assert_eq!(body.details.as_deref(), Some("boom"));
    }
}
