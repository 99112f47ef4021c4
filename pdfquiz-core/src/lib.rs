//! # pdfquiz Core
//!
//! Core library for pdfquiz - turns PDFs into summaries and adaptive
//! multiple-choice quizzes using Gemini.
//!
//! This crate provides:
//! - Configuration management
//! - PDF text extraction
//! - Sentence-aware chunking and topic detection
//! - Adaptive question planning
//! - Gemini REST client
//! - Chunked generation pipeline and result aggregation
//! - Quiz scoring
//! - HTTP API server
//! - Shared data models

pub mod aggregate;
pub mod chunker;
pub mod config;
pub mod gemini;
pub mod model;
pub mod pdf;
pub mod planner;
pub mod quiz;
pub mod scoring;
pub mod server;
pub mod topics;

pub use config::{Config, ConfigError, GeminiConfig, GenerationConfig, ServerConfig};
pub use gemini::{GeminiClient, GeminiError, TextGenerator};
pub use model::*;
pub use pdf::{PdfDocument, PdfError};
pub use quiz::{FailureKind, GenerationOptions, QuizError, QuizGenerator};
pub use scoring::score_quiz;
