//! HTTP server for the pdfquiz API.
//!
//! `POST /upload` takes a multipart PDF and answers with a summary and quiz.
//! Uploads are written to a temporary file inside the configured upload
//! directory and removed once the request finishes, whatever the outcome.

use crate::config::Config;
use crate::model::{
    HealthResponse, QuizResponse, ScoreReport, ScoreRequest, UploadErrorBody, UploadForm,
};
use crate::quiz::{QuizError, QuizGenerator};
use crate::scoring::score_quiz;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection}, DefaultBodyLimit, Multipart,
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, instrument, warn};
use utoipa::OpenApi;
use uuid::Uuid;

/// Multipart field that carries the document
const UPLOAD_FIELD: &str = "pdf";

/// Capabilities advertised by `/health`
const FEATURES: [&str; 3] = ["large-pdf-support", "adaptive-questions", "topic-analysis"];

/// OpenAPI documentation for the pdfquiz API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pdfquiz API",
        version = "0.1.0",
        description = "Upload a PDF and receive a summary plus an adaptive multiple-choice quiz \
                       generated with Gemini. Completed quizzes can be scored per topic.",
        license(name = "MIT"),
        contact(name = "pdfquiz Contributors")
    ),
    servers(
        (url = "http://127.0.0.1:5000", description = "Local development server")
    ),
    paths(upload_pdf, score_answers, health_check),
    components(schemas(
        crate::model::Question,
        crate::model::ProcessingInfo,
        crate::model::QuizResponse,
        crate::model::UploadForm,
        crate::model::UploadErrorBody,
        crate::model::HealthResponse,
        crate::model::ScoreRequest,
        crate::model::QuestionResult,
        crate::model::TopicScore,
        crate::model::ScoreReport,
    )),
    tags(
        (name = "Quiz", description = "PDF summarization and quiz generation"),
        (name = "Scoring", description = "Scoring completed quizzes"),
        (name = "Health", description = "Server health and status")
    )
)]
pub struct ApiDoc;

/// Shared application state
pub struct AppState {
    pub generator: QuizGenerator,
    pub config: Config,
}

impl AppState {
    pub fn new(generator: QuizGenerator, config: Config) -> Self {
        Self { generator, config }
    }
}

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        // OpenAPI documentation (JSON spec)
        .route("/openapi.json", get(openapi_json))
        .route("/upload", post(upload_pdf))
        .route("/score", post(score_answers))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OpenAPI JSON specification endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Human-readable upload limit, e.g. `100MB`
fn format_size_limit(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{}B", bytes)
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server health status", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        max_file_size: format_size_limit(state.config.server.max_upload_bytes),
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
    })
}

/// Generate a summary and quiz from an uploaded PDF
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Quiz",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Summary and quiz", body = QuizResponse),
        (status = 400, description = "No file uploaded", body = UploadErrorBody),
        (status = 413, description = "Upload too large", body = UploadErrorBody),
        (status = 500, description = "Processing failed", body = UploadErrorBody)
    )
)]
#[instrument(skip(state, multipart), fields(request_id = %Uuid::new_v4()))]
async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<QuizResponse>, AppError> {
    let expose = state.config.server.expose_error_details;

    // A body that is not a multipart form cannot carry the file
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Upload is not a multipart form: {}", rejection);
        AppError::NoFile
    })?;

    let Some(upload) = receive_upload(&mut multipart, &state.config.server.upload_dir)
        .await?
    else {
        return Err(AppError::NoFile);
    };

    info!("Processing upload at {}", upload.path().display());

    let result = state.generator.generate_from_pdf(upload.path()).await;

    if let Err(e) = upload.close() {
        warn!("Failed to remove uploaded file: {}", e);
    }

    let quiz = result.map_err(|e| AppError::processing(e, expose))?;

    info!(
        "Returning {} questions for {} pages",
        quiz.questions.len(),
        quiz.page_count
    );
    Ok(Json(quiz))
}

/// Store the `pdf` field, if present, in a temp file under `upload_dir`.
///
/// Other fields are skipped.
async fn receive_upload(
    multipart: &mut Multipart,
    upload_dir: &Path,
) -> Result<Option<NamedTempFile>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        debug!("Received {:?} ({} bytes)", file_name, bytes.len());

        let file = write_upload(upload_dir, &bytes)
            .await
            .map_err(AppError::Storage)?;
        return Ok(Some(file));
    }

    Ok(None)
}

async fn write_upload(upload_dir: &Path, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".pdf")
        .tempfile_in(upload_dir)?;
    tokio::fs::write(file.path(), bytes).await?;
    Ok(file)
}

/// Score a completed quiz
#[utoipa::path(
    post,
    path = "/score",
    tag = "Scoring",
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Score with per-topic breakdown", body = ScoreReport)
    )
)]
async fn score_answers(Json(request): Json<ScoreRequest>) -> Json<ScoreReport> {
    let report = score_quiz(&request.questions, &request.answers);
    debug!(
        "Scored {}/{} ({}%)",
        report.score, report.total, report.percentage
    );
    Json(report)
}

/// API error type
#[derive(Debug)]
pub enum AppError {
    /// No `pdf` field in the form
    NoFile,
    /// The multipart body could not be read (including oversized uploads)
    Multipart(MultipartError),
    /// The upload could not be written to disk
    Storage(std::io::Error),
    /// The pipeline failed for the whole document
    Processing { error: QuizError, expose: bool },
}

impl AppError {
    fn processing(error: QuizError, expose: bool) -> Self {
        AppError::Processing { error, expose }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Multipart(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NoFile => (
                StatusCode::BAD_REQUEST,
                UploadErrorBody::new("No file uploaded"),
            ),
            AppError::Multipart(e) => {
                warn!("Rejected multipart body: {}", e);
                (e.status(), UploadErrorBody::new(e.body_text()))
            }
            AppError::Storage(e) => {
                error!("Failed to store upload: {}", e);
                let error = QuizError::Io(e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UploadErrorBody::new(error.user_message()),
                )
            }
            AppError::Processing { error, expose } => {
                error!("Error processing PDF: {}", error);
                let body = UploadErrorBody::new(error.user_message());
                let body = if expose {
                    body.with_details(error.to_string())
                } else {
                    body
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Start the HTTP server
pub async fn start_server(state: Arc<AppState>) -> Result<(), std::io::Error> {
    let addr = state.config.server_addr();
    let router = create_router(state);

    info!("Starting pdfquiz server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
