//! `pdfquiz serve` command - Start the HTTP server

use anyhow::Result;
use pdfquiz_core::{server, Config, QuizGenerator};
use std::sync::Arc;
use tracing::info;

pub async fn run(config: Config) -> Result<()> {
    info!("Starting pdfquiz server...");

    if config.gemini.api_key.is_none() {
        eprintln!("⚠️  Warning: no Gemini API key configured");
        eprintln!("   Set GEMINI_API_KEY before uploading documents.");
    }

    let generator = QuizGenerator::from_config(&config)?;
    let state = Arc::new(server::AppState::new(generator, config.clone()));

    println!("🚀 pdfquiz server starting on {}", config.server_url());
    println!("   Upload endpoint: {}/upload", config.server_url());
    println!("   Health check:    {}/health", config.server_url());
    println!("   Model:           {}", config.gemini.model);
    println!("   Press Ctrl+C to stop");

    server::start_server(state).await?;

    Ok(())
}
