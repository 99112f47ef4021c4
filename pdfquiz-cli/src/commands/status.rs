//! `pdfquiz status` command - Check server status

use anyhow::Result;
use pdfquiz_core::Config;

fn field<'a>(health: &'a serde_json::Value, key: &str) -> &'a str {
    health.get(key).and_then(|v| v.as_str()).unwrap_or("unknown")
}

pub async fn run(config: Config) -> Result<()> {
    let url = format!("{}/health", config.server_url());

    println!("Checking pdfquiz server status...");
    println!("URL: {}", url);

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                let health: serde_json::Value = response.json().await?;

                println!("\n✅ pdfquiz server is running");
                println!("   Status:          {}", field(&health, "status"));
                println!("   Version:         {}", field(&health, "version"));
                println!("   Max file size:   {}", field(&health, "maxFileSize"));
                println!("   Checked at:      {}", field(&health, "timestamp"));

                if let Some(features) = health.get("features").and_then(|v| v.as_array()) {
                    let names: Vec<&str> = features.iter().filter_map(|f| f.as_str()).collect();
                    println!("   Features:        {}", names.join(", "));
                }
            } else {
                println!(
                    "\n⚠️  pdfquiz server responded with status: {}",
                    response.status()
                );
            }
        }
        Err(_) => {
            println!("\n❌ pdfquiz server is not running");
            println!("   Start it with: pdfquiz serve");
        }
    }

    Ok(())
}
