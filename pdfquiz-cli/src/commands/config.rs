//! `pdfquiz config` commands - View and manage configuration

use anyhow::Result;
use pdfquiz_core::Config;

/// Show current configuration
pub fn show(config: Config) -> Result<()> {
    let api_key = if config.gemini.api_key.is_some() {
        "set"
    } else {
        "not set"
    };

    println!("╭─────────────────────────────────────────╮");
    println!("│         pdfquiz Configuration           │");
    println!("├─────────────────────────────────────────┤");
    println!("│ Gemini                                  │");
    println!("│   Model:        {:<23} │", truncate(&config.gemini.model, 23));
    println!("│   API key:      {:<23} │", api_key);
    println!("│   Timeout:      {:<23} │", format!("{}s", config.gemini.timeout_secs));
    println!(
        "│   Call delay:   {:<23} │",
        format!("{}ms", config.gemini.inter_call_delay_ms)
    );
    println!("├─────────────────────────────────────────┤");
    println!("│ Server                                  │");
    println!("│   Host:         {:<23} │", config.server.host);
    println!("│   Port:         {:<23} │", config.server.port);
    println!("│   URL:          {:<23} │", truncate(&config.server_url(), 23));
    println!(
        "│   Max upload:   {:<23} │",
        format!("{} bytes", config.server.max_upload_bytes)
    );
    println!(
        "│   Uploads:      {:<23} │",
        truncate(&config.server.upload_dir.display().to_string(), 23)
    );
    println!("├─────────────────────────────────────────┤");
    println!("│ Generation                              │");
    println!("│   Chunk size:   {:<23} │", config.generation.max_chunk_chars);
    println!("├─────────────────────────────────────────┤");
    println!("│ Logging                                 │");
    println!("│   Level:        {:<23} │", config.logging.level);
    println!("╰─────────────────────────────────────────╯");

    println!("\n📁 Paths:");
    if let Some(path) = Config::default_config_path() {
        let exists = path.exists();
        println!(
            "   Config:   {} {}",
            path.display(),
            if exists { "✓" } else { "(not created)" }
        );
    }

    Ok(())
}

/// Initialize default configuration
pub fn init(force: bool) -> Result<()> {
    let path = Config::default_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

    if path.exists() && !force {
        println!(
            "⚠️  Configuration file already exists at: {}",
            path.display()
        );
        println!("   Use --force to overwrite.");
        return Ok(());
    }

    Config::ensure_dirs()?;

    let config = Config::default();
    config.save_to_file(&path)?;

    println!("✅ Created configuration file at: {}", path.display());
    println!("\n📝 Default configuration:");
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 23), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
