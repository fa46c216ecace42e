//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Outlay web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Parse allowed CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("OUTLAY_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (OUTLAY_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    // Ensure the default profile and categories exist (idempotent)
    db.seed_default_profile()
        .context("Failed to seed default profile")?;
    db.seed_default_categories()
        .context("Failed to seed default categories")?;

    let config = outlay_server::ServerConfig { allowed_origins };

    let static_dir_str = match static_dir {
        Some(p) => Some(p.to_str().context("static_dir path must be valid UTF-8")?),
        None => None,
    };
    outlay_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
