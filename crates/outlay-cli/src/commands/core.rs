//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `parse_date` / `resolve_category` - Shared argument helpers
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use outlay_core::db::Database;
use outlay_core::models::Category;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

/// Look up a category by name (case-insensitive), failing with a hint
pub fn resolve_category(db: &Database, name: &str) -> Result<Category> {
    db.get_category_by_name(name)?.ok_or_else(|| {
        anyhow::anyhow!(
            "Category '{}' not found. Run 'outlay categories' to see available categories.",
            name
        )
    })
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;

    db.seed_default_profile()
        .context("Failed to seed default profile")?;
    println!("   Seeded default profile");

    db.seed_default_categories()
        .context("Failed to seed default categories")?;
    println!("   Seeded default categories");

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: outlay add -a 42.50 -c Groceries -d \"Weekly shop\"");
    println!("  2. Start web UI: outlay serve");

    Ok(())
}
