//! Profile command implementations

use anyhow::Result;
use outlay_core::db::Database;

pub fn cmd_profiles_list(db: &Database) -> Result<()> {
    let profiles = db.list_profiles()?;

    if profiles.is_empty() {
        println!("No profiles found. Run 'outlay init' to seed the default profile.");
        return Ok(());
    }

    println!();
    println!("👤 Profiles");
    println!("   ─────────────────────────────");

    for profile in profiles {
        println!("   [{}] {}", profile.id, profile.name);
    }

    println!();
    println!("   Scope any command to a profile with --profile <name>.");

    Ok(())
}

pub fn cmd_profiles_add(db: &Database, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Profile name must not be blank");
    }

    let id = db.upsert_profile(name)?;
    println!("✅ Profile [{}] {} is ready.", id, name);

    Ok(())
}
