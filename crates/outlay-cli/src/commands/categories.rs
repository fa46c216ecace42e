//! Category command implementations

use anyhow::Result;
use outlay_core::db::Database;

pub fn cmd_categories_list(db: &Database) -> Result<()> {
    let categories = db.list_categories()?;

    if categories.is_empty() {
        println!("No categories found. Run 'outlay init' to seed the defaults.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────");

    for category in categories {
        match category.color {
            Some(ref color) => println!("   [{}] {} ({})", category.id, category.name, color),
            None => println!("   [{}] {}", category.id, category.name),
        }
    }

    Ok(())
}

pub fn cmd_categories_add(db: &Database, name: &str, color: Option<&str>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Category name must not be blank");
    }

    let id = db.create_category(name, color)?;
    println!("✅ Added category [{}] {}", id, name);

    Ok(())
}

pub fn cmd_categories_update(
    db: &Database,
    id: i64,
    name: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    db.get_category(id)?
        .ok_or_else(|| anyhow::anyhow!("Category {} not found", id))?;

    if name.is_none() && color.is_none() {
        anyhow::bail!("Nothing to update. Pass --name and/or --color.");
    }

    db.update_category(id, name, color)?;

    let category = db
        .get_category(id)?
        .ok_or_else(|| anyhow::anyhow!("Category {} not found", id))?;
    println!("✅ Updated category [{}] {}", category.id, category.name);

    Ok(())
}

pub fn cmd_categories_delete(db: &Database, id: i64) -> Result<()> {
    let category = db
        .get_category(id)?
        .ok_or_else(|| anyhow::anyhow!("Category {} not found", id))?;

    db.delete_category(id)?;
    println!("✅ Deleted category '{}'", category.name);

    Ok(())
}
