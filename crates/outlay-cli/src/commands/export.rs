//! Export command implementation (CSV/JSON)

use std::path::Path;

use anyhow::{Context, Result};
use outlay_core::db::Database;
use outlay_core::export::ExpenseExportOptions;

use super::{parse_date, resolve_category};

#[allow(clippy::too_many_arguments)]
pub fn cmd_export(
    db: &Database,
    profile: Option<&str>,
    output: Option<&Path>,
    format: &str,
    from: Option<&str>,
    to: Option<&str>,
    category: Option<&str>,
    flagged: bool,
) -> Result<()> {
    let profile = db.resolve_profile(profile)?;
    let category_id = match category {
        Some(name) => Some(resolve_category(db, name)?.id),
        None => None,
    };

    let opts = ExpenseExportOptions {
        profile_id: Some(profile.id),
        from: from.map(parse_date).transpose()?,
        to: to.map(parse_date).transpose()?,
        category_id,
        flagged_only: flagged,
    };

    let (content, count) = match format {
        "csv" => {
            let csv = db.export_expenses_csv(&opts)?;
            let count = csv.lines().count().saturating_sub(1);
            (csv, count)
        }
        "json" => {
            let expenses = db.export_expenses(&opts)?;
            let json =
                serde_json::to_string_pretty(&expenses).context("Failed to serialize expenses")?;
            (json, expenses.len())
        }
        _ => anyhow::bail!("Invalid format: {}. Use 'csv' or 'json'.", format),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Exported {} expenses to {}", count, path.display());
        }
        None => {
            print!("{}", content);
        }
    }

    Ok(())
}
