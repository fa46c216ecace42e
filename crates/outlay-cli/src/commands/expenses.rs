//! Expense command implementations (add, list, show, edit, delete)

use anyhow::{Context, Result};
use chrono::Utc;
use outlay_core::db::{Database, ExpenseFilter};
use outlay_core::ledger::Ledger;
use outlay_core::models::{ExpenseUpdate, NewExpense, Recurrence};

use super::{parse_date, resolve_category, truncate};

#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &Database,
    profile: Option<&str>,
    amount: f64,
    category: &str,
    description: &str,
    date: Option<&str>,
    recurrence: &str,
    until: Option<&str>,
) -> Result<()> {
    if amount <= 0.0 {
        anyhow::bail!("Amount must be positive");
    }

    let profile = db.resolve_profile(profile)?;
    let category = resolve_category(db, category)?;
    let date = match date {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let recurrence: Recurrence = recurrence.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let until = until.map(parse_date).transpose()?;

    let ledger = Ledger::new(db);
    let created = ledger.create_expense(&NewExpense {
        profile_id: profile.id,
        category_id: category.id,
        amount,
        date,
        description: description.to_string(),
        recurrence,
        recurrence_end_date: until,
    })?;

    println!(
        "✅ Added expense #{}: ${:.2} │ {} │ {}",
        created.expense.id,
        created.expense.amount,
        created.expense.date,
        truncate(&created.expense.description, 40)
    );

    if created.instances_created > 0 {
        println!(
            "   📅 Generated {} upcoming {} instances (through {})",
            created.instances_created,
            created.expense.recurrence,
            created
                .expense
                .recurrence_end_date
                .map(|d| d.to_string())
                .unwrap_or_default()
        );
    }

    if let Some(detection) = created.detection {
        println!();
        println!(
            "   ⚠️  Unusual amount detected (confidence {:.0}%)",
            detection.confidence * 100.0
        );
        println!("      {}", detection.description);
        println!(
            "      Run 'outlay anomalies review {}' once you've checked it.",
            detection.anomaly_id
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_expenses_list(
    db: &Database,
    profile: Option<&str>,
    limit: i64,
    category: Option<&str>,
    flagged: bool,
    recurring: bool,
    search: Option<&str>,
) -> Result<()> {
    let profile = db.resolve_profile(profile)?;
    let category_id = match category {
        Some(name) => Some(resolve_category(db, name)?.id),
        None => None,
    };

    let filter = ExpenseFilter::new()
        .profile_id(Some(profile.id))
        .category_id(category_id)
        .flagged_only(flagged)
        .recurring_only(recurring)
        .description(search);
    let count_filter = ExpenseFilter::new()
        .profile_id(Some(profile.id))
        .category_id(category_id)
        .flagged_only(flagged)
        .recurring_only(recurring)
        .description(search);

    let expenses = db.list_expenses(filter, limit, 0)?;
    let total = db.count_expenses(count_filter)?;

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  outlay add -a 42.50 -c Groceries -d \"Weekly shop\"");
        return Ok(());
    }

    println!();
    println!("💸 Expenses ({} total)", total);
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in &expenses {
        let flag_mark = if expense.is_flagged { "⚠️ " } else { "  " };
        let recur_mark = if expense.recurrence.is_active() {
            "↻"
        } else {
            " "
        };

        println!(
            "   [{}] {} │ {:>9} │ {}{} {} │ {}",
            expense.id,
            expense.date,
            format!("${:.2}", expense.amount),
            flag_mark,
            recur_mark,
            expense.category_name.as_deref().unwrap_or("-"),
            truncate(&expense.description, 35)
        );
    }

    if total > expenses.len() as i64 {
        println!();
        println!("   Showing {} of {}. Use --limit to see more.", expenses.len(), total);
    }

    Ok(())
}

pub fn cmd_expenses_show(db: &Database, id: i64) -> Result<()> {
    let expense = db
        .get_expense(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    println!();
    println!("💸 Expense #{}", expense.id);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Amount: ${:.2}", expense.amount);
    println!("   Date: {}", expense.date);
    println!(
        "   Category: {}",
        expense.category_name.as_deref().unwrap_or("-")
    );
    println!("   Description: {}", expense.description);
    println!("   Recurrence: {}", expense.recurrence);
    if let Some(end) = expense.recurrence_end_date {
        println!("   Repeats until: {}", end);
    }
    if expense.is_flagged {
        println!("   ⚠️  Flagged as unusual. Run 'outlay anomalies' for details.");
    }

    if expense.recurrence.is_active() {
        let today = Utc::now().date_naive();
        let instances = db.list_instances(expense.id, false, today)?;
        if !instances.is_empty() {
            println!();
            println!("   📅 Instances ({})", instances.len());
            for instance in &instances {
                let paid_mark = if instance.is_paid { "✓" } else { " " };
                let edit_mark = if instance.is_modified { "✎" } else { " " };
                println!(
                    "      [{}] {} │ {:>9} │ {}{}",
                    instance.id,
                    instance.date,
                    format!("${:.2}", instance.amount),
                    paid_mark,
                    edit_mark
                );
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_expenses_edit(
    db: &Database,
    id: i64,
    amount: Option<f64>,
    category: Option<&str>,
    description: Option<&str>,
    date: Option<&str>,
    recurrence: Option<&str>,
    until: Option<&str>,
) -> Result<()> {
    let current = db
        .get_expense(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    if let Some(amount) = amount {
        if amount <= 0.0 {
            anyhow::bail!("Amount must be positive");
        }
    }

    let category_id = match category {
        Some(name) => resolve_category(db, name)?.id,
        None => current.category_id,
    };
    let new_recurrence = match recurrence {
        Some(s) => s
            .parse::<Recurrence>()
            .map_err(|e: String| anyhow::anyhow!(e))?,
        None => current.recurrence,
    };
    // Clearing recurrence drops the end date; otherwise a missing --until
    // keeps the current one.
    let end_date = if !new_recurrence.is_active() {
        None
    } else {
        match until {
            Some(s) => Some(parse_date(s)?),
            None => current.recurrence_end_date,
        }
    };

    let update = ExpenseUpdate {
        category_id,
        amount: amount.unwrap_or(current.amount),
        date: match date {
            Some(s) => parse_date(s)?,
            None => current.date,
        },
        description: description.unwrap_or(&current.description).to_string(),
        recurrence: new_recurrence,
        recurrence_end_date: end_date,
    };

    let ledger = Ledger::new(db);
    let updated = ledger.update_expense(id, &update)?;

    println!(
        "✅ Updated expense #{}: ${:.2} │ {} │ {}",
        updated.expense.id,
        updated.expense.amount,
        updated.expense.date,
        truncate(&updated.expense.description, 40)
    );
    if updated.instances_deleted > 0 || updated.instances_created > 0 {
        println!(
            "   📅 Instances: {} removed, {} regenerated (hand-edited ones kept)",
            updated.instances_deleted, updated.instances_created
        );
    }

    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, id: i64, yes: bool) -> Result<()> {
    use std::io::{self, Write};

    let expense = db
        .get_expense(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    if !yes {
        println!(
            "⚠️  This will delete expense #{} (${:.2} │ {}) along with its",
            expense.id, expense.amount, expense.date
        );
        println!("   recurring instances and anomaly records.");
        println!();
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let ledger = Ledger::new(db);
    ledger
        .delete_expense(id)
        .context("Failed to delete expense")?;

    println!("✅ Deleted expense #{}", id);

    Ok(())
}
