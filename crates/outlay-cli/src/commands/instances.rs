//! Recurring instance command implementations

use anyhow::Result;
use chrono::Utc;
use outlay_core::db::Database;
use outlay_core::ledger::{InstanceEdit, Ledger};

use super::parse_date;

pub fn cmd_instances_list(db: &Database, expense_id: i64, upcoming: bool) -> Result<()> {
    let expense = db
        .get_expense(expense_id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", expense_id))?;

    let today = Utc::now().date_naive();
    let instances = db.list_instances(expense_id, upcoming, today)?;

    if instances.is_empty() {
        if expense.recurrence.is_active() {
            println!("No {} instances found.", if upcoming { "upcoming" } else { "generated" });
        } else {
            println!("Expense {} is not recurring.", expense_id);
        }
        return Ok(());
    }

    println!();
    println!(
        "📅 Instances of expense #{} ({}, until {})",
        expense.id,
        expense.recurrence,
        expense
            .recurrence_end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("   ─────────────────────────────────────────────");

    for instance in &instances {
        let paid_mark = if instance.is_paid { "✓ paid" } else { "      " };
        let edit_mark = if instance.is_modified { "✎ edited" } else { "" };
        println!(
            "   [{}] {} │ {:>9} │ {} {}",
            instance.id,
            instance.date,
            format!("${:.2}", instance.amount),
            paid_mark,
            edit_mark
        );
    }

    Ok(())
}

pub fn cmd_instances_edit(
    db: &Database,
    id: i64,
    date: Option<&str>,
    amount: Option<f64>,
    paid: bool,
    unpaid: bool,
) -> Result<()> {
    if paid && unpaid {
        anyhow::bail!("--paid and --unpaid are mutually exclusive");
    }

    let current = db
        .get_instance(id)?
        .ok_or_else(|| anyhow::anyhow!("Recurring instance {} not found", id))?;

    if let Some(amount) = amount {
        if amount <= 0.0 {
            anyhow::bail!("Amount must be positive");
        }
    }

    let is_paid = if paid {
        true
    } else if unpaid {
        false
    } else {
        current.is_paid
    };

    let ledger = Ledger::new(db);
    let instance = ledger.edit_instance(
        id,
        &InstanceEdit {
            date: match date {
                Some(s) => parse_date(s)?,
                None => current.date,
            },
            amount: amount.unwrap_or(current.amount),
            is_paid,
        },
    )?;

    println!(
        "✅ Updated instance #{}: {} │ ${:.2}{}",
        instance.id,
        instance.date,
        instance.amount,
        if instance.is_paid { " │ paid" } else { "" }
    );
    println!("   This instance is now exempt from schedule regeneration.");

    Ok(())
}
