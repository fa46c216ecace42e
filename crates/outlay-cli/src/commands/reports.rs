//! Dashboard and report command implementations

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use outlay_core::db::Database;

use super::truncate;

/// Resolve a period string to (from_date, to_date)
pub fn resolve_period(
    period: &str,
    custom_from: Option<&str>,
    custom_to: Option<&str>,
) -> Result<(NaiveDate, NaiveDate)> {
    // If custom dates provided, use those
    if let (Some(from), Some(to)) = (custom_from, custom_to) {
        let from_date = NaiveDate::parse_from_str(from, "%Y-%m-%d")
            .context("Invalid --from date format (use YYYY-MM-DD)")?;
        let to_date = NaiveDate::parse_from_str(to, "%Y-%m-%d")
            .context("Invalid --to date format (use YYYY-MM-DD)")?;
        return Ok((from_date, to_date));
    }

    let today = Utc::now().date_naive();

    match period.to_lowercase().as_str() {
        "this-month" => {
            let from = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
            Ok((from, today))
        }
        "last-month" => {
            let last_month = if today.month() == 1 {
                NaiveDate::from_ymd_opt(today.year() - 1, 12, 1).unwrap()
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() - 1, 1).unwrap()
            };
            let last_day = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
                .unwrap()
                .pred_opt()
                .unwrap();
            Ok((last_month, last_day))
        }
        "this-year" => {
            let from = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap();
            Ok((from, today))
        }
        "last-30-days" => {
            let from = today - chrono::Duration::days(30);
            Ok((from, today))
        }
        "last-90-days" => {
            let from = today - chrono::Duration::days(90);
            Ok((from, today))
        }
        "all" => {
            let from = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            Ok((from, today))
        }
        _ => anyhow::bail!(
            "Unknown period: {}. Available: this-month, last-month, this-year, last-30-days, last-90-days, all",
            period
        ),
    }
}

pub fn cmd_dashboard(db: &Database, profile: Option<&str>) -> Result<()> {
    let profile = db.resolve_profile(profile)?;
    let today = Utc::now().date_naive();
    let summary = db.dashboard_summary(profile.id, today)?;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💰 Outlay Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Profile:         {}", profile.name);
    println!("  Expenses (180d): {}", summary.expense_count);
    println!("  Total spent:     ${:.2}", summary.total_spent);
    println!("  Average:         ${:.2}", summary.average_amount);

    if !summary.categories.is_empty() {
        println!();
        println!("  By category:");
        for cat in &summary.categories {
            println!(
                "    {:20} ${:>9.2} ({:.1}%)",
                truncate(&cat.category, 20),
                cat.amount,
                cat.percentage
            );
        }
    }

    if !summary.upcoming.is_empty() {
        println!();
        println!("  📅 Upcoming recurring:");
        for instance in &summary.upcoming {
            println!("    {} │ ${:.2}", instance.date, instance.amount);
        }
    }

    if !summary.flagged.is_empty() {
        println!();
        println!("  ⚠️  Recently flagged:");
        for expense in &summary.flagged {
            println!(
                "    [{}] {} │ ${:.2} │ {}",
                expense.id,
                expense.date,
                expense.amount,
                truncate(&expense.description, 30)
            );
        }
        println!();
        println!("  Run 'outlay anomalies' to review what was flagged.");
    }

    println!();
    Ok(())
}

pub fn cmd_report(
    db: &Database,
    profile: Option<&str>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<()> {
    if from > to {
        anyhow::bail!("'from' must not be after 'to'");
    }

    let profile = db.resolve_profile(profile)?;
    let report = db.spending_report(profile.id, from, to)?;

    println!();
    println!("📊 Spending Report");
    println!("   Period: {} to {}", report.from, report.to);
    println!("   ─────────────────────────────────────────────────────────────");

    if report.expense_count == 0 {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!("   Total: ${:.2}", report.total_spent);
    println!("   Expenses: {}", report.expense_count);
    println!("   Monthly average: ${:.2}", report.average_monthly);

    println!();
    println!("   {:20} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ─────────────────────┼────────────┼────────");
    for cat in &report.categories {
        println!(
            "   {:20} │ {:>10.2} │ {:>5.1}%",
            truncate(&cat.category, 20),
            cat.amount,
            cat.percentage
        );
    }

    if !report.monthly_trend.is_empty() {
        println!();
        println!("   {:12} │ {:>10}", "Month", "Amount");
        println!("   ─────────────┼────────────");
        for month in &report.monthly_trend {
            println!("   {:12} │ {:>10.2}", month.month, month.amount);
        }
    }

    if !report.day_of_week.is_empty() {
        println!();
        println!("   {:12} │ {:>10}", "Day", "Amount");
        println!("   ─────────────┼────────────");
        for day in &report.day_of_week {
            println!("   {:12} │ {:>10.2}", day.day, day.amount);
        }
    }

    if !report.largest.is_empty() {
        println!();
        println!("   Largest expenses:");
        for expense in &report.largest {
            println!(
                "   [{}] {} │ ${:>9.2} │ {}",
                expense.id,
                expense.date,
                expense.amount,
                truncate(&expense.description, 35)
            );
        }
    }

    Ok(())
}
