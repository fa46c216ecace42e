//! Dashboard summary and spending report aggregates

use chrono::{Duration, NaiveDate};
use rusqlite::params;

use super::expenses::{row_to_expense, EXPENSE_COLUMNS};
use super::Database;
use crate::error::Result;
use crate::models::{
    CategorySpending, DashboardSummary, DayOfWeekSpending, Expense, MonthlySpending,
    SpendingReport,
};

/// Trailing window the dashboard summarizes, in days
const DASHBOARD_WINDOW_DAYS: i64 = 180;

impl Database {
    /// Dashboard summary over the trailing 180 days
    pub fn dashboard_summary(&self, profile_id: i64, today: NaiveDate) -> Result<DashboardSummary> {
        let conn = self.conn()?;
        let window_start = today - Duration::days(DASHBOARD_WINDOW_DAYS);

        let (total_spent, expense_count, average_amount): (f64, i64, f64) = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0), COUNT(*), COALESCE(AVG(amount), 0) \
             FROM expenses WHERE profile_id = ? AND date >= ? AND date <= ?",
            params![profile_id, window_start.to_string(), today.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let categories = self.category_spending(profile_id, window_start, today, total_spent)?;
        let monthly = self.monthly_spending(profile_id, window_start, today)?;

        // Most recent flagged expenses
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses e JOIN categories c ON e.category_id = c.id \
             WHERE e.profile_id = ? AND e.is_flagged = 1 \
             ORDER BY e.date DESC, e.id DESC LIMIT 5",
            EXPENSE_COLUMNS
        ))?;
        let flagged = stmt
            .query_map(params![profile_id], row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        drop(stmt);

        let upcoming = self.upcoming_instances(profile_id, today, 5)?;

        Ok(DashboardSummary {
            total_spent,
            expense_count,
            average_amount,
            categories,
            monthly,
            flagged,
            upcoming,
        })
    }

    /// Spending report for an explicit [from, to] range
    pub fn spending_report(
        &self,
        profile_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SpendingReport> {
        let conn = self.conn()?;

        let (total_spent, expense_count): (f64, i64) = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0), COUNT(*) \
             FROM expenses WHERE profile_id = ? AND date >= ? AND date <= ?",
            params![profile_id, from.to_string(), to.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let monthly_trend = self.monthly_spending(profile_id, from, to)?;
        let average_monthly = if monthly_trend.is_empty() {
            0.0
        } else {
            monthly_trend.iter().map(|m| m.amount).sum::<f64>() / monthly_trend.len() as f64
        };

        let categories = self.category_spending(profile_id, from, to, total_spent)?;

        // Day-of-week totals (strftime %w: 0 = Sunday)
        let mut stmt = conn.prepare(
            "SELECT strftime('%w', date), COALESCE(SUM(amount), 0) FROM expenses \
             WHERE profile_id = ? AND date >= ? AND date <= ? \
             GROUP BY strftime('%w', date) ORDER BY strftime('%w', date)",
        )?;
        let day_of_week = stmt
            .query_map(
                params![profile_id, from.to_string(), to.to_string()],
                |row| {
                    let dow: String = row.get(0)?;
                    Ok(DayOfWeekSpending {
                        day: weekday_name(&dow).to_string(),
                        amount: row.get(1)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        drop(stmt);

        // Largest expenses in the range
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses e JOIN categories c ON e.category_id = c.id \
             WHERE e.profile_id = ? AND e.date >= ? AND e.date <= ? \
             ORDER BY e.amount DESC, e.id DESC LIMIT 10",
            EXPENSE_COLUMNS
        ))?;
        let largest: Vec<Expense> = stmt
            .query_map(
                params![profile_id, from.to_string(), to.to_string()],
                row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(SpendingReport {
            from,
            to,
            total_spent,
            expense_count,
            average_monthly,
            monthly_trend,
            categories,
            day_of_week,
            largest,
        })
    }

    /// Per-category totals with percentage of the period total
    fn category_spending(
        &self,
        profile_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        total: f64,
    ) -> Result<Vec<CategorySpending>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT c.name, c.color, COALESCE(SUM(e.amount), 0) AS spent \
             FROM expenses e JOIN categories c ON e.category_id = c.id \
             WHERE e.profile_id = ? AND e.date >= ? AND e.date <= ? \
             GROUP BY c.id ORDER BY spent DESC",
        )?;

        let categories = stmt
            .query_map(
                params![profile_id, from.to_string(), to.to_string()],
                |row| {
                    let amount: f64 = row.get(2)?;
                    Ok(CategorySpending {
                        category: row.get(0)?,
                        color: row.get(1)?,
                        amount,
                        percentage: if total > 0.0 {
                            amount / total * 100.0
                        } else {
                            0.0
                        },
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Per-month totals keyed "YYYY-MM", ascending
    fn monthly_spending(
        &self,
        profile_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MonthlySpending>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT strftime('%Y-%m', date) AS month, COALESCE(SUM(amount), 0) \
             FROM expenses WHERE profile_id = ? AND date >= ? AND date <= ? \
             GROUP BY month ORDER BY month",
        )?;

        let monthly = stmt
            .query_map(
                params![profile_id, from.to_string(), to.to_string()],
                |row| {
                    Ok(MonthlySpending {
                        month: row.get(0)?,
                        amount: row.get(1)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(monthly)
    }
}

fn weekday_name(strftime_w: &str) -> &'static str {
    match strftime_w {
        "0" => "Sunday",
        "1" => "Monday",
        "2" => "Tuesday",
        "3" => "Wednesday",
        "4" => "Thursday",
        "5" => "Friday",
        "6" => "Saturday",
        _ => "Unknown",
    }
}
