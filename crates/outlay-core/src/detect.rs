//! Expense anomaly detection
//!
//! Flags a newly created expense as a spending spike when it exceeds the
//! mean of its trailing same-category history by more than two population
//! standard deviations. Detection runs once, synchronously, at creation.

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::db::{self, Database};
use crate::error::{Error, Result};
use crate::models::{Anomaly, AnomalyKind, Expense};

/// Trailing history window, in days
const HISTORY_WINDOW_DAYS: i64 = 180;

/// Minimum prior expenses required before detection runs
///
/// A hard floor, not a tunable: fewer samples carry no meaningful signal.
const MIN_HISTORY: usize = 5;

/// Spike trigger threshold, in standard deviations above the mean
const SPIKE_THRESHOLD_STD_DEVS: f64 = 2.0;

/// Divisor for the confidence score, in standard deviations
const CONFIDENCE_STD_DEVS: f64 = 3.0;

/// What the detector found for one expense
#[derive(Debug, Clone)]
pub struct Detection {
    pub anomaly_id: i64,
    pub kind: AnomalyKind,
    pub confidence: f64,
    pub description: String,
}

/// Statistical spike detector over a profile's category history
pub struct AnomalyDetector<'a> {
    db: &'a Database,
}

impl<'a> AnomalyDetector<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Run detection for an expense in its own transaction
    ///
    /// Returns `Ok(None)` when history is insufficient or the amount is
    /// within range; never an error for those cases.
    pub fn detect(&self, expense_id: i64) -> Result<Option<Detection>> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let expense = db::expenses::get_expense(&tx, expense_id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", expense_id)))?;
        let detection = detect_in(&tx, &expense, Utc::now().date_naive())?;

        tx.commit()?;
        Ok(detection)
    }

    /// Review an anomaly, resolving the linked expense's flag
    ///
    /// A false positive clears the flag; a confirmed spike keeps it set.
    /// Idempotent: re-reviewing re-applies the same state.
    pub fn review(&self, anomaly_id: i64, is_false_positive: bool) -> Result<Anomaly> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;

        let anomaly = db::anomalies::get_anomaly(&tx, anomaly_id)?
            .ok_or_else(|| Error::NotFound(format!("anomaly {}", anomaly_id)))?;

        db::anomalies::mark_reviewed(&tx, anomaly_id, is_false_positive)?;
        db::expenses::set_flagged(&tx, anomaly.expense_id, !is_false_positive)?;

        tx.commit()?;

        info!(
            anomaly_id,
            is_false_positive, "Anomaly reviewed"
        );

        self.db
            .get_anomaly(anomaly_id)?
            .ok_or_else(|| Error::NotFound(format!("anomaly {}", anomaly_id)))
    }
}

/// Run spike detection for `expense` within an open transaction
pub(crate) fn detect_in(
    conn: &Connection,
    expense: &Expense,
    today: NaiveDate,
) -> Result<Option<Detection>> {
    let window_start = today - Duration::days(HISTORY_WINDOW_DAYS);
    let priors = db::expenses::prior_category_amounts(
        conn,
        expense.profile_id,
        expense.category_id,
        window_start,
        expense.date,
    )?;

    if priors.len() < MIN_HISTORY {
        debug!(
            expense_id = expense.id,
            priors = priors.len(),
            "Skipping anomaly detection: insufficient history"
        );
        return Ok(None);
    }

    let mu = mean(&priors);
    let sigma = population_std_dev(&priors, mu);

    if expense.amount <= mu + SPIKE_THRESHOLD_STD_DEVS * sigma {
        return Ok(None);
    }

    let confidence = spike_confidence(expense.amount, mu, sigma);
    let description = format!(
        "This expense is significantly higher than your usual spending in this category. \
         Average: {:.2}, This expense: {:.2}",
        mu, expense.amount
    );

    let anomaly_id = db::anomalies::insert_anomaly(
        conn,
        expense.profile_id,
        expense.id,
        AnomalyKind::Spike,
        confidence,
        &description,
    )?;
    db::expenses::set_flagged(conn, expense.id, true)?;

    info!(
        expense_id = expense.id,
        amount = expense.amount,
        mean = mu,
        std_dev = sigma,
        confidence,
        "Spending spike detected"
    );

    Ok(Some(Detection {
        anomaly_id,
        kind: AnomalyKind::Spike,
        confidence,
        description,
    }))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n, not n-1)
fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Confidence score for a spike: (amount - mean) / (3 sigma), clamped to 1.0
///
/// When sigma is zero the literal formula divides by zero; an amount above
/// a perfectly constant history is treated as maximal confidence. There is
/// deliberately no lower clamp: the spike trigger already bounds the raw
/// value above 2/3.
fn spike_confidence(amount: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 1.0;
    }
    ((amount - mean) / (CONFIDENCE_STD_DEVS * std_dev)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mu = mean(&values);
        assert!((mu - 5.0).abs() < 1e-9);
        // Classic population-vs-sample example: population sigma is exactly 2
        assert!((population_std_dev(&values, mu) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_clamped_above() {
        // Far outlier: raw score would exceed 1.0
        assert_eq!(spike_confidence(1000.0, 10.0, 5.0), 1.0);
    }

    #[test]
    fn test_confidence_below_clamp() {
        // amount = mean + 2.1 sigma -> 2.1/3 = 0.7
        let c = spike_confidence(10.0 + 2.1 * 4.0, 10.0, 4.0);
        assert!((c - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_degenerate_sigma_is_maximal() {
        assert_eq!(spike_confidence(100.0, 10.0, 0.0), 1.0);
    }
}
