//! Domain models for Outlay

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A profile (the person whose ledger this is)
///
/// Outlay is self-hosted and has no account system; profiles scope
/// expenses and anomaly history so several people can share a database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// An expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    /// Seeded categories are marked default so the UI can distinguish them
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Recurrence cadence for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Whether this cadence generates instances at all
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown recurrence: {}", s)),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub profile_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub recurrence: Recurrence,
    /// Required when recurrence is anything other than none
    pub recurrence_end_date: Option<NaiveDate>,
    /// Set by the anomaly detector, cleared by a false-positive review
    pub is_flagged: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Joined data for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

/// Field values for creating an expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub profile_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub recurrence: Recurrence,
    pub recurrence_end_date: Option<NaiveDate>,
}

/// Replacement field values for editing an expense
///
/// Edits are whole-form updates: every field is present rather than
/// optional, and callers fill in current values for fields they keep.
#[derive(Debug, Clone)]
pub struct ExpenseUpdate {
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub recurrence: Recurrence,
    pub recurrence_end_date: Option<NaiveDate>,
}

/// One generated future occurrence of a recurring expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringInstance {
    pub id: i64,
    pub expense_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub is_paid: bool,
    /// Set once a user hand-edits the instance; exempts it from regeneration
    pub is_modified: bool,
    pub created_at: DateTime<Utc>,
}

/// Kinds of detected spending anomalies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    /// Amount exceeds trailing category history by more than 2 std devs
    Spike,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spike => "spike",
        }
    }
}

impl std::str::FromStr for AnomalyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spike" => Ok(Self::Spike),
            _ => Err(format!("Unknown anomaly kind: {}", s)),
        }
    }
}

/// A detected spending anomaly awaiting review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub id: i64,
    pub profile_id: i64,
    pub expense_id: i64,
    pub kind: AnomalyKind,
    /// Clamped to 1.0 above; the spike trigger keeps the raw value > 2/3
    pub confidence: f64,
    pub description: String,
    pub is_reviewed: bool,
    pub is_false_positive: bool,
    pub created_at: DateTime<Utc>,
    // Joined data for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense: Option<Expense>,
}

// ============================================================================
// Dashboard and report aggregates
// ============================================================================

/// Per-category spending within a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub color: Option<String>,
    pub amount: f64,
    pub percentage: f64,
}

/// Per-month spending total ("2024-03" style keys)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month: String,
    pub amount: f64,
}

/// Per-weekday spending total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayOfWeekSpending {
    pub day: String,
    pub amount: f64,
}

/// Dashboard summary over the trailing 180 days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_spent: f64,
    pub expense_count: i64,
    pub average_amount: f64,
    pub categories: Vec<CategorySpending>,
    pub monthly: Vec<MonthlySpending>,
    /// Most recent flagged expenses (up to 5)
    pub flagged: Vec<Expense>,
    /// Next upcoming recurring instances (up to 5)
    pub upcoming: Vec<RecurringInstance>,
}

/// Spending report for an explicit date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_spent: f64,
    pub expense_count: i64,
    pub average_monthly: f64,
    pub monthly_trend: Vec<MonthlySpending>,
    pub categories: Vec<CategorySpending>,
    pub day_of_week: Vec<DayOfWeekSpending>,
    /// Largest expenses in the range (up to 10)
    pub largest: Vec<Expense>,
}
