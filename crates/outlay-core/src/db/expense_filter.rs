//! Expense filter builder for constructing dynamic SQL queries
//!
//! This module provides a builder pattern for constructing WHERE clauses
//! and related SQL components for expense queries, replacing ad-hoc
//! per-field query assembly with one declarative place.

use chrono::NaiveDate;

/// Builder for constructing expense query filters
///
/// The lifetime `'query` represents how long the borrowed filter parameters
/// (the description search term) must remain valid.
#[derive(Default)]
pub struct ExpenseFilter<'query> {
    pub profile_id: Option<i64>,
    pub category_id: Option<i64>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub description: Option<&'query str>,
    pub flagged_only: bool,
    pub recurring_only: bool,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> ExpenseFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set profile filter
    pub fn profile_id(mut self, id: Option<i64>) -> Self {
        self.profile_id = id;
        self
    }

    /// Set category filter
    pub fn category_id(mut self, id: Option<i64>) -> Self {
        self.category_id = id;
        self
    }

    /// Set start date filter (inclusive)
    pub fn from_date(mut self, from: Option<NaiveDate>) -> Self {
        self.from_date = from;
        self
    }

    /// Set end date filter (inclusive)
    pub fn to_date(mut self, to: Option<NaiveDate>) -> Self {
        self.to_date = to;
        self
    }

    /// Set minimum amount filter
    pub fn min_amount(mut self, min: Option<f64>) -> Self {
        self.min_amount = min;
        self
    }

    /// Set maximum amount filter
    pub fn max_amount(mut self, max: Option<f64>) -> Self {
        self.max_amount = max;
        self
    }

    /// Set description substring search (case-insensitive)
    pub fn description(mut self, query: Option<&'query str>) -> Self {
        self.description = query;
        self
    }

    /// Only expenses flagged by the anomaly detector
    pub fn flagged_only(mut self, value: bool) -> Self {
        self.flagged_only = value;
        self
    }

    /// Only expenses with an active recurrence
    pub fn recurring_only(mut self, value: bool) -> Self {
        self.recurring_only = value;
        self
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(pid) = self.profile_id {
            conditions.push("e.profile_id = ?".to_string());
            params.push(Box::new(pid));
        }

        if let Some(cid) = self.category_id {
            conditions.push("e.category_id = ?".to_string());
            params.push(Box::new(cid));
        }

        if let Some(from) = self.from_date {
            conditions.push("e.date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.to_date {
            conditions.push("e.date <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }

        if let Some(min) = self.min_amount {
            conditions.push("e.amount >= ?".to_string());
            params.push(Box::new(min));
        }

        if let Some(max) = self.max_amount {
            conditions.push("e.amount <= ?".to_string());
            params.push(Box::new(max));
        }

        if let Some(q) = self.description {
            if !q.trim().is_empty() {
                conditions.push("e.description LIKE ? COLLATE NOCASE".to_string());
                params.push(Box::new(format!("%{}%", q.trim())));
            }
        }

        if self.flagged_only {
            conditions.push("e.is_flagged = 1".to_string());
        }

        if self.recurring_only {
            conditions.push("e.recurrence != 'none'".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        FilterResult {
            where_clause,
            order_clause: "ORDER BY e.date DESC, e.id DESC",
            params,
        }
    }
}

impl FilterResult {
    /// Build a COUNT query over the filtered set
    pub fn build_count_query(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM expenses e {}",
            self.where_clause
        )
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Consume the result, returning the parameter vector so pagination
    /// params can be appended
    pub fn into_params(self) -> Vec<Box<dyn rusqlite::ToSql>> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_filter() {
        let result = ExpenseFilter::new().build();
        assert_eq!(result.where_clause, "");
        assert!(result.params.is_empty());
        assert_eq!(result.build_count_query(), "SELECT COUNT(*) FROM expenses e ");
    }

    #[test]
    fn test_all_conditions() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        let result = ExpenseFilter::new()
            .profile_id(Some(1))
            .category_id(Some(3))
            .from_date(Some(from))
            .to_date(Some(to))
            .min_amount(Some(5.0))
            .max_amount(Some(100.0))
            .description(Some("coffee"))
            .flagged_only(true)
            .recurring_only(true)
            .build();

        assert!(result.where_clause.starts_with("WHERE "));
        assert!(result.where_clause.contains("e.profile_id = ?"));
        assert!(result.where_clause.contains("e.category_id = ?"));
        assert!(result.where_clause.contains("e.date >= ?"));
        assert!(result.where_clause.contains("e.date <= ?"));
        assert!(result.where_clause.contains("e.amount >= ?"));
        assert!(result.where_clause.contains("e.amount <= ?"));
        assert!(result.where_clause.contains("e.description LIKE ?"));
        assert!(result.where_clause.contains("e.is_flagged = 1"));
        assert!(result.where_clause.contains("e.recurrence != 'none'"));
        // 1 profile + 1 category + 2 dates + 2 amounts + 1 description
        assert_eq!(result.params.len(), 7);
    }

    #[test]
    fn test_blank_description_ignored() {
        let result = ExpenseFilter::new().description(Some("   ")).build();
        assert_eq!(result.where_clause, "");
        assert!(result.params.is_empty());
    }
}
