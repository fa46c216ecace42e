//! Expense category operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Category;

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    let created_at_str: String = row.get(4)?;
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        is_default: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Seed the default category set (idempotent)
    pub fn seed_default_categories(&self) -> Result<()> {
        let conn = self.conn()?;

        let defaults = [
            ("Housing", "#6366f1"),
            ("Utilities", "#8b5cf6"),
            ("Groceries", "#10b981"),
            ("Dining", "#f59e0b"),
            ("Transport", "#ef4444"),
            ("Healthcare", "#ec4899"),
            ("Shopping", "#14b8a6"),
            ("Entertainment", "#f97316"),
            ("Travel", "#06b6d4"),
            ("Personal", "#84cc16"),
            ("Education", "#a855f7"),
            ("Other", "#9ca3af"),
        ];

        for (name, color) in &defaults {
            let exists: bool = conn
                .query_row(
                    "SELECT 1 FROM categories WHERE name = ?",
                    params![name],
                    |_| Ok(true),
                )
                .unwrap_or(false);

            if !exists {
                conn.execute(
                    "INSERT INTO categories (name, color, is_default) VALUES (?, ?, 1)",
                    params![name, color],
                )?;
            }
        }

        Ok(())
    }

    /// Create a category (name must be unique)
    pub fn create_category(&self, name: &str, color: Option<&str>) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Err(Error::InvalidData(format!(
                "Category '{}' already exists",
                name
            )));
        }

        conn.execute(
            "INSERT INTO categories (name, color, is_default) VALUES (?, ?, 0)",
            params![name, color],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all categories
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, color, is_default, created_at FROM categories ORDER BY name",
        )?;

        let categories = stmt
            .query_map([], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category by ID
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, color, is_default, created_at FROM categories WHERE id = ?",
                params![id],
                row_to_category,
            )
            .optional()?;

        Ok(category)
    }

    /// Get a category by name (case-insensitive)
    pub fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, color, is_default, created_at FROM categories \
                 WHERE name = ? COLLATE NOCASE",
                params![name],
                row_to_category,
            )
            .optional()?;

        Ok(category)
    }

    /// Update a category's name and/or color
    pub fn update_category(
        &self,
        id: i64,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn()?;

        if let Some(name) = name {
            conn.execute(
                "UPDATE categories SET name = ? WHERE id = ?",
                params![name, id],
            )?;
        }
        if let Some(color) = color {
            conn.execute(
                "UPDATE categories SET color = ? WHERE id = ?",
                params![color, id],
            )?;
        }

        Ok(())
    }

    /// Delete a category
    ///
    /// Rejected while any expense still references it (relational PROTECT).
    pub fn delete_category(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;

        let in_use: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE category_id = ?",
            params![id],
            |row| row.get(0),
        )?;

        if in_use > 0 {
            return Err(Error::InvalidData(format!(
                "Category is used by {} expense(s); reassign them first",
                in_use
            )));
        }

        let deleted = conn.execute("DELETE FROM categories WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("category {}", id)));
        }

        Ok(())
    }
}
