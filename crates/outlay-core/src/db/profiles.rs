//! Profile operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Profile;

/// Name of the profile seeded on init and used when none is specified
pub const DEFAULT_PROFILE_NAME: &str = "default";

fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
    let created_at_str: String = row.get(2)?;
    Ok(Profile {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create or get a profile by name
    pub fn upsert_profile(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM profiles WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute("INSERT INTO profiles (name) VALUES (?)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// Seed the default profile (idempotent)
    pub fn seed_default_profile(&self) -> Result<i64> {
        self.upsert_profile(DEFAULT_PROFILE_NAME)
    }

    /// List all profiles
    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM profiles ORDER BY name")?;

        let profiles = stmt
            .query_map([], row_to_profile)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Get a profile by ID
    pub fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        let conn = self.conn()?;
        let profile = conn
            .query_row(
                "SELECT id, name, created_at FROM profiles WHERE id = ?",
                params![id],
                row_to_profile,
            )
            .optional()?;

        Ok(profile)
    }

    /// Resolve an acting profile: by name if given, otherwise the default
    ///
    /// Errors if the named profile does not exist, or if no profile has been
    /// seeded yet (run init first).
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<Profile> {
        let conn = self.conn()?;
        let name = name.unwrap_or(DEFAULT_PROFILE_NAME);

        conn.query_row(
            "SELECT id, name, created_at FROM profiles WHERE name = ?",
            params![name],
            row_to_profile,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("profile '{}'", name)))
    }
}
