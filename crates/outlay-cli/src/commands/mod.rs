//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `anomalies` - Anomaly listing and review commands
//! - `categories` - Category management commands
//! - `core` - Core commands (init) and shared utilities (open_db, parse_date)
//! - `expenses` - Expense commands (add, list, show, edit, delete)
//! - `export` - Expense export command (CSV/JSON)
//! - `instances` - Recurring instance commands (list, edit)
//! - `profiles` - Profile management commands
//! - `reports` - Dashboard and spending report commands
//! - `serve` - Web server command
//! - `status` - Database status command

pub mod anomalies;
pub mod categories;
pub mod core;
pub mod expenses;
pub mod export;
pub mod instances;
pub mod profiles;
pub mod reports;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use anomalies::*;
pub use categories::*;
pub use core::*;
pub use expenses::*;
pub use export::*;
pub use instances::*;
pub use profiles::*;
pub use reports::*;
pub use serve::*;
pub use status::*;

/// Truncate a string to a maximum byte length, adding "..." if truncated
///
/// Cuts on a char boundary so multi-byte descriptions never split mid-char.
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= keep)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..cut])
}
