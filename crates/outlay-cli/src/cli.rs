//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Outlay - Track expenses, spot the unusual ones
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Self-hosted expense tracker with anomaly detection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "outlay.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set OUTLAY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Profile to operate on (defaults to the "default" profile)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Add an expense
    Add {
        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Category name (e.g., "Groceries")
        #[arg(short, long)]
        category: String,

        /// What the money went to
        #[arg(short, long)]
        description: String,

        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Recurrence: none, daily, weekly, monthly, yearly
        #[arg(short, long, default_value = "none")]
        recurrence: String,

        /// Recurrence end date (YYYY-MM-DD, required when recurring)
        #[arg(long)]
        until: Option<String>,
    },

    /// Manage expenses (list, show, edit, delete)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage recurring instances (list, edit)
    Instances {
        #[command(subcommand)]
        action: InstancesAction,
    },

    /// List and review spending anomalies
    Anomalies {
        #[command(subcommand)]
        action: Option<AnomaliesAction>,
    },

    /// Manage categories (list, add, update, delete)
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage profiles (list, add)
    Profiles {
        #[command(subcommand)]
        action: Option<ProfilesAction>,
    },

    /// Show dashboard summary
    Dashboard,

    /// Generate a spending report
    Report {
        /// Time period: this-month, last-month, this-year, last-30-days, last-90-days, all
        #[arg(long, default_value = "last-90-days")]
        period: String,

        /// Custom start date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        to: Option<String>,
    },

    /// Export expenses to CSV or JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: csv or json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Filter by category name
        #[arg(long)]
        category: Option<String>,

        /// Only flagged expenses
        #[arg(long)]
        flagged: bool,
    },

    /// Show database status (encryption, size, etc.)
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short = 'P', long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List recent expenses
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Filter by category name
        #[arg(short, long)]
        category: Option<String>,

        /// Only flagged expenses
        #[arg(long)]
        flagged: bool,

        /// Only recurring expenses
        #[arg(long)]
        recurring: bool,

        /// Search descriptions (case-insensitive substring)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a single expense with its recurring instances
    Show {
        /// Expense ID
        id: i64,
    },

    /// Edit an expense (omitted fields keep their current value)
    Edit {
        /// Expense ID
        id: i64,

        /// New amount
        #[arg(short, long)]
        amount: Option<f64>,

        /// New category name
        #[arg(short, long)]
        category: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New recurrence: none, daily, weekly, monthly, yearly
        #[arg(short, long)]
        recurrence: Option<String>,

        /// New recurrence end date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
    },

    /// Delete an expense (removes its instances and anomalies)
    Delete {
        /// Expense ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum InstancesAction {
    /// List a recurring expense's generated instances
    List {
        /// Expense ID
        expense_id: i64,

        /// Only unpaid instances from today onward
        #[arg(long)]
        upcoming: bool,
    },

    /// Edit an instance (marks it user-modified, exempt from regeneration)
    Edit {
        /// Instance ID
        id: i64,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New amount
        #[arg(short, long)]
        amount: Option<f64>,

        /// Mark as paid
        #[arg(long)]
        paid: bool,

        /// Mark as unpaid
        #[arg(long)]
        unpaid: bool,
    },
}

#[derive(Subcommand)]
pub enum AnomaliesAction {
    /// List anomalies (unreviewed by default)
    List {
        /// Include reviewed anomalies
        #[arg(long)]
        all: bool,
    },

    /// Review an anomaly
    Review {
        /// Anomaly ID
        id: i64,

        /// Mark as a false positive (clears the expense flag)
        #[arg(long)]
        false_positive: bool,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// Hex color for UI (e.g., "#10b981")
        #[arg(long)]
        color: Option<String>,
    },

    /// Update a category
    Update {
        /// Category ID
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category (fails if expenses still reference it)
    Delete {
        /// Category ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ProfilesAction {
    /// List profiles
    List,

    /// Add a profile
    Add {
        /// Profile name
        name: String,
    },
}
