//! Outlay CLI - Expense tracker with anomaly detection
//!
//! Usage:
//!   outlay init                               Initialize database
//!   outlay add -a 42.50 -c Groceries -d ...   Record an expense
//!   outlay anomalies                          Review flagged spending
//!   outlay serve --port 3000                  Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Add {
            amount,
            category,
            description,
            date,
            recurrence,
            until,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(
                &db,
                profile,
                amount,
                &category,
                &description,
                date.as_deref(),
                &recurrence,
                until.as_deref(),
            )
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_expenses_list(&db, profile, 20, None, false, false, None),
                Some(ExpensesAction::List {
                    limit,
                    category,
                    flagged,
                    recurring,
                    search,
                }) => commands::cmd_expenses_list(
                    &db,
                    profile,
                    limit,
                    category.as_deref(),
                    flagged,
                    recurring,
                    search.as_deref(),
                ),
                Some(ExpensesAction::Show { id }) => commands::cmd_expenses_show(&db, id),
                Some(ExpensesAction::Edit {
                    id,
                    amount,
                    category,
                    description,
                    date,
                    recurrence,
                    until,
                }) => commands::cmd_expenses_edit(
                    &db,
                    id,
                    amount,
                    category.as_deref(),
                    description.as_deref(),
                    date.as_deref(),
                    recurrence.as_deref(),
                    until.as_deref(),
                ),
                Some(ExpensesAction::Delete { id, yes }) => {
                    commands::cmd_expenses_delete(&db, id, yes)
                }
            }
        }
        Commands::Instances { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                InstancesAction::List {
                    expense_id,
                    upcoming,
                } => commands::cmd_instances_list(&db, expense_id, upcoming),
                InstancesAction::Edit {
                    id,
                    date,
                    amount,
                    paid,
                    unpaid,
                } => commands::cmd_instances_edit(&db, id, date.as_deref(), amount, paid, unpaid),
            }
        }
        Commands::Anomalies { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(AnomaliesAction::List { all: false }) => {
                    commands::cmd_anomalies_list(&db, profile, false)
                }
                Some(AnomaliesAction::List { all: true }) => {
                    commands::cmd_anomalies_list(&db, profile, true)
                }
                Some(AnomaliesAction::Review { id, false_positive }) => {
                    commands::cmd_anomalies_review(&db, id, false_positive)
                }
            }
        }
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(CategoriesAction::List) => commands::cmd_categories_list(&db),
                Some(CategoriesAction::Add { name, color }) => {
                    commands::cmd_categories_add(&db, &name, color.as_deref())
                }
                Some(CategoriesAction::Update { id, name, color }) => {
                    commands::cmd_categories_update(&db, id, name.as_deref(), color.as_deref())
                }
                Some(CategoriesAction::Delete { id }) => commands::cmd_categories_delete(&db, id),
            }
        }
        Commands::Profiles { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(ProfilesAction::List) => commands::cmd_profiles_list(&db),
                Some(ProfilesAction::Add { name }) => commands::cmd_profiles_add(&db, &name),
            }
        }
        Commands::Dashboard => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_dashboard(&db, profile)
        }
        Commands::Report { period, from, to } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let (from_date, to_date) =
                commands::resolve_period(&period, from.as_deref(), to.as_deref())?;
            commands::cmd_report(&db, profile, from_date, to_date)
        }
        Commands::Export {
            output,
            format,
            from,
            to,
            category,
            flagged,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_export(
                &db,
                profile,
                output.as_deref(),
                &format,
                from.as_deref(),
                to.as_deref(),
                category.as_deref(),
                flagged,
            )
        }
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt, static_dir.as_deref()).await
        }
    }
}
