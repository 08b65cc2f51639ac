//! Tally CLI - Personal finance tracker with behavioral coaching
//!
//! Usage:
//!   tally init                              Initialize database
//!   tally transactions add -a 12.5 -c Food  Log an expense
//!   tally streak                            Show the spending streak
//!   tally serve --port 3000                 Start web server

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

    let user = cli.user.as_str();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                cli.config.as_deref(),
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Transactions { action } => {
            let engine = commands::open_engine(&cli.db, cli.config.as_deref(), cli.no_encrypt)?;
            match action {
                None => commands::cmd_transactions_list(engine.store(), user, 20),
                Some(TransactionsAction::List { limit }) => {
                    commands::cmd_transactions_list(engine.store(), user, limit)
                }
                Some(TransactionsAction::Add {
                    kind,
                    amount,
                    category,
                    description,
                    date,
                    recurring,
                }) => commands::cmd_transactions_add(
                    &engine,
                    user,
                    &commands::TransactionInput {
                        kind: &kind,
                        amount,
                        category: &category,
                        description: &description,
                        date: date.as_deref(),
                        recurring: recurring.as_deref(),
                    },
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&engine, user, id)
                }
                Some(TransactionsAction::Regret { id, status }) => {
                    commands::cmd_transactions_regret(&engine, user, id, &status)
                }
            }
        }
        Commands::Budgets { action } => {
            let engine = commands::open_engine(&cli.db, cli.config.as_deref(), cli.no_encrypt)?;
            match action {
                None => commands::cmd_budgets_list(engine.store(), user, None),
                Some(BudgetsAction::List { month }) => {
                    commands::cmd_budgets_list(engine.store(), user, month.as_deref())
                }
                Some(BudgetsAction::Set {
                    category,
                    limit,
                    month,
                }) => commands::cmd_budgets_set(
                    engine.store(),
                    user,
                    &category,
                    limit,
                    month.as_deref(),
                ),
                Some(BudgetsAction::Delete { id }) => {
                    commands::cmd_budgets_delete(engine.store(), user, id)
                }
            }
        }
        Commands::Streak { evaluate } => {
            let engine = commands::open_engine(&cli.db, cli.config.as_deref(), cli.no_encrypt)?;
            commands::cmd_streak(&engine, user, evaluate.as_deref())
        }
        Commands::Scores { duration } => {
            let engine = commands::open_engine(&cli.db, cli.config.as_deref(), cli.no_encrypt)?;
            commands::cmd_scores(&engine, user, &duration)
        }
        Commands::Letter { month, archive } => {
            let engine = commands::open_engine(&cli.db, cli.config.as_deref(), cli.no_encrypt)?;
            if archive {
                commands::cmd_letter_archive(engine.store(), user)
            } else {
                commands::cmd_letter(&engine, user, month.as_deref())
            }
        }
        Commands::Report { months, json } => {
            let engine = commands::open_engine(&cli.db, cli.config.as_deref(), cli.no_encrypt)?;
            commands::cmd_report(&engine, user, months, json)
        }
    }
}
