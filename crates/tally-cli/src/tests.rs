//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::{Duration, Utc};
use clap::Parser;
use tally_core::models::{NewTransaction, RegretStatus, TransactionType};
use tally_core::{BehaviorConfig, BehaviorEngine, Database, Month};
use tempfile::TempDir;

use crate::cli::{BudgetsAction, Cli, Commands, TransactionsAction};
use crate::commands::{self, truncate, TransactionInput};

const USER: &str = "local-dev";

fn setup_test_engine() -> BehaviorEngine<Database> {
    let db = Database::in_memory().unwrap();
    BehaviorEngine::new(db, BehaviorConfig::default())
}

fn expense_input(amount: f64, date: Option<&str>) -> TransactionInput<'_> {
    TransactionInput {
        kind: "expense",
        amount,
        category: "Food",
        description: "Groceries",
        date,
        recurring: None,
    }
}

fn insert_expense(db: &Database, amount: f64, days_ago: i64) -> i64 {
    db.insert_transaction(
        USER,
        &NewTransaction {
            kind: TransactionType::Expense,
            amount,
            category: "Food".to_string(),
            description: String::new(),
            date: Utc::now() - Duration::days(days_ago),
            is_recurring: false,
            frequency: None,
        },
    )
    .unwrap()
    .id
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["tally", "streak"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("tally.db"));
    assert_eq!(cli.user, "local-dev");
    assert!(!cli.no_encrypt);
    assert!(matches!(cli.command, Commands::Streak { evaluate: None }));
}

#[test]
fn test_parse_transactions_add() {
    let cli = Cli::try_parse_from([
        "tally",
        "--no-encrypt",
        "transactions",
        "add",
        "--type",
        "income",
        "--amount",
        "100",
        "--category",
        "Salary",
        "--recurring",
        "monthly",
    ])
    .unwrap();

    assert!(cli.no_encrypt);
    match cli.command {
        Commands::Transactions {
            action:
                Some(TransactionsAction::Add {
                    kind,
                    amount,
                    category,
                    recurring,
                    ..
                }),
        } => {
            assert_eq!(kind, "income");
            assert_eq!(amount, 100.0);
            assert_eq!(category, "Salary");
            assert_eq!(recurring.as_deref(), Some("monthly"));
        }
        _ => panic!("expected transactions add"),
    }
}

#[test]
fn test_parse_budgets_set() {
    let cli = Cli::try_parse_from(["tally", "budgets", "set", "Food", "400", "--month", "2026-05"])
        .unwrap();
    match cli.command {
        Commands::Budgets {
            action:
                Some(BudgetsAction::Set {
                    category,
                    limit,
                    month,
                }),
        } => {
            assert_eq!(category, "Food");
            assert_eq!(limit, 400.0);
            assert_eq!(month.as_deref(), Some("2026-05"));
        }
        _ => panic!("expected budgets set"),
    }
}

#[test]
fn test_parse_letter_archive_conflicts_with_month() {
    let result = Cli::try_parse_from(["tally", "letter", "--archive", "--month", "2026-05"]);
    assert!(result.is_err());
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_unencrypted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tally.db");

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());

    // Re-opening an initialized database is fine
    let db = commands::open_db(&path, true).unwrap();
    assert!(!db.is_encrypted().unwrap());
}

#[test]
fn test_open_engine_with_config_override() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("behavior.toml");
    std::fs::write(&config_path, "[analytics]\ntrailing_months = 3\n").unwrap();

    let engine =
        commands::open_engine(&dir.path().join("tally.db"), Some(&config_path), true).unwrap();
    assert_eq!(engine.config().trailing_months, 3);
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions_list_empty() {
    let engine = setup_test_engine();
    assert!(commands::cmd_transactions_list(engine.store(), USER, 20).is_ok());
}

#[test]
fn test_cmd_transactions_add() {
    let engine = setup_test_engine();

    commands::cmd_transactions_add(&engine, USER, &expense_input(12.5, Some("2026-03-04")))
        .unwrap();

    let txs = engine.store().list_transactions(USER, 10, 0).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, 12.5);
    assert_eq!(txs[0].day().to_string(), "2026-03-04");
    assert!(commands::cmd_transactions_list(engine.store(), USER, 20).is_ok());
}

#[test]
fn test_cmd_transactions_add_extends_streak() {
    let engine = setup_test_engine();
    commands::cmd_budgets_set(engine.store(), USER, "Food", 3100.0, Some("2026-03")).unwrap();

    commands::cmd_transactions_add(&engine, USER, &expense_input(50.0, Some("2026-03-04")))
        .unwrap();

    let streak = engine.get_streak(USER).unwrap();
    assert_eq!(streak.current_streak, 1);
    assert_eq!(streak.last_evaluated_date.unwrap().to_string(), "2026-03-04");
}

#[test]
fn test_cmd_transactions_add_recurring() {
    let engine = setup_test_engine();

    let input = TransactionInput {
        kind: "income",
        amount: 2500.0,
        category: "Salary",
        description: "",
        date: None,
        recurring: Some("monthly"),
    };
    commands::cmd_transactions_add(&engine, USER, &input).unwrap();

    let txs = engine.store().list_transactions(USER, 10, 0).unwrap();
    assert!(txs[0].is_recurring);
    assert_eq!(txs[0].kind, TransactionType::Income);
}

#[test]
fn test_cmd_transactions_add_invalid() {
    let engine = setup_test_engine();

    let bad_kind = TransactionInput {
        kind: "transfer",
        ..expense_input(10.0, None)
    };
    assert!(commands::cmd_transactions_add(&engine, USER, &bad_kind).is_err());

    assert!(commands::cmd_transactions_add(&engine, USER, &expense_input(0.0, None)).is_err());
    assert!(
        commands::cmd_transactions_add(&engine, USER, &expense_input(10.0, Some("03/04/2026")))
            .is_err()
    );

    assert_eq!(engine.store().count_transactions(USER).unwrap(), 0);
}

#[test]
fn test_cmd_transactions_delete() {
    let engine = setup_test_engine();
    let id = insert_expense(engine.store(), 10.0, 0);

    commands::cmd_transactions_delete(&engine, USER, id).unwrap();
    assert!(engine.store().get_transaction(USER, id).unwrap().is_none());

    assert!(commands::cmd_transactions_delete(&engine, USER, id).is_err());
}

#[test]
fn test_cmd_transactions_regret() {
    let engine = setup_test_engine();
    let id = insert_expense(engine.store(), 40.0, 3);

    commands::cmd_transactions_regret(&engine, USER, id, "worth it").unwrap();

    let tx = engine.store().get_transaction(USER, id).unwrap().unwrap();
    assert_eq!(tx.regret_status, Some(RegretStatus::WorthIt));
}

#[test]
fn test_cmd_transactions_regret_rejects_fresh_expense() {
    let engine = setup_test_engine();
    let id = insert_expense(engine.store(), 40.0, 0);

    assert!(commands::cmd_transactions_regret(&engine, USER, id, "Regret").is_err());
    assert!(commands::cmd_transactions_regret(&engine, USER, id, "meh").is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budgets_set_and_list() {
    let engine = setup_test_engine();

    commands::cmd_budgets_set(engine.store(), USER, "Food", 400.0, None).unwrap();
    commands::cmd_budgets_set(engine.store(), USER, "Rent", 1200.0, Some("2026-01")).unwrap();

    let current = Month::of(Utc::now().date_naive());
    let budgets = engine.store().list_budgets(USER, Some(current)).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].category, "Food");

    assert!(commands::cmd_budgets_list(engine.store(), USER, None).is_ok());
    assert!(commands::cmd_budgets_list(engine.store(), USER, Some("2026-01")).is_ok());
    assert!(commands::cmd_budgets_list(engine.store(), USER, Some("January")).is_err());
}

#[test]
fn test_cmd_budgets_set_invalid() {
    let engine = setup_test_engine();
    assert!(commands::cmd_budgets_set(engine.store(), USER, "Food", -1.0, None).is_err());
    assert!(commands::cmd_budgets_set(engine.store(), USER, "Food", 10.0, Some("2026-13")).is_err());
}

#[test]
fn test_cmd_budgets_delete() {
    let engine = setup_test_engine();
    commands::cmd_budgets_set(engine.store(), USER, "Food", 400.0, Some("2026-02")).unwrap();
    let id = engine.store().list_budgets(USER, None).unwrap()[0].id;

    commands::cmd_budgets_delete(engine.store(), USER, id).unwrap();
    assert!(engine.store().list_budgets(USER, None).unwrap().is_empty());
    assert!(commands::cmd_budgets_delete(engine.store(), USER, id).is_err());
}

// ========== Behavior Command Tests ==========

#[test]
fn test_cmd_streak() {
    let engine = setup_test_engine();
    assert!(commands::cmd_streak(&engine, USER, None).is_ok());
    assert!(commands::cmd_streak(&engine, USER, Some("2026-02-30")).is_err());
    assert!(commands::cmd_streak(&engine, USER, Some("+262142-12-31")).is_err());
    assert!(engine.get_streak(USER).unwrap().last_evaluated_date.is_none());
}

#[test]
fn test_cmd_streak_evaluate() {
    let engine = setup_test_engine();
    commands::cmd_budgets_set(engine.store(), USER, "Food", 2800.0, Some("2026-02")).unwrap();

    commands::cmd_streak(&engine, USER, Some("2026-02-10")).unwrap();

    let streak = engine.get_streak(USER).unwrap();
    assert_eq!(streak.current_streak, 1);
}

#[test]
fn test_cmd_scores() {
    let engine = setup_test_engine();
    assert!(commands::cmd_scores(&engine, USER, "all").is_ok());

    let id = insert_expense(engine.store(), 40.0, 3);
    commands::cmd_transactions_regret(&engine, USER, id, "Regret").unwrap();
    assert!(commands::cmd_scores(&engine, USER, "month").is_ok());

    assert!(commands::cmd_scores(&engine, USER, "week").is_err());
}

#[test]
fn test_cmd_letter_onboarding_not_stored() {
    let engine = setup_test_engine();

    commands::cmd_letter(&engine, USER, None).unwrap();
    assert!(engine.store().list_letters(USER).unwrap().is_empty());
    assert!(commands::cmd_letter_archive(engine.store(), USER).is_ok());
}

#[test]
fn test_cmd_letter_for_month() {
    let engine = setup_test_engine();
    commands::cmd_transactions_add(&engine, USER, &expense_input(20.0, Some("2026-04-05")))
        .unwrap();

    commands::cmd_letter(&engine, USER, Some("2026-04")).unwrap();

    let letters = engine.store().list_letters(USER).unwrap();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].month.to_string(), "2026-04");
    assert!(commands::cmd_letter_archive(engine.store(), USER).is_ok());

    assert!(commands::cmd_letter(&engine, USER, Some("April")).is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_report_empty() {
    let engine = setup_test_engine();
    assert!(commands::cmd_report(&engine, USER, None, false).is_ok());
}

#[test]
fn test_cmd_report_with_data() {
    let engine = setup_test_engine();
    insert_expense(engine.store(), 40.0, 0);
    let id = insert_expense(engine.store(), 15.0, 2);
    commands::cmd_transactions_regret(&engine, USER, id, "Neutral").unwrap();

    assert!(commands::cmd_report(&engine, USER, Some(3), false).is_ok());
    assert!(commands::cmd_report(&engine, USER, Some(3), true).is_ok());
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is a long string", 10), "this is...");
    assert_eq!(truncate("héllo wörld", 8), "héllo...");
}
