//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `open_engine` - Database plus behavior thresholds
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{BehaviorConfig, BehaviorEngine, Database};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    tracing::debug!("Opening database at {} (encrypted: {})", path_str, !no_encrypt);
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Load the behavior config and open the database behind a behavior engine
pub fn open_engine(
    db_path: &Path,
    config_path: Option<&Path>,
    no_encrypt: bool,
) -> Result<BehaviorEngine<Database>> {
    let config = BehaviorConfig::load(config_path).context("Failed to load behavior config")?;
    tracing::debug!(
        "Behavior config: trailing_months={}, regret window {}-{}h, celebration at {} days",
        config.trailing_months,
        config.eligibility_min_hours,
        config.eligibility_max_hours,
        config.celebration_streak_days
    );
    let db = open_db(db_path, no_encrypt)?;
    Ok(BehaviorEngine::new(db, config))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    // Opening runs the migrations
    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Set a budget: tally budgets set Food 400");
    println!("  2. Log spending: tally transactions add --amount 12.50 --category Food");
    println!("  3. Start web UI: tally serve");

    Ok(())
}
