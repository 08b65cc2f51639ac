//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `behavior` - Streak, regret score and letter commands
//! - `budgets` - Budget commands (list, set, delete)
//! - `core` - Init and shared utilities (open_db, open_engine)
//! - `reports` - Income/expense trend and category report
//! - `serve` - Web server command
//! - `transactions` - Transaction commands (list, add, delete, regret)

pub mod behavior;
pub mod budgets;
pub mod core;
pub mod reports;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use behavior::*;
pub use budgets::*;
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
