//! Domain models for Tally
//!
//! Wire format is camelCase JSON. Timestamps serialize as RFC 3339, day keys
//! as `YYYY-MM-DD` and months as `YYYY-MM`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{check_day, Month};
use crate::error::{Error, Result};

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: income, expense)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence frequency for recurring transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

/// A user's retrospective verdict on an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegretStatus {
    #[serde(rename = "Worth it")]
    WorthIt,
    Neutral,
    Regret,
}

impl RegretStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorthIt => "Worth it",
            Self::Neutral => "Neutral",
            Self::Regret => "Regret",
        }
    }
}

impl std::str::FromStr for RegretStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "worth it" | "worthit" => Ok(Self::WorthIt),
            "neutral" => Ok(Self::Neutral),
            "regret" => Ok(Self::Regret),
            _ => Err(format!(
                "Unknown regret status: {} (valid: Worth it, Neutral, Regret)",
                s
            )),
        }
    }
}

impl std::fmt::Display for RegretStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A logged income or expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always positive; `kind` carries the direction
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub regret_status: Option<RegretStatus>,
    pub regret_evaluated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Calendar day (UTC) the transaction counts towards
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn month(&self) -> Month {
        Month::of(self.day())
    }
}

/// Fields accepted when creating or updating a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub frequency: Option<Frequency>,
}

impl NewTransaction {
    /// Precondition checks applied before anything reaches the store
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Amount must be a positive number, got {}",
                self.amount
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("Category is required".to_string()));
        }
        check_day(self.date.date_naive())?;
        if self.frequency.is_some() && !self.is_recurring {
            return Err(Error::InvalidData(
                "Frequency is only valid for recurring transactions".to_string(),
            ));
        }
        Ok(())
    }
}

/// A monthly spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub user_id: String,
    pub category: String,
    pub limit: f64,
    pub month: Month,
}

/// Fields accepted when setting a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: String,
    pub limit: f64,
    pub month: Month,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        if !self.limit.is_finite() || self.limit <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Budget limit must be a positive number, got {}",
                self.limit
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("Category is required".to_string()));
        }
        Ok(())
    }
}

/// Consecutive days a user stayed within their daily budget share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_evaluated_date: Option<NaiveDate>,
}

impl Streak {
    /// A zeroed streak for a user that has never been evaluated
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            current_streak: 0,
            longest_streak: 0,
            last_evaluated_date: None,
        }
    }
}

/// A persisted monthly narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureSelfLetter {
    pub id: i64,
    pub user_id: String,
    pub month: Month,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Onboarding text returned (but never stored) for a month with no activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingLetter {
    pub month: Month,
    pub content: String,
}

/// Result of letter synthesis
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MonthlyLetter {
    Onboarding(OnboardingLetter),
    Stored(FutureSelfLetter),
}

impl MonthlyLetter {
    pub fn content(&self) -> &str {
        match self {
            Self::Onboarding(letter) => &letter.content,
            Self::Stored(letter) => &letter.content,
        }
    }

    pub fn month(&self) -> Month {
        match self {
            Self::Onboarding(letter) => letter.month,
            Self::Stored(letter) => letter.month,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

// ========== Analytics Models ==========

/// Window for regret scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreWindow {
    /// Since the start of the current day
    Day,
    /// Since the start of the current month
    Month,
    /// Every evaluated expense
    All,
}

impl ScoreWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for ScoreWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "" | "all" => Ok(Self::All),
            _ => Err(format!("Unknown duration: {} (valid: day, month, all)", s)),
        }
    }
}

/// Income and expense totals for one trailing month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub month: Month,
    /// Chart label, e.g. "Oct 2026"
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

/// Income and expense totals for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

/// Counts of each regret verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegretCounts {
    #[serde(rename = "Worth it")]
    pub worth_it: u32,
    #[serde(rename = "Neutral")]
    pub neutral: u32,
    #[serde(rename = "Regret")]
    pub regret: u32,
}

impl RegretCounts {
    pub fn record(&mut self, status: RegretStatus) {
        match status {
            RegretStatus::WorthIt => self.worth_it += 1,
            RegretStatus::Neutral => self.neutral += 1,
            RegretStatus::Regret => self.regret += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.worth_it + self.neutral + self.regret
    }
}

/// Regret verdicts overall and per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegretBreakdown {
    pub overall: RegretCounts,
    pub by_category: BTreeMap<String, RegretCounts>,
}

/// Evaluated and regretted counts for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRegret {
    pub total: u32,
    pub regrets: u32,
}

/// Regret scoring over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegretScores {
    /// Percentage of evaluated expenses marked "Worth it" (100 when none)
    pub score: f64,
    /// Percentage of evaluated expenses marked "Regret" (0 when none)
    pub regret_percentage: f64,
    pub total_evaluated: u32,
    pub category_regret: BTreeMap<String, CategoryRegret>,
}

/// Payload behind the reports view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub income_categories: BTreeMap<String, f64>,
    pub expense_categories: BTreeMap<String, f64>,
    pub regret_stats: RegretCounts,
    pub category_regret: BTreeMap<String, RegretCounts>,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub budget_balance: f64,
    /// Sum of the current month's budget limits
    pub total_budget: f64,
    /// Percent change of this month's expenses against last month's
    pub expense_change: f64,
}

/// Payload behind the dashboard view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent_transactions: Vec<Transaction>,
    pub pending_regret_evaluations: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tx() -> NewTransaction {
        NewTransaction {
            kind: TransactionType::Expense,
            amount: 12.5,
            category: "Food".to_string(),
            description: "Lunch".to_string(),
            date: Utc::now(),
            is_recurring: false,
            frequency: None,
        }
    }

    #[test]
    fn test_new_transaction_validation() {
        assert!(new_tx().validate().is_ok());

        let mut tx = new_tx();
        tx.amount = 0.0;
        assert!(tx.validate().is_err());

        let mut tx = new_tx();
        tx.amount = f64::NAN;
        assert!(tx.validate().is_err());

        let mut tx = new_tx();
        tx.category = "  ".to_string();
        assert!(tx.validate().is_err());

        let mut tx = new_tx();
        tx.frequency = Some(Frequency::Monthly);
        assert!(tx.validate().is_err());
        tx.is_recurring = true;
        assert!(tx.validate().is_ok());
    
        let mut tx = new_tx();
        tx.date = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap().and_utc();
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_regret_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&RegretStatus::WorthIt).unwrap(),
            "\"Worth it\""
        );
        let parsed: RegretStatus = serde_json::from_str("\"Regret\"").unwrap();
        assert_eq!(parsed, RegretStatus::Regret);
        assert_eq!("worth-it".parse::<RegretStatus>(), Ok(RegretStatus::WorthIt));
        assert!("meh".parse::<RegretStatus>().is_err());
    }

    #[test]
    fn test_new_transaction_json_defaults() {
        let tx: NewTransaction = serde_json::from_value(serde_json::json!({
            "type": "income",
            "amount": 1000.0,
            "category": "Salary",
            "description": "Paycheck"
        }))
        .unwrap();
        assert_eq!(tx.kind, TransactionType::Income);
        assert!(!tx.is_recurring);
        assert!(tx.frequency.is_none());
    }

    #[test]
    fn test_score_window_parse() {
        assert_eq!("".parse::<ScoreWindow>(), Ok(ScoreWindow::All));
        assert_eq!("Day".parse::<ScoreWindow>(), Ok(ScoreWindow::Day));
        assert!("year".parse::<ScoreWindow>().is_err());
    }

    #[test]
    fn test_regret_counts_serialize_with_labels() {
        let mut counts = RegretCounts::default();
        counts.record(RegretStatus::WorthIt);
        counts.record(RegretStatus::Regret);
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["Worth it"], 1);
        assert_eq!(json["Neutral"], 0);
        assert_eq!(json["Regret"], 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_budget_validation() {
        let budget = NewBudget {
            category: "Food".to_string(),
            limit: -5.0,
            month: Month::new(2024, 1).unwrap(),
        };
        assert!(budget.validate().is_err());
    }
}
