//! Typed ledger records shared by the snapshot and the view-model.

use crate::core::money::Money;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(anyhow::anyhow!("Invalid transaction type: {}", s)),
        }
    }
}

/// Classification axis used for the spending split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendScope {
    Personal,
    Professional,
}

impl SpendScope {
    pub const ALL: [SpendScope; 2] = [SpendScope::Personal, SpendScope::Professional];

    pub fn label(&self) -> &'static str {
        match self {
            SpendScope::Personal => "Personal",
            SpendScope::Professional => "Professional",
        }
    }
}

impl FromStr for SpendScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personal" => Ok(SpendScope::Personal),
            "professional" => Ok(SpendScope::Professional),
            _ => Err(anyhow::anyhow!("Invalid spend scope: {}", s)),
        }
    }
}

/// How an amount should be coloured when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTone {
    Positive,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: String,
    pub kind: TransactionKind,
    pub scope: Option<SpendScope>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    /// Amount shown in the transaction table; the sign is carried by the tone.
    pub fn display_amount(&self) -> String {
        self.amount.abs().to_string()
    }

    pub fn tone(&self) -> AmountTone {
        if self.is_expense() {
            AmountTone::Warning
        } else {
            AmountTone::Positive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySplit {
    pub label: String,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub day: Weekday,
    pub income: Money,
    pub expense: Money,
}

impl WeeklyPoint {
    pub fn empty(day: Weekday) -> Self {
        WeeklyPoint {
            day,
            income: Money::ZERO,
            expense: Money::ZERO,
        }
    }
}

/// Mon..Sun, the only order a weekly series is ever presented in.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCycleSummary {
    pub usual_arrival_window: String,
    /// Percentage in `0..=100`.
    pub on_time_rate: u8,
    pub suggestions: Vec<String>,
}
