//! Raw snapshot documents as served by a source, and their validation into
//! typed records.

use crate::core::error::SnapshotError;
use crate::core::model::{
    CategorySplit, IncomeCycleSummary, SpendScope, Transaction, TransactionId, TransactionKind,
    WEEK, WeeklyPoint,
};
use crate::core::money::Money;
use chrono::{NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A snapshot exactly as decoded from the wire. Nothing here is trusted yet.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    pub balance: Option<Decimal>,
    pub income: Option<Decimal>,
    pub expenses: Option<Decimal>,
    pub savings: Option<Decimal>,
    pub personal_vs_professional: Option<Vec<RawSplit>>,
    pub weekly_trend: Option<Vec<RawWeeklyPoint>>,
    pub income_cycle: Option<RawIncomeCycle>,
    pub transactions: Option<Vec<RawTransaction>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSplit {
    pub name: Option<String>,
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawWeeklyPoint {
    pub day: Option<String>,
    pub income: Option<Decimal>,
    pub expense: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIncomeCycle {
    pub usual_arrival: Option<String>,
    pub on_time_percent: Option<Decimal>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTransaction {
    pub id: Option<RawId>,
    pub date: Option<String>,
    pub desc: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub scope: Option<String>,
}

/// A validated snapshot. Optional aggregates are derived by the builder when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub balance: Money,
    pub income: Option<Money>,
    pub expenses: Option<Money>,
    pub savings: Option<Money>,
    pub category_split: Option<Vec<CategorySplit>>,
    /// Always seven points in Mon..Sun order when present.
    pub weekly_trend: Option<Vec<WeeklyPoint>>,
    pub income_cycle: IncomeCycleSummary,
    pub transactions: Vec<Transaction>,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let balance = raw
            .balance
            .map(|v| bounded("balance", v))
            .ok_or_else(|| SnapshotError::missing("balance"))??;
        let income = non_negative("income", raw.income)?;
        let expenses = non_negative("expenses", raw.expenses)?;
        let savings = raw.savings.map(|v| bounded("savings", v)).transpose()?;

        let category_split = raw
            .personal_vs_professional
            .map(validate_splits)
            .transpose()?;
        let weekly_trend = raw.weekly_trend.map(order_week).transpose()?;
        let income_cycle = validate_income_cycle(
            raw.income_cycle
                .ok_or_else(|| SnapshotError::missing("incomeCycle"))?,
        )?;
        let transactions = validate_transactions(
            raw.transactions
                .ok_or_else(|| SnapshotError::missing("transactions"))?,
        )?;

        Ok(Snapshot {
            balance,
            income,
            expenses,
            savings,
            category_split,
            weekly_trend,
            income_cycle,
            transactions,
        })
    }
}

/// Largest magnitude accepted for any amount. Sums and ratios over amounts
/// within this bound stay far inside `Decimal`'s range.
const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

fn bounded(field: &str, value: Decimal) -> Result<Money, SnapshotError> {
    if value.abs() > Decimal::from(MAX_AMOUNT) {
        return Err(SnapshotError::invalid(
            field,
            format!("{value} exceeds the supported magnitude of {MAX_AMOUNT}"),
        ));
    }
    Ok(Money::new(value))
}

fn non_negative(field: &str, value: Option<Decimal>) -> Result<Option<Money>, SnapshotError> {
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => {
            Err(SnapshotError::invalid(field, "must not be negative"))
        }
        Some(v) => bounded(field, v).map(Some),
        None => Ok(None),
    }
}

fn validate_splits(splits: Vec<RawSplit>) -> Result<Vec<CategorySplit>, SnapshotError> {
    splits
        .into_iter()
        .enumerate()
        .map(|(i, split)| {
            let field = format!("personalVsProfessional[{i}]");
            let label = split
                .name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| SnapshotError::missing(format!("{field}.name")))?;
            let total = non_negative(&format!("{field}.value"), split.value)?
                .ok_or_else(|| SnapshotError::missing(format!("{field}.value")))?;
            Ok(CategorySplit { label, total })
        })
        .collect()
}

/// Places points in Mon..Sun order. Days the source left out become zero points.
pub fn order_week(points: Vec<RawWeeklyPoint>) -> Result<Vec<WeeklyPoint>, SnapshotError> {
    let mut week: [Option<WeeklyPoint>; 7] = [None; 7];

    for (i, point) in points.into_iter().enumerate() {
        let field = format!("weeklyTrend[{i}]");
        let label = point
            .day
            .ok_or_else(|| SnapshotError::missing(format!("{field}.day")))?;
        let day: Weekday = label.trim().parse().map_err(|_| {
            SnapshotError::invalid(format!("{field}.day"), format!("unknown weekday `{label}`"))
        })?;
        let slot = &mut week[day.num_days_from_monday() as usize];
        if slot.is_some() {
            return Err(SnapshotError::invalid(
                format!("{field}.day"),
                format!("duplicate weekday `{label}`"),
            ));
        }
        *slot = Some(WeeklyPoint {
            day,
            income: non_negative(&format!("{field}.income"), point.income)?
                .unwrap_or(Money::ZERO),
            expense: non_negative(&format!("{field}.expense"), point.expense)?
                .unwrap_or(Money::ZERO),
        });
    }

    Ok(WEEK
        .iter()
        .zip(week)
        .map(|(day, point)| point.unwrap_or_else(|| WeeklyPoint::empty(*day)))
        .collect())
}

fn validate_income_cycle(cycle: RawIncomeCycle) -> Result<IncomeCycleSummary, SnapshotError> {
    let usual_arrival_window = cycle
        .usual_arrival
        .ok_or_else(|| SnapshotError::missing("incomeCycle.usualArrival"))?;
    let percent = cycle
        .on_time_percent
        .ok_or_else(|| SnapshotError::missing("incomeCycle.onTimePercent"))?;
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(SnapshotError::invalid(
            "incomeCycle.onTimePercent",
            format!("{percent} is outside 0..=100"),
        ));
    }
    let on_time_rate = percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(100);

    Ok(IncomeCycleSummary {
        usual_arrival_window,
        on_time_rate,
        suggestions: cycle.suggestions,
    })
}

fn validate_transactions(raw: Vec<RawTransaction>) -> Result<Vec<Transaction>, SnapshotError> {
    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(raw.len());

    for (i, t) in raw.into_iter().enumerate() {
        let field = |name: &str| format!("transactions[{i}].{name}");

        let id = match t.id {
            Some(RawId::Number(n)) => n.to_string(),
            Some(RawId::Text(s)) if !s.trim().is_empty() => s,
            Some(RawId::Text(_)) => return Err(SnapshotError::invalid(field("id"), "empty id")),
            None => return Err(SnapshotError::missing(field("id"))),
        };
        if !seen.insert(id.clone()) {
            return Err(SnapshotError::DuplicateTransaction(id));
        }

        let date_text = t.date.ok_or_else(|| SnapshotError::missing(field("date")))?;
        let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
            SnapshotError::invalid(field("date"), format!("`{date_text}` is not YYYY-MM-DD"))
        })?;

        let amount = t
            .amount
            .map(|v| bounded(&field("amount"), v))
            .ok_or_else(|| SnapshotError::missing(field("amount")))??;

        let kind = match t.kind {
            Some(text) => {
                let kind: TransactionKind = text
                    .parse()
                    .map_err(|e: anyhow::Error| SnapshotError::invalid(field("type"), e.to_string()))?;
                let contradicts = match kind {
                    TransactionKind::Income => amount.is_negative(),
                    TransactionKind::Expense => !amount.is_negative() && !amount.is_zero(),
                };
                if contradicts {
                    return Err(SnapshotError::invalid(
                        field("type"),
                        format!("`{text}` contradicts amount {}", amount.amount()),
                    ));
                }
                kind
            }
            None if amount.is_negative() => TransactionKind::Expense,
            None => TransactionKind::Income,
        };

        let scope = t
            .scope
            .map(|s| {
                s.parse::<SpendScope>()
                    .map_err(|e| SnapshotError::invalid(field("scope"), e.to_string()))
            })
            .transpose()?;

        transactions.push(Transaction {
            id: TransactionId(id),
            date,
            description: t.desc.unwrap_or_default(),
            amount,
            category: t.category.unwrap_or_else(|| "Uncategorized".to_string()),
            kind,
            scope,
        });
    }

    Ok(transactions)
}
