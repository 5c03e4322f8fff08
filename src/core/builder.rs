//! Derives the display-ready dashboard view-model from a snapshot.
use crate::core::aggregate::{self, ScopeClassifier};
use crate::core::error::SnapshotError;
use crate::core::model::{CategorySplit, IncomeCycleSummary, Transaction, WeeklyPoint};
use crate::core::money::Money;
use crate::core::snapshot::{RawSnapshot, Snapshot};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_RECENT_TRANSACTIONS: usize = 10;

/// Days in the month used to turn monthly expenses into a daily burn rate.
const DAYS_PER_MONTH: i64 = 30;

/// Everything the dashboard displays, precomputed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViewModel {
    pub balance: Money,
    pub income: Money,
    pub expenses: Money,
    pub savings: Money,
    pub expenses_ratio: Decimal,
    pub expenses_ratio_percent: i64,
    /// `None` when there is no expense rate to project from.
    pub runway_days: Option<i64>,
    pub category_split: Vec<CategorySplit>,
    pub weekly_trend: Vec<WeeklyPoint>,
    pub income_cycle: IncomeCycleSummary,
    /// Most recent first.
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone)]
pub struct ViewModelBuilder {
    recent_limit: usize,
    classifier: ScopeClassifier,
}

impl Default for ViewModelBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_TRANSACTIONS, ScopeClassifier::default())
    }
}

impl ViewModelBuilder {
    pub fn new(recent_limit: usize, classifier: ScopeClassifier) -> Self {
        Self {
            recent_limit,
            classifier,
        }
    }

    /// Validates a raw snapshot and builds from it, failing fast on bad input.
    pub fn build_from_raw(&self, raw: RawSnapshot) -> Result<DashboardViewModel, SnapshotError> {
        let snapshot = Snapshot::try_from(raw)?;
        self.build(snapshot)
    }

    /// Fails only when derived sums leave `Decimal`'s range.
    pub fn build(&self, snapshot: Snapshot) -> Result<DashboardViewModel, SnapshotError> {
        let (derived_income, derived_expenses) = aggregate::totals(&snapshot.transactions)?;
        let income = snapshot.income.unwrap_or(derived_income);
        let expenses = snapshot.expenses.unwrap_or(derived_expenses);
        let savings = match snapshot.savings {
            Some(savings) => savings,
            None => income
                .checked_sub(expenses)
                .ok_or_else(|| SnapshotError::invalid("savings", "income - expenses overflows"))?,
        };

        let category_split = match snapshot.category_split {
            Some(split) => split,
            None => aggregate::split_by_scope(&snapshot.transactions, &self.classifier)?,
        };
        let weekly_trend = match snapshot.weekly_trend {
            Some(week) => week,
            None => aggregate::weekly_series(&snapshot.transactions)?,
        };

        let mut transactions = snapshot.transactions;
        // Stable, so same-day transactions keep the source's order.
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions.truncate(self.recent_limit);

        let expenses_ratio = expenses_ratio(income, expenses);
        let view_model = DashboardViewModel {
            balance: snapshot.balance,
            income,
            expenses,
            savings,
            expenses_ratio,
            expenses_ratio_percent: whole_percent(expenses_ratio),
            runway_days: runway_days(savings, expenses),
            category_split,
            weekly_trend,
            income_cycle: snapshot.income_cycle,
            transactions,
        };
        debug!(
            income = %view_model.income,
            expenses = %view_model.expenses,
            transactions = view_model.transactions.len(),
            "Built dashboard view model"
        );
        Ok(view_model)
    }
}

/// `expenses / max(income, 1)`; the floor keeps a zero income from dividing by zero.
pub fn expenses_ratio(income: Money, expenses: Money) -> Decimal {
    let denominator = income.amount().max(Decimal::ONE);
    expenses.amount() / denominator
}

fn whole_percent(ratio: Decimal) -> i64 {
    ratio
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| {
            p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .unwrap_or(i64::MAX)
}

/// Naive runway in days: savings divided by the daily expense rate, never below one.
///
/// This is a placeholder heuristic, not a financial model.
pub fn runway_days(savings: Money, expenses: Money) -> Option<i64> {
    let daily_rate = expenses.amount() / Decimal::from(DAYS_PER_MONTH);
    let days = savings.amount().checked_div(daily_rate)?;
    let days = days
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX);
    Some(days.max(1))
}
