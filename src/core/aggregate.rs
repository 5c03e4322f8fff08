//! Grouping of raw transactions into the aggregates the dashboard charts.

use crate::core::error::SnapshotError;
use crate::core::model::{CategorySplit, SpendScope, Transaction, WEEK, WeeklyPoint};
use crate::core::money::Money;
use chrono::Datelike;
use std::collections::HashSet;

/// Decides which scope a transaction's spend belongs to.
///
/// An explicit scope on the transaction wins. Otherwise the category is
/// matched, case-insensitively, against the configured professional
/// categories, and everything else is personal.
#[derive(Debug, Clone, Default)]
pub struct ScopeClassifier {
    professional_categories: HashSet<String>,
}

impl ScopeClassifier {
    pub fn new<I, S>(professional_categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            professional_categories: professional_categories
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, transaction: &Transaction) -> SpendScope {
        if let Some(scope) = transaction.scope {
            return scope;
        }
        if self
            .professional_categories
            .contains(&transaction.category.trim().to_lowercase())
        {
            SpendScope::Professional
        } else {
            SpendScope::Personal
        }
    }
}

fn accumulate(total: &mut Money, amount: Money) -> Result<(), SnapshotError> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| SnapshotError::invalid("transactions", "amounts overflow when summed"))?;
    Ok(())
}

/// Sums income (positive amounts) and expenses (absolute negative amounts).
pub fn totals(transactions: &[Transaction]) -> Result<(Money, Money), SnapshotError> {
    let (mut income, mut expenses) = (Money::ZERO, Money::ZERO);
    for t in transactions {
        if t.is_expense() {
            accumulate(&mut expenses, t.amount.abs())?;
        } else {
            accumulate(&mut income, t.amount)?;
        }
    }
    Ok((income, expenses))
}

/// Splits spend by scope. Every expense lands in exactly one bucket, and both
/// buckets are always reported in Personal, Professional order.
pub fn split_by_scope(
    transactions: &[Transaction],
    classifier: &ScopeClassifier,
) -> Result<Vec<CategorySplit>, SnapshotError> {
    let mut buckets = [Money::ZERO; 2];
    for t in transactions.iter().filter(|t| t.is_expense()) {
        let index = match classifier.classify(t) {
            SpendScope::Personal => 0,
            SpendScope::Professional => 1,
        };
        accumulate(&mut buckets[index], t.amount.abs())?;
    }

    Ok(SpendScope::ALL
        .iter()
        .zip(buckets)
        .map(|(scope, total)| CategorySplit {
            label: scope.label().to_string(),
            total,
        })
        .collect())
}

/// Buckets every transaction by the weekday of its date.
pub fn weekly_series(transactions: &[Transaction]) -> Result<Vec<WeeklyPoint>, SnapshotError> {
    let mut week: Vec<WeeklyPoint> = WEEK.iter().map(|d| WeeklyPoint::empty(*d)).collect();
    for t in transactions {
        let point = &mut week[t.date.weekday().num_days_from_monday() as usize];
        if t.is_expense() {
            accumulate(&mut point.expense, t.amount.abs())?;
        } else {
            accumulate(&mut point.income, t.amount)?;
        }
    }
    Ok(week)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{TransactionId, TransactionKind};
    use chrono::{NaiveDate, Weekday};

    fn tx(id: &str, date: (i32, u32, u32), amount: i64, category: &str) -> Transaction {
        Transaction {
            id: TransactionId(id.to_string()),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: String::new(),
            amount: Money::from(amount),
            category: category.to_string(),
            kind: if amount < 0 {
                TransactionKind::Expense
            } else {
                TransactionKind::Income
            },
            scope: None,
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            tx("1", (2025, 9, 28), 35000, "Salary"),   // Sun
            tx("2", (2025, 9, 27), 7000, "Freelance"), // Sat
            tx("3", (2025, 9, 26), -450, "Food"),      // Fri
            tx("4", (2025, 9, 24), -320, "Transport"), // Wed
            tx("5", (2025, 9, 23), -899, "Services"),  // Tue
            tx("6", (2025, 9, 22), -1200, "Services"), // Mon
        ]
    }

    #[test]
    fn test_totals() {
        let (income, expenses) = totals(&ledger()).unwrap();
        assert_eq!(income, Money::from(42000));
        assert_eq!(expenses, Money::from(2869));
    }

    #[test]
    fn test_split_sums_to_total_spend() {
        let classifier = ScopeClassifier::new(["services"]);
        let transactions = ledger();
        let splits = split_by_scope(&transactions, &classifier).unwrap();

        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].label, "Personal");
        assert_eq!(splits[0].total, Money::from(770));
        assert_eq!(splits[1].label, "Professional");
        assert_eq!(splits[1].total, Money::from(2099));

        let split_total: Money = splits.iter().map(|s| s.total).sum();
        assert_eq!(split_total, totals(&transactions).unwrap().1);
    }

    #[test]
    fn test_explicit_scope_overrides_category() {
        let classifier = ScopeClassifier::new(["Food"]);
        let mut t = tx("1", (2025, 9, 26), -450, "Food");
        assert_eq!(classifier.classify(&t), SpendScope::Professional);
        t.scope = Some(SpendScope::Personal);
        assert_eq!(classifier.classify(&t), SpendScope::Personal);
    }

    #[test]
    fn test_weekly_series_has_fixed_order_regardless_of_input() {
        let mut transactions = ledger();
        transactions.reverse();
        let week = weekly_series(&transactions).unwrap();

        assert_eq!(week.len(), 7);
        assert_eq!(week.iter().map(|p| p.day).collect::<Vec<_>>(), WEEK.to_vec());
        assert_eq!(week[0].day, Weekday::Mon);
        assert_eq!(week[0].expense, Money::from(1200));
        assert_eq!(week[3], WeeklyPoint::empty(Weekday::Thu));
        assert_eq!(week[6].income, Money::from(35000));

        let income: Money = week.iter().map(|p| p.income).sum();
        let expense: Money = week.iter().map(|p| p.expense).sum();
        assert_eq!((income, expense), totals(&transactions).unwrap());
    }

    #[test]
    fn test_overflowing_sums_are_errors() {
        let transactions: Vec<Transaction> = ["1", "2"]
            .iter()
            .map(|id| Transaction {
                amount: Money::new(-rust_decimal::Decimal::MAX),
                ..tx(id, (2025, 9, 22), -1, "Food")
            })
            .collect();

        assert!(totals(&transactions).is_err());
        assert!(split_by_scope(&transactions, &ScopeClassifier::default()).is_err());
        let err = weekly_series(&transactions).unwrap_err();
        assert!(err.to_string().contains("overflow"));
    }
}
