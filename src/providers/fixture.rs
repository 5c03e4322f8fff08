//! Built-in sample snapshot, served after a short artificial delay.

use crate::core::snapshot::RawSnapshot;
use crate::core::source::SnapshotSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

const SAMPLE_SNAPSHOT: &str = r#"{
    "balance": 12450.23,
    "income": 42000,
    "expenses": 30550,
    "savings": 5000,
    "personalVsProfessional": [
        { "name": "Personal", "value": 18500 },
        { "name": "Professional", "value": 12050 }
    ],
    "weeklyTrend": [
        { "day": "Mon", "income": 4200, "expense": 1500 },
        { "day": "Tue", "income": 3800, "expense": 1700 },
        { "day": "Wed", "income": 4500, "expense": 1200 },
        { "day": "Thu", "income": 2000, "expense": 900 },
        { "day": "Fri", "income": 6000, "expense": 2400 },
        { "day": "Sat", "income": 0, "expense": 800 },
        { "day": "Sun", "income": 0, "expense": 450 }
    ],
    "incomeCycle": {
        "usualArrival": "1st week",
        "onTimePercent": 82,
        "suggestions": [
            "Maintain 2 weeks of buffer when income is irregular",
            "Move 20% of payday income to an emergency fund"
        ]
    },
    "transactions": [
        { "id": 1, "date": "2025-09-28", "desc": "Salary (Acme Corp)", "amount": 35000, "type": "income", "category": "Salary" },
        { "id": 2, "date": "2025-09-27", "desc": "Freelance - UI task", "amount": 7000, "type": "income", "category": "Freelance" },
        { "id": 3, "date": "2025-09-26", "desc": "Dinner - Zomato", "amount": -450, "type": "expense", "category": "Food" },
        { "id": 4, "date": "2025-09-24", "desc": "Uber - commute", "amount": -320, "type": "expense", "category": "Transport" },
        { "id": 5, "date": "2025-09-23", "desc": "Domain renewal", "amount": -899, "type": "expense", "category": "Services" }
    ]
}"#;

pub struct FixtureSource {
    delay: Duration,
}

impl FixtureSource {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[async_trait]
impl SnapshotSource for FixtureSource {
    #[instrument(name = "FixtureSnapshotFetch", skip(self))]
    async fn fetch_snapshot(&self) -> Result<RawSnapshot> {
        tokio::time::sleep(self.delay).await;
        debug!("Serving built-in sample snapshot");
        serde_json::from_str(SAMPLE_SNAPSHOT).context("Failed to parse built-in sample snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::ViewModelBuilder;
    use crate::core::money::Money;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_fixture_builds_expected_dashboard() {
        let source = FixtureSource::new(0);
        let raw = source.fetch_snapshot().await.unwrap();
        assert_eq!(raw.balance, Some(Decimal::new(1245023, 2)));

        let vm = ViewModelBuilder::default().build_from_raw(raw).unwrap();
        assert_eq!(vm.balance.to_string(), "₹12,450");
        assert_eq!(vm.expenses_ratio_percent, 73);
        assert_eq!(vm.runway_days, Some(5));
        assert_eq!(vm.savings, Money::from(5000));
        assert_eq!(vm.category_split[0].total, Money::from(18500));
        assert_eq!(vm.weekly_trend.len(), 7);
        assert_eq!(vm.transactions.len(), 5);
        assert_eq!(vm.transactions[2].display_amount(), "₹450");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixture_waits_for_delay() {
        let source = FixtureSource::new(220);
        let started = tokio::time::Instant::now();
        source.fetch_snapshot().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(220));
    }
}
