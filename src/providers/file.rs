use crate::core::snapshot::RawSnapshot;
use crate::core::source::SnapshotSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Reads a snapshot document (JSON, or YAML by extension) from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    #[instrument(name = "FileSnapshotFetch", skip(self), fields(path = %self.path.display()))]
    async fn fetch_snapshot(&self) -> Result<RawSnapshot> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read snapshot file: {}", self.path.display()))?;
        debug!(bytes = text.len(), "Read snapshot file");

        let snapshot = if self.is_yaml() {
            serde_yaml::from_str(&text).with_context(|| {
                format!("Failed to parse snapshot file: {}", self.path.display())
            })?
        } else {
            serde_json::from_str(&text).with_context(|| {
                format!("Failed to parse snapshot file: {}", self.path.display())
            })?
        };
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_yaml_snapshot() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("snapshot.yaml");
        std::fs::write(
            &path,
            r#"
balance: 250
incomeCycle:
  usualArrival: "1st week"
  onTimePercent: 90
  suggestions: ["Save more"]
transactions:
  - id: "a"
    date: "2025-09-01"
    desc: "Coffee"
    amount: -120
    category: "Food"
"#,
        )?;

        let raw = FileSource::new(&path).fetch_snapshot().await?;
        assert_eq!(raw.balance, Some(Decimal::from(250)));
        let transactions = raw.transactions.unwrap();
        assert_eq!(transactions[0].amount, Some(Decimal::from(-120)));
        Ok(())
    }

    #[tokio::test]
    async fn test_reads_json_snapshot() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, r#"{"balance": 10, "transactions": []}"#)?;

        let raw = FileSource::new(&path).fetch_snapshot().await?;
        assert_eq!(raw.balance, Some(Decimal::from(10)));
        assert!(raw.income_cycle.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileSource::new(dir.path().join("missing.json"))
            .fetch_snapshot()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read snapshot file"));
    }
}
