//! The data-source boundary the dashboard fetches from.

use crate::core::snapshot::RawSnapshot;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches the current snapshot. Retry policy, if any, lives in the implementation.
    async fn fetch_snapshot(&self) -> Result<RawSnapshot>;
}
