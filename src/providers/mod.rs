pub mod file;
pub mod fixture;
pub mod http;
pub mod util;

use crate::core::config::SourceConfig;
use crate::core::source::SnapshotSource;
use anyhow::Result;
use std::sync::Arc;

/// Builds the snapshot source selected in the config.
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn SnapshotSource>> {
    let source: Arc<dyn SnapshotSource> = match config {
        SourceConfig::Fixture { delay_ms } => Arc::new(fixture::FixtureSource::new(*delay_ms)),
        SourceConfig::Http {
            base_url,
            account_id,
            period,
            retries,
            retry_delay_ms,
        } => Arc::new(http::HttpSource::new(
            base_url,
            account_id.clone(),
            period.clone(),
            *retries,
            *retry_delay_ms,
        )?),
        SourceConfig::File { path } => Arc::new(file::FileSource::new(path)),
    };
    Ok(source)
}
