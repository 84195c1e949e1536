use stats_core::{CacheEntryInfo, SourceKind};
use tracing::info;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};

#[derive(Clone)]
pub struct CacheService {
    config: SharedConfig,
}

impl CacheService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn list(&self) -> Result<Vec<CacheEntryInfo>> {
        Ok(open_db(&self.config)?.cache_entries()?)
    }

    /// Clears every entry, or only those of one source prefix.
    pub fn clear(&self, source: Option<&str>) -> Result<usize> {
        let kind = match source.map(str::trim).filter(|value| !value.is_empty()) {
            Some(prefix) => Some(SourceKind::from_cache_prefix(prefix).ok_or_else(|| {
                AppError::InvalidInput(format!("unknown cache source: {prefix}"))
            })?),
            None => None,
        };
        let cleared = open_db(&self.config)?.cache_clear(kind.map(SourceKind::cache_prefix))?;
        info!(cleared, source = ?kind, "cache cleared");
        Ok(cleared)
    }
}
