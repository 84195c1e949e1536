use serde::{Deserialize, Serialize};
use stats_core::{ContributionDay, SourceKind};
use tracing::warn;

use crate::cache::TtlCache;
use crate::error::{AppError, Result};
use crate::services::settings::load_snapshot_or_defaults;
use crate::services::{SharedConfig, SharedSources};

/// Contribution calendar for one user. A failed fetch yields no days and
/// an error message rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionsReport {
    pub user: String,
    pub days: Vec<ContributionDay>,
    pub total: u64,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct ContributionsService {
    config: SharedConfig,
    sources: SharedSources,
    cache: TtlCache,
}

impl ContributionsService {
    pub(super) fn new(config: SharedConfig, sources: SharedSources, cache: TtlCache) -> Self {
        Self {
            config,
            sources,
            cache,
        }
    }

    pub async fn report(&self, user: Option<&str>) -> Result<ContributionsReport> {
        let user = match user.map(str::trim).filter(|user| !user.is_empty()) {
            Some(user) => user.to_string(),
            None => load_snapshot_or_defaults(&self.config).profile.github,
        };
        if user.is_empty() {
            return Err(AppError::InvalidInput(
                "no github username configured".to_string(),
            ));
        }
        let source = &self.sources.contributions;
        let name = user.as_str();
        let fetched = self
            .cache
            .get_or_fetch(SourceKind::GithubContributions, name, move || {
                source.contributions(name)
            })
            .await;
        let (days, error) = match fetched {
            Ok(days) => (days, None),
            Err(err) => {
                warn!(%user, %err, "contributions unavailable");
                (Vec::new(), Some(err.to_string()))
            }
        };
        let total = days.iter().map(|day| day.count).sum();
        Ok(ContributionsReport {
            user,
            days,
            total,
            error,
        })
    }
}
