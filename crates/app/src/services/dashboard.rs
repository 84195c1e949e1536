use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use stats_core::{
    ContestPoint, DashboardStats, Profile, SolvedStats, SourceKind, allocate_untiered,
};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::config::ProfileParams;
use crate::error::{AppError, Result};
use crate::services::settings::load_snapshot_or_defaults;
use crate::services::{SharedConfig, SharedSources};

type SourceErrors = Vec<(SourceKind, String)>;

/// Merges every configured source into one dashboard.
#[derive(Clone)]
pub struct DashboardService {
    config: SharedConfig,
    sources: SharedSources,
    cache: TtlCache,
    refreshing: Arc<AtomicBool>,
}

impl DashboardService {
    pub(super) fn new(config: SharedConfig, sources: SharedSources, cache: TtlCache) -> Self {
        Self {
            config,
            sources,
            cache,
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn dashboard(&self, params: &ProfileParams) -> Result<DashboardStats> {
        let snapshot = load_snapshot_or_defaults(&self.config);
        let mut profile = snapshot.profile;
        params.apply(&mut profile);
        Ok(self
            .aggregate(&profile, snapshot.extra_solved, snapshot.contest_rating)
            .await)
    }

    /// Drops the profile's cached entries and aggregates from the network.
    /// Only one refresh runs at a time per service.
    pub async fn refresh(&self, params: &ProfileParams) -> Result<DashboardStats> {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::Conflict("refresh already in progress".to_string()));
        }
        let _guard = RefreshGuard(&self.refreshing);

        let snapshot = load_snapshot_or_defaults(&self.config);
        let mut profile = snapshot.profile;
        params.apply(&mut profile);
        let mut removed = 0;
        for kind in SourceKind::ALL {
            let user = profile.user_for(kind);
            if user.is_empty() {
                continue;
            }
            match self.cache.invalidate(kind, user) {
                Ok(count) => removed += count,
                Err(err) => warn!(source = %kind, %err, "cache invalidation failed"),
            }
        }
        info!(removed, "cache invalidated for refresh");
        Ok(self
            .aggregate(&profile, snapshot.extra_solved, snapshot.contest_rating)
            .await)
    }

    /// Best-effort merge: failing sources count as zero and are reported in
    /// `errors`.
    pub async fn aggregate(
        &self,
        profile: &Profile,
        extra_solved: u64,
        contest_rating: Option<f64>,
    ) -> DashboardStats {
        let (tiered, untiered, contests) = tokio::join!(
            self.fetch_tiered(profile),
            self.fetch_untiered(profile),
            self.fetch_contests(profile),
        );
        let (leetcode, mut errors) = tiered;
        let (untiered_solved, untiered_errors) = untiered;
        let (rating_history, contest_errors) = contests;
        errors.extend(untiered_errors);
        errors.extend(contest_errors);

        let leetcode = leetcode.unwrap_or_default();
        let breakdown = leetcode.breakdown();
        let allocation = allocate_untiered(untiered_solved, breakdown);
        let errors: BTreeMap<SourceKind, String> = errors.into_iter().collect();
        for (kind, message) in &errors {
            warn!(source = %kind, error = %message, "source degraded");
        }
        DashboardStats {
            total_solved: leetcode
                .total_solved
                .saturating_add(untiered_solved)
                .saturating_add(extra_solved),
            leetcode,
            untiered_solved,
            extra_solved,
            difficulty: breakdown.merged(&allocation),
            allocation,
            contest_rating: contest_rating.or_else(|| rating_history.last().map(|p| p.rating)),
            rating_history,
            errors,
        }
    }

    async fn fetch_tiered(&self, profile: &Profile) -> (Option<SolvedStats>, SourceErrors) {
        let mut errors = Vec::new();
        for source in &self.sources.tiered {
            let kind = source.kind();
            let user = match required_user(profile, kind) {
                Ok(user) => user,
                Err(message) => {
                    errors.push((kind, message));
                    continue;
                }
            };
            match self
                .cache
                .get_or_fetch(kind, user, move || source.solved_stats(user))
                .await
            {
                Ok(stats) => {
                    debug!(source = %kind, total = stats.total_solved, "tiered source answered");
                    return (Some(stats), errors);
                }
                Err(err) => errors.push((kind, err.to_string())),
            }
        }
        (None, errors)
    }

    async fn fetch_untiered(&self, profile: &Profile) -> (u64, SourceErrors) {
        let fetches = self.sources.untiered.iter().map(|source| async move {
            let kind = source.kind();
            let user = required_user(profile, kind).map_err(|message| (kind, message))?;
            self.cache
                .get_or_fetch(kind, user, move || source.solved_count(user))
                .await
                .map_err(|err| (kind, err.to_string()))
        });
        let mut total = 0u64;
        let mut errors = Vec::new();
        for result in join_all(fetches).await {
            match result {
                Ok(count) => total = total.saturating_add(count),
                Err(error) => errors.push(error),
            }
        }
        (total, errors)
    }

    async fn fetch_contests(&self, profile: &Profile) -> (Vec<ContestPoint>, SourceErrors) {
        let Some(source) = self.sources.contests.as_ref() else {
            return (Vec::new(), Vec::new());
        };
        let kind = source.kind();
        let user = match required_user(profile, kind) {
            Ok(user) => user,
            Err(message) => return (Vec::new(), vec![(kind, message)]),
        };
        match self
            .cache
            .get_or_fetch(kind, user, move || source.contest_history(user))
            .await
        {
            Ok(history) => (history, Vec::new()),
            Err(err) => (Vec::new(), vec![(kind, err.to_string())]),
        }
    }
}

fn required_user(profile: &Profile, kind: SourceKind) -> std::result::Result<&str, String> {
    let user = profile.user_for(kind);
    if user.is_empty() {
        Err("no username configured".to_string())
    } else {
        Ok(user)
    }
}

struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
