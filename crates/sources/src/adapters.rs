use async_trait::async_trait;
use stats_core::{ContestPoint, ContributionDay, SolvedStats, SourceKind};

use crate::types::Result;

/// A source that reports solved counts broken down by difficulty.
#[async_trait]
pub trait TieredSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn solved_stats(&self, user: &str) -> Result<SolvedStats>;
}

/// A source that only reports a single solved count.
#[async_trait]
pub trait CountSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn solved_count(&self, user: &str) -> Result<u64>;
}

#[async_trait]
pub trait ContestSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn contest_history(&self, user: &str) -> Result<Vec<ContestPoint>>;
}

#[async_trait]
pub trait ContributionSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn contributions(&self, user: &str) -> Result<Vec<ContributionDay>>;
}
