#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sources::{
    ContestSource, ContributionSource, CountSource, SourceError, TieredSource,
};
use stats_app::{AppConfig, AppError, AppState, CacheStore, Clock, SourceSet};
use stats_core::{ContestPoint, ContributionDay, SolvedStats, SourceKind};
use tempfile::TempDir;

pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now_ms: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(now_ms)))
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub entries: Mutex<HashMap<String, String>>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("lock")
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("lock").get(key).cloned()
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> stats_app::Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, _source: &str, value: &str) -> stats_app::Result<()> {
        if self.fail_writes {
            return Err(AppError::Message("disk full".to_string()));
        }
        self.insert(key, value);
        Ok(())
    }

    fn delete(&self, key: &str) -> stats_app::Result<usize> {
        Ok(self
            .entries
            .lock()
            .expect("lock")
            .remove(key)
            .map_or(0, |_| 1))
    }
}

/// Tiered source answering with fixed stats, or failing with a status.
pub struct FakeTiered {
    pub kind: SourceKind,
    pub stats: Option<SolvedStats>,
    pub calls: AtomicUsize,
}

impl FakeTiered {
    pub fn ok(kind: SourceKind, stats: SolvedStats) -> Arc<Self> {
        Arc::new(Self {
            kind,
            stats: Some(stats),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(kind: SourceKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            stats: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TieredSource for FakeTiered {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn solved_stats(&self, _user: &str) -> sources::Result<SolvedStats> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stats
            .ok_or(SourceError::UpstreamStatus { status: 500 })
    }
}

pub struct FakeCount {
    pub count: Option<u64>,
    pub calls: AtomicUsize,
}

impl FakeCount {
    pub fn ok(count: u64) -> Arc<Self> {
        Arc::new(Self {
            count: Some(count),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            count: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CountSource for FakeCount {
    fn kind(&self) -> SourceKind {
        SourceKind::GfgProfile
    }

    async fn solved_count(&self, _user: &str) -> sources::Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.count.ok_or(SourceError::MissingPayload(
            "no __NEXT_DATA__ found".to_string(),
        ))
    }
}

pub struct FakeContests(pub Vec<ContestPoint>);

#[async_trait]
impl ContestSource for FakeContests {
    fn kind(&self) -> SourceKind {
        SourceKind::LeetcodeContests
    }

    async fn contest_history(&self, _user: &str) -> sources::Result<Vec<ContestPoint>> {
        if self.0.is_empty() {
            return Err(SourceError::Shape("no contest history".to_string()));
        }
        Ok(self.0.clone())
    }
}

pub struct FakeContributions(pub Vec<ContributionDay>);

#[async_trait]
impl ContributionSource for FakeContributions {
    fn kind(&self) -> SourceKind {
        SourceKind::GithubContributions
    }

    async fn contributions(&self, _user: &str) -> sources::Result<Vec<ContributionDay>> {
        if self.0.is_empty() {
            return Err(SourceError::MissingPayload("no contribution data".to_string()));
        }
        Ok(self.0.clone())
    }
}

pub fn stats(total: u64, easy: u64, medium: u64, hard: u64) -> SolvedStats {
    SolvedStats {
        total_solved: total,
        easy_solved: easy,
        medium_solved: medium,
        hard_solved: hard,
        ranking: 1000,
        contribution_points: 0,
    }
}

pub fn source_set(
    tiered: Vec<Arc<dyn TieredSource>>,
    untiered: Vec<Arc<dyn CountSource>>,
) -> SourceSet {
    SourceSet {
        tiered,
        untiered,
        contests: Some(Arc::new(FakeContests(vec![ContestPoint {
            label: "Jan 2025".to_string(),
            rating: 1650.0,
            start_time: Some(1_736_035_200),
        }]))),
        contributions: Arc::new(FakeContributions(vec![
            ContributionDay::new("2025-01-01", 2),
            ContributionDay::new("2025-01-02", 5),
        ])),
        profile_page: FakeCount::ok(42),
    }
}

pub struct TestApp {
    pub _dir: TempDir,
    pub state: AppState,
}

/// App over a migrated temp DB with usernames configured.
pub fn setup_app(sources: SourceSet, store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = AppConfig::new(dir.path().join("app.sqlite"));
    config.profile.leetcode = "lc-user".to_string();
    config.profile.github = "gh-user".to_string();
    config.profile.gfg = "gfg-user".to_string();
    let state = AppState::with_parts(config, sources, store, clock);
    state.setup_db().expect("setup db");
    TestApp { _dir: dir, state }
}
