mod support;

use std::sync::Arc;

use sources::{CountSource, TieredSource};
use stats_app::{AppConfig, AppError, AppState, DbCacheStore, ProfileParams, SettingsUpdate};
use stats_core::{SourceKind, TieredCount};
use support::{FakeCount, FakeTiered, ManualClock, MemoryStore, setup_app, source_set, stats};

const NOW: i64 = 1_700_000_000_000;

#[tokio::test]
async fn failing_sources_contribute_zero_and_are_reported() {
    let mirror = FakeTiered::failing(SourceKind::LeetcodeMirror);
    let graphql = FakeTiered::failing(SourceKind::LeetcodeGraphql);
    let gfg = FakeCount::failing();
    let sources = source_set(
        vec![mirror.clone() as Arc<dyn TieredSource>, graphql as Arc<dyn TieredSource>],
        vec![gfg as Arc<dyn CountSource>],
    );
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));

    let dashboard = app
        .state
        .services
        .dashboard
        .dashboard(&ProfileParams::default())
        .await
        .expect("dashboard");
    assert_eq!(dashboard.total_solved, 0);
    assert_eq!(dashboard.difficulty, TieredCount::default());
    assert_eq!(
        dashboard.errors.get(&SourceKind::LeetcodeMirror).map(String::as_str),
        Some("upstream returned status 500")
    );
    assert!(dashboard.errors.contains_key(&SourceKind::LeetcodeGraphql));
    assert!(dashboard.errors.contains_key(&SourceKind::GfgProfile));
    assert_eq!(mirror.calls(), 1);
}

#[tokio::test]
async fn untiered_count_is_allocated_by_tiered_weights() {
    let mirror = FakeTiered::ok(SourceKind::LeetcodeMirror, stats(4, 3, 1, 0));
    let sources = source_set(
        vec![mirror as Arc<dyn TieredSource>],
        vec![FakeCount::ok(10) as Arc<dyn CountSource>],
    );
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));

    let dashboard = app
        .state
        .services
        .dashboard
        .dashboard(&ProfileParams::default())
        .await
        .expect("dashboard");
    assert_eq!(dashboard.untiered_solved, 10);
    assert_eq!(dashboard.allocation, TieredCount::new(8, 2, 0));
    assert_eq!(dashboard.difficulty, TieredCount::new(11, 3, 0));
    assert_eq!(dashboard.total_solved, 14);
    assert_eq!(dashboard.contest_rating, Some(1650.0));
    assert_eq!(dashboard.rating_history.len(), 1);
    assert!(dashboard.errors.is_empty());
}

#[tokio::test]
async fn tiered_chain_falls_back_to_next_source() {
    let mirror = FakeTiered::failing(SourceKind::LeetcodeMirror);
    let graphql = FakeTiered::ok(SourceKind::LeetcodeGraphql, stats(6, 3, 2, 1));
    let sources = source_set(
        vec![mirror.clone() as Arc<dyn TieredSource>, graphql.clone() as Arc<dyn TieredSource>],
        vec![FakeCount::ok(0) as Arc<dyn CountSource>],
    );
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));

    let dashboard = app
        .state
        .services
        .dashboard
        .dashboard(&ProfileParams::default())
        .await
        .expect("dashboard");
    assert_eq!(dashboard.leetcode.total_solved, 6);
    assert_eq!(dashboard.difficulty, TieredCount::new(3, 2, 1));
    assert_eq!(dashboard.errors.len(), 1);
    assert!(dashboard.errors.contains_key(&SourceKind::LeetcodeMirror));
    assert_eq!((mirror.calls(), graphql.calls()), (1, 1));
}

#[tokio::test]
async fn unavailable_settings_store_falls_back_to_config_profile() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").expect("write blocker");
    let mut config = AppConfig::new(blocker.join("app.sqlite"));
    config.profile.leetcode = "lc-user".to_string();
    config.profile.gfg = "gfg-user".to_string();
    config.profile.extra_solved = 1;
    let sources = source_set(
        vec![FakeTiered::ok(SourceKind::LeetcodeMirror, stats(4, 3, 1, 0)) as Arc<dyn TieredSource>],
        vec![FakeCount::ok(10) as Arc<dyn CountSource>],
    );
    let store = Arc::new(DbCacheStore::new(config.db_path.clone()));
    let state = AppState::with_parts(config, sources, store, ManualClock::new(NOW));

    let dashboard = state
        .services
        .dashboard
        .dashboard(&ProfileParams::default())
        .await
        .expect("dashboard");
    assert_eq!(dashboard.total_solved, 15);
    assert_eq!(dashboard.allocation, TieredCount::new(8, 2, 0));

    let refreshed = state
        .services
        .dashboard
        .refresh(&ProfileParams::default())
        .await
        .expect("refresh");
    assert_eq!(refreshed.total_solved, 15);
}

#[tokio::test]
async fn missing_breakdown_splits_untiered_evenly() {
    let sources = source_set(
        vec![FakeTiered::failing(SourceKind::LeetcodeMirror) as Arc<dyn TieredSource>],
        vec![FakeCount::ok(5) as Arc<dyn CountSource>],
    );
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));

    let dashboard = app
        .state
        .services
        .dashboard
        .dashboard(&ProfileParams::default())
        .await
        .expect("dashboard");
    assert_eq!(dashboard.allocation, TieredCount::new(2, 2, 1));
    assert_eq!(dashboard.total_solved, 5);
}

#[tokio::test]
async fn settings_offset_total_and_override_rating() {
    let sources = source_set(
        vec![FakeTiered::ok(SourceKind::LeetcodeMirror, stats(10, 5, 4, 1)) as Arc<dyn TieredSource>],
        vec![FakeCount::ok(3) as Arc<dyn CountSource>],
    );
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));
    app.state
        .services
        .settings
        .update(&SettingsUpdate {
            extra_solved: Some(550),
            contest_rating: Some(1871.0),
            ..SettingsUpdate::default()
        })
        .expect("update settings");

    let dashboard = app
        .state
        .services
        .dashboard
        .dashboard(&ProfileParams::default())
        .await
        .expect("dashboard");
    assert_eq!(dashboard.extra_solved, 550);
    assert_eq!(dashboard.total_solved, 563);
    assert_eq!(dashboard.difficulty.total(), 13);
    assert_eq!(dashboard.contest_rating, Some(1871.0));
}

#[tokio::test]
async fn cached_results_are_reused_until_refresh() {
    let mirror = FakeTiered::ok(SourceKind::LeetcodeMirror, stats(4, 3, 1, 0));
    let gfg = FakeCount::ok(2);
    let sources = source_set(
        vec![mirror.clone() as Arc<dyn TieredSource>],
        vec![gfg.clone() as Arc<dyn CountSource>],
    );
    let store = Arc::new(MemoryStore::default());
    let app = setup_app(sources, store.clone(), ManualClock::new(NOW));
    let dashboard = &app.state.services.dashboard;
    let params = ProfileParams::default();

    dashboard.dashboard(&params).await.expect("first");
    dashboard.dashboard(&params).await.expect("second");
    assert_eq!((mirror.calls(), gfg.calls()), (1, 1));
    assert!(store.get("leetcode:lc-user").is_some());
    assert!(store.get("gfgCount:gfg-user").is_some());

    dashboard.refresh(&params).await.expect("refresh");
    assert_eq!((mirror.calls(), gfg.calls()), (2, 2));
}

#[tokio::test]
async fn request_overrides_pick_the_cache_identity() {
    let mirror = FakeTiered::ok(SourceKind::LeetcodeMirror, stats(1, 1, 0, 0));
    let sources = source_set(
        vec![mirror as Arc<dyn TieredSource>],
        vec![FakeCount::ok(0) as Arc<dyn CountSource>],
    );
    let store = Arc::new(MemoryStore::default());
    let app = setup_app(sources, store.clone(), ManualClock::new(NOW));
    let params = ProfileParams {
        leetcode: Some("someone-else".to_string()),
        ..ProfileParams::default()
    };

    app.state
        .services
        .dashboard
        .dashboard(&params)
        .await
        .expect("dashboard");
    assert!(store.get("leetcode:someone-else").is_some());
    assert!(store.get("leetcode:lc-user").is_none());
}

#[tokio::test]
async fn contributions_report_totals_days() {
    let sources = source_set(Vec::new(), Vec::new());
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));

    let report = app
        .state
        .services
        .contributions
        .report(None)
        .await
        .expect("report");
    assert_eq!(report.user, "gh-user");
    assert_eq!(report.days.len(), 2);
    assert_eq!(report.total, 7);
    assert!(report.error.is_none());
}

#[tokio::test]
async fn cache_clear_rejects_unknown_sources() {
    let sources = source_set(Vec::new(), Vec::new());
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));
    let err = app
        .state
        .services
        .cache
        .clear(Some("bogus"))
        .expect_err("unknown source");
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(app.state.services.cache.clear(Some("ghContribs")).expect("clear"), 0);
}

struct SlowCount;

#[async_trait::async_trait]
impl CountSource for SlowCount {
    fn kind(&self) -> SourceKind {
        SourceKind::GfgProfile
    }

    async fn solved_count(&self, _user: &str) -> sources::Result<u64> {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok(1)
    }
}

#[tokio::test]
async fn concurrent_refresh_is_rejected() {
    let sources = source_set(
        vec![FakeTiered::ok(SourceKind::LeetcodeMirror, stats(1, 1, 0, 0)) as Arc<dyn TieredSource>],
        vec![Arc::new(SlowCount) as Arc<dyn CountSource>],
    );
    let app = setup_app(sources, Arc::new(MemoryStore::default()), ManualClock::new(NOW));
    let dashboard = &app.state.services.dashboard;
    let params = ProfileParams::default();

    let (first, second) = tokio::join!(dashboard.refresh(&params), dashboard.refresh(&params));
    assert_eq!(first.expect("first refresh").total_solved, 2);
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // the flag is released once the first refresh completes
    assert!(dashboard.refresh(&params).await.is_ok());
}
