use stats_app::{AppError, ContributionsReport, Result};
use stats_core::{CacheEntryInfo, DashboardStats};

use crate::{
    AppContext, CacheClearRequest, ClearedResponse, ContributionsRequest, CountResponse,
    GfgCountQuery, OkResponse, ProfileRequest, SettingsPutRequest, SettingsResponse,
};

pub async fn dashboard(ctx: &AppContext, req: ProfileRequest) -> Result<DashboardStats> {
    ctx.app_state
        .services
        .dashboard
        .dashboard(&req.into())
        .await
}

pub async fn refresh(ctx: &AppContext, req: ProfileRequest) -> Result<DashboardStats> {
    ctx.app_state.services.dashboard.refresh(&req.into()).await
}

pub async fn contributions(
    ctx: &AppContext,
    req: ContributionsRequest,
) -> Result<ContributionsReport> {
    ctx.app_state
        .services
        .contributions
        .report(req.user.as_deref())
        .await
}

/// Uncached count straight from the profile page.
pub async fn gfg_count(ctx: &AppContext, query: GfgCountQuery) -> Result<CountResponse> {
    let user = query
        .user
        .as_deref()
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .map(str::to_string);
    let user = match user {
        Some(user) => user,
        None => ctx.app_state.services.settings.get()?.profile.gfg,
    };
    if user.is_empty() {
        return Err(AppError::InvalidInput("user is required".to_string()));
    }
    let count = ctx.app_state.services.gfg.count(&user).await?;
    Ok(CountResponse { count })
}

pub fn cache_list(ctx: &AppContext) -> Result<Vec<CacheEntryInfo>> {
    ctx.app_state.services.cache.list()
}

pub fn cache_clear(ctx: &AppContext, req: CacheClearRequest) -> Result<ClearedResponse> {
    let cleared = ctx.app_state.services.cache.clear(req.source.as_deref())?;
    Ok(ClearedResponse { cleared })
}

pub fn settings_get(ctx: &AppContext) -> Result<SettingsResponse> {
    let snapshot = ctx.app_state.services.settings.get()?;
    Ok(settings_response(ctx, snapshot))
}

pub fn settings_put(ctx: &AppContext, req: SettingsPutRequest) -> Result<SettingsResponse> {
    let snapshot = ctx.app_state.services.settings.update(&req.into())?;
    Ok(settings_response(ctx, snapshot))
}

fn settings_response(ctx: &AppContext, snapshot: stats_app::SettingsSnapshot) -> SettingsResponse {
    SettingsResponse {
        leetcode_username: snapshot.profile.leetcode,
        github_username: snapshot.profile.github,
        gfg_username: snapshot.profile.gfg,
        extra_solved: snapshot.extra_solved,
        contest_rating: snapshot.contest_rating,
        cache_ttl_minutes: ctx.app_state.config.cache_ttl_ms / 60_000,
        db_path: snapshot.db_path,
        app_data_dir: ctx.app_data_dir.to_string_lossy().to_string(),
    }
}

pub fn ok() -> OkResponse {
    OkResponse { ok: true }
}
