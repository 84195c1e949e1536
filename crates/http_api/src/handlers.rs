use axum::{
    extract::{Json, Query, State},
    http::{HeaderValue, StatusCode, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    response::{IntoResponse, Response},
};

use app_api::{
    CacheClearRequest, ContributionsRequest, EmptyRequest, GfgCountQuery, ProfileRequest,
    SettingsPutRequest,
};

use crate::{errors::HttpError, state::HttpState};

pub async fn dashboard(
    State(state): State<HttpState>,
    Json(req): Json<ProfileRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::dashboard(&state.context, req).await?;
    Ok(Json(response))
}

pub async fn refresh(
    State(state): State<HttpState>,
    Json(req): Json<ProfileRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::refresh(&state.context, req).await?;
    Ok(Json(response))
}

pub async fn contributions(
    State(state): State<HttpState>,
    Json(req): Json<ContributionsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::contributions(&state.context, req).await?;
    Ok(Json(response))
}

pub async fn cache_list(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::cache_list(&state.context)?;
    Ok(Json(response))
}

pub async fn cache_clear(
    State(state): State<HttpState>,
    Json(req): Json<CacheClearRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::cache_clear(&state.context, req)?;
    Ok(Json(response))
}

pub async fn settings_get(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::settings_get(&state.context)?;
    Ok(Json(response))
}

pub async fn settings_put(
    State(state): State<HttpState>,
    Json(req): Json<SettingsPutRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::settings_put(&state.context, req)?;
    Ok(Json(response))
}

/// Public count proxy, callable from any origin.
pub async fn gfg_count(
    State(state): State<HttpState>,
    Query(query): Query<GfgCountQuery>,
) -> Result<Response, HttpError> {
    let response = app_api::gfg_count(&state.context, query)
        .await
        .map_err(|err| HttpError::from(err).public())?;
    let mut response = Json(response).into_response();
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    Ok(response)
}

pub async fn health() -> impl IntoResponse {
    Json(app_api::ok())
}

pub async fn not_found() -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        "no such route",
        Some("not_found".to_string()),
    )
}
