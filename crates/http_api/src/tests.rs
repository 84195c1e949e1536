use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use app_api::AppContext;
use stats_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};

use crate::HttpState;

#[tokio::test]
async fn unknown_routes_get_json_404() {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::new(temp_dir.path().to_path_buf());
    ensure_app_data_dir(&paths).expect("ensure app data dir");
    let app_state = AppState::new(AppConfig::new(paths.db_path)).expect("app state");
    app_state.setup_db().expect("setup db");

    let context = AppContext {
        app_state,
        app_data_dir: paths.app_data_dir,
    };
    let state = HttpState::new(context, "testtoken".to_string());
    let app = crate::router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    assert!(content_type.contains("application/json"));
}
