mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

pub use middleware::TOKEN_HEADER;
pub use state::{HttpState, generate_api_token};

pub fn router(state: HttpState) -> Router<()> {
    let private = Router::new()
        .route("/dashboard", post(handlers::dashboard))
        .route("/refresh", post(handlers::refresh))
        .route("/contributions", post(handlers::contributions))
        .route("/cache_list", post(handlers::cache_list))
        .route("/cache_clear", post(handlers::cache_clear))
        .route("/settings_get", post(handlers::settings_get))
        .route("/settings_put", post(handlers::settings_put))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_token,
        ));
    let public = Router::new()
        .route("/gfg-count", get(handlers::gfg_count))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", private.merge(public))
        .fallback(handlers::not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests;
