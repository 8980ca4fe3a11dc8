use axum::{Json, Router, routing::get};

use crate::docs;
use crate::state::AppState;

pub fn configure_routes(state: &AppState) -> Router<AppState> {
    let spec = docs::openapi(state.config.mode);

    Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || async move { Json(spec) }),
        )
        .merge(crate::modules::normalize::router(state.config.mode))
}
