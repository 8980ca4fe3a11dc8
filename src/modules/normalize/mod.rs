use axum::Router;
use axum::routing::{get, post};

use crate::config::settings::Mode;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod params;
pub mod service;

pub fn router(mode: Mode) -> Router<AppState> {
    let normalize = match mode {
        Mode::Presigned => post(handler::normalize_presigned),
        Mode::Storage => post(handler::normalize_to_storage),
    };

    Router::new()
        .route("/health", get(handler::health))
        .route("/normalize", normalize)
}
