use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(handlers::list).post(handlers::create))
        .route("/history/:id", delete(handlers::remove))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}
