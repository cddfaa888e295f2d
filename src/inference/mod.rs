use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::state::AppState;

mod client;
pub mod handlers;

pub use client::{Classifier, Prediction, RemoteClassifier};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(handlers::predict))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}
