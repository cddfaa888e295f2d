use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

use super::Prediction;

/// POST /predict (multipart `file`). Unauthenticated by design; protecting
/// this route is a deployment concern.
#[instrument(skip(state, multipart))]
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Prediction>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            let prediction = state
                .classifier
                .classify(&filename, bytes)
                .await
                .map_err(ApiError::Upstream)?;
            return Ok(Json(prediction));
        }
    }

    Err(ApiError::Validation("file field is required".into()))
}
