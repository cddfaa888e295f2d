use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{jwt::AuthUser, repo::User},
    error::ApiError,
    state::AppState,
};

use super::{
    dto::{CreateHistoryParts, HistoryMessage},
    repo::HistoryRecord,
};

async fn collect_parts(multipart: &mut Multipart) -> Result<CreateHistoryParts, ApiError> {
    let mut parts = CreateHistoryParts::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                parts.file = Some((filename, bytes));
            }
            Some("result") => {
                parts.result = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            Some("confidence") => {
                parts.confidence = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            _ => {}
        }
    }
    Ok(parts)
}

/// POST /history (multipart `file`, `result`, `confidence`).
#[instrument(skip(state, claims, multipart), fields(username = %claims.sub))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<HistoryMessage>, ApiError> {
    let parts = collect_parts(&mut multipart).await?;

    let (filename, image) = parts
        .file
        .ok_or_else(|| ApiError::Validation("file field is required".into()))?;
    let disease_name = parts
        .result
        .ok_or_else(|| ApiError::Validation("result field is required".into()))?;
    let confidence: f64 = parts
        .confidence
        .ok_or_else(|| ApiError::Validation("confidence field is required".into()))?
        .parse()
        .map_err(|_| ApiError::Validation("confidence must be a number".into()))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(ApiError::Validation(
            "confidence must be between 0 and 1".into(),
        ));
    }

    let user = User::find_by_username(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let stored = state
        .storage
        .save(&filename, image)
        .await
        .map_err(ApiError::Internal)?;

    // The row is the source of truth. If the insert fails the just-written
    // file is removed so no orphan is left behind.
    let record =
        match HistoryRecord::insert(&state.db, user.id, &disease_name, confidence, &stored).await {
            Ok(r) => r,
            Err(e) => {
                if let Err(cleanup) = state.storage.remove(&stored).await {
                    warn!(error = %cleanup, image = %stored, "could not clean up image after failed insert");
                }
                return Err(e.into());
            }
        };

    info!(history_id = record.id, user_id = user.id, "history entry created");
    Ok(Json(HistoryMessage {
        message: "History entry created successfully".into(),
    }))
}

/// GET /history. Caller's records, newest first.
#[instrument(skip(state, claims), fields(username = %claims.sub))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    let records = HistoryRecord::list_by_username(&state.db, &claims.sub).await?;
    Ok(Json(records))
}

/// DELETE /history/:id. Row deletion is authoritative; removing the image
/// file is advisory cleanup and never blocks the delete.
#[instrument(skip(state, claims), fields(username = %claims.sub))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(history_id): Path<i64>,
) -> Result<Json<HistoryMessage>, ApiError> {
    let record = HistoryRecord::find_owned(&state.db, history_id, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("History item not found".into()))?;

    HistoryRecord::delete_by_id(&state.db, record.id).await?;

    if let Err(e) = state.storage.remove(&record.image_path).await {
        warn!(error = %e, image = %record.image_path, "could not delete image file");
    }

    info!(history_id = record.id, "history entry deleted");
    Ok(Json(HistoryMessage {
        message: "History item deleted successfully".into(),
    }))
}
