use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Error taxonomy for the whole service. Handlers return this directly and
/// the HTTP mapping happens in one place, in `into_response`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad input shape or content, rejected before any store access.
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation (username or email already taken).
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or an invalid/expired/malformed token.
    #[error("{0}")]
    Auth(String),

    /// Valid identity, insufficient privilege.
    #[error("admin access required")]
    Forbidden,

    /// Resource absent, or owned by someone else (indistinguishable).
    #[error("{0}")]
    NotFound(String),

    /// Backing store unreachable or query failure.
    #[error("database error")]
    Store(#[from] sqlx::Error),

    /// The external classifier could not be reached or answered garbage.
    #[error("classifier unavailable")]
    Upstream(anyhow::Error),

    /// Anything uncaught. Domain errors are never re-wrapped into this.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl ApiError {
    /// Stable machine-readable kind, part of the response contract.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Conflict(_) => "conflict",
            ApiError::Auth(_) => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Store(_) => "store_error",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Internal(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-safe message. Store and internal detail stays in the logs.
    fn user_message(&self) -> String {
        match self {
            ApiError::Store(_) => "A database error occurred".to_string(),
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            ApiError::Upstream(_) => "Classification service is unavailable".to_string(),
            other => other.to_string(),
        }
    }

    /// Map an insert error to a Conflict when a unique constraint fired,
    /// picking the message by the constraint that was hit. Everything else
    /// stays a store error.
    pub fn from_unique_violation(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                let message = if constraint.contains("email") {
                    "Email already exists. Please use a different email."
                } else {
                    "Username already exists. Please choose a different username."
                };
                return ApiError::Conflict(message.into());
            }
        }
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) => error!(error = %e, "store error"),
            ApiError::Internal(e) => error!(error = ?e, "unexpected error"),
            ApiError::Upstream(e) => warn!(error = ?e, "classifier upstream error"),
            _ => {}
        }

        let status = self.status_code();
        let body = ErrorBody {
            kind: self.kind(),
            message: self.user_message(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_statuses_are_stable() {
        let cases = [
            (ApiError::Validation("x".into()), "validation", 400),
            (ApiError::Conflict("x".into()), "conflict", 409),
            (ApiError::Auth("x".into()), "unauthorized", 401),
            (ApiError::Forbidden, "forbidden", 403),
            (ApiError::NotFound("x".into()), "not_found", 404),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                "internal",
                500,
            ),
        ];
        for (err, kind, status) in cases {
            assert_eq!(err.kind(), kind);
            assert_eq!(err.status_code().as_u16(), status);
        }
    }

    #[test]
    fn store_error_maps_to_500_with_generic_message() {
        let err = ApiError::Store(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code().as_u16(), 500);
        assert_eq!(err.kind(), "store_error");
        assert_eq!(err.user_message(), "A database error occurred");
    }

    #[test]
    fn forbidden_message_names_the_requirement() {
        assert_eq!(ApiError::Forbidden.to_string(), "admin access required");
    }

    #[test]
    fn error_body_serializes_kind_and_message() {
        let body = ErrorBody {
            kind: "conflict",
            message: "taken".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""kind":"conflict""#));
        assert!(json.contains(r#""message":"taken""#));
    }
}
