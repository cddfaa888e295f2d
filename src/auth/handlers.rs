use axum::{
    extract::{FromRef, State},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, SignupRequest, SignupResponse, UserSummary},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
        validation::{is_valid_email, is_valid_username, password_error},
    },
    error::ApiError,
    state::AppState,
};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    if !is_valid_username(&payload.username) {
        return Err(ApiError::Validation(
            "Username must be 3-20 characters long and contain only letters, numbers, and underscores"
                .into(),
        ));
    }
    if let Some(reason) = password_error(&payload.password) {
        return Err(ApiError::Validation(reason.into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email address".into()));
    }

    // Friendlier message when the identity is visibly taken; a race past
    // this check is still caught by the unique constraints below.
    if let Some(existing) =
        User::find_conflicting(&state.db, &payload.username, &payload.email).await?
    {
        let message = if existing.username == payload.username {
            "Username already exists. Please choose a different username."
        } else {
            "Email already exists. Please use a different email."
        };
        warn!(email = %payload.email, "signup identity already taken");
        return Err(ApiError::Conflict(message.into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &payload.username,
        &payload.email,
        &hash,
        payload.is_admin,
    )
    .await
    .map_err(ApiError::from_unique_violation)?;

    info!(user_id = user.id, "user created");
    Ok(Json(SignupResponse {
        message: "User created successfully".into(),
        is_admin: user.is_admin,
    }))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    // Unknown user and wrong password answer identically so the response
    // does not reveal which half was wrong.
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!("login unknown username");
            return Err(ApiError::Auth(BAD_CREDENTIALS.into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login wrong password");
        return Err(ApiError::Auth(BAD_CREDENTIALS.into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&user.username, user.is_admin)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".into(),
        user_id: user.id,
        is_admin: user.is_admin,
    }))
}

/// GET /admin/users. Requires a token whose admin claim is set.
#[instrument(skip(state, claims), fields(username = %claims.sub))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    if !claims.is_admin {
        return Err(ApiError::Forbidden);
    }

    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}
