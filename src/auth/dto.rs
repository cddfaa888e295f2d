use serde::{Deserialize, Serialize};

use crate::auth::repo::User;

/// Request body for signup. The first admin is provisioned by an explicit
/// signup with `is_admin: true`; there is no built-in admin account.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: i64,
    pub is_admin: bool,
}

/// Public projection of a user. Password hashes never leave the repo layer.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_request_defaults_is_admin_to_false() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"username":"alice","email":"a@x.com","password":"Abcdef12"}"#,
        )
        .unwrap();
        assert!(!req.is_admin);
    }

    #[test]
    fn user_summary_excludes_password_hash() {
        let summary = UserSummary {
            id: 1,
            username: "alice".into(),
            email: "a@x.com".into(),
            is_admin: false,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains(r#""username":"alice""#));
    }

    #[test]
    fn login_response_carries_bearer_token_type() {
        let json = serde_json::to_string(&LoginResponse {
            access_token: "tok".into(),
            token_type: "bearer".into(),
            user_id: 7,
            is_admin: true,
        })
        .unwrap();
        assert!(json.contains(r#""token_type":"bearer""#));
        assert!(json.contains(r#""user_id":7"#));
    }
}
