use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Host and database name kept separately so connection failures can be
    /// reported without exposing the credentials embedded in the URL.
    pub db_host: String,
    pub db_name: String,
    pub jwt: JwtConfig,
    pub upload_dir: PathBuf,
    pub inference_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db_host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into());
        let db_name = std::env::var("DB_NAME").unwrap_or_else(|_| "leafscan".into());

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let port = std::env::var("DB_PORT").unwrap_or_else(|_| "5432".into());
                let user = std::env::var("DB_USER").unwrap_or_else(|_| "postgres".into());
                let password = std::env::var("DB_PASSWORD").context(
                    "DB_PASSWORD (or DATABASE_URL) must be set; there is no default password",
                )?;
                format!("postgres://{user}:{password}@{db_host}:{port}/{db_name}")
            }
        };

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET must be set; there is no default signing key")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "leafscan".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "leafscan-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads/images"));

        let inference_url = std::env::var("INFERENCE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/predict".into());

        Ok(Self {
            database_url,
            db_host,
            db_name,
            jwt,
            upload_dir,
            inference_url,
        })
    }
}
