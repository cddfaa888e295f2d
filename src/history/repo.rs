use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// One stored prediction. Serialized as-is in listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistoryRecord {
    pub id: i64,
    pub user_id: i64,
    pub disease_name: String,
    pub confidence: f64,
    pub image_path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl HistoryRecord {
    pub async fn insert(
        db: &PgPool,
        user_id: i64,
        disease_name: &str,
        confidence: f64,
        image_path: &str,
    ) -> sqlx::Result<HistoryRecord> {
        sqlx::query_as::<_, HistoryRecord>(
            r#"
            INSERT INTO history (user_id, disease_name, confidence, image_path)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, disease_name, confidence, image_path, "timestamp"
            "#,
        )
        .bind(user_id)
        .bind(disease_name)
        .bind(confidence)
        .bind(image_path)
        .fetch_one(db)
        .await
    }

    /// All records owned by the named user, newest first.
    pub async fn list_by_username(db: &PgPool, username: &str) -> sqlx::Result<Vec<HistoryRecord>> {
        sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT h.id, h.user_id, h.disease_name, h.confidence, h.image_path, h.timestamp
            FROM history h
            JOIN users u ON h.user_id = u.id
            WHERE u.username = $1
            ORDER BY h.timestamp DESC
            "#,
        )
        .bind(username)
        .fetch_all(db)
        .await
    }

    /// The record only if it belongs to the named user. A record owned by
    /// someone else looks exactly like a missing one.
    pub async fn find_owned(
        db: &PgPool,
        history_id: i64,
        username: &str,
    ) -> sqlx::Result<Option<HistoryRecord>> {
        sqlx::query_as::<_, HistoryRecord>(
            r#"
            SELECT h.id, h.user_id, h.disease_name, h.confidence, h.image_path, h.timestamp
            FROM history h
            JOIN users u ON h.user_id = u.id
            WHERE h.id = $1 AND u.username = $2
            "#,
        )
        .bind(history_id)
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_by_id(db: &PgPool, history_id: i64) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM history WHERE id = $1")
            .bind(history_id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn record_serializes_rfc3339_timestamp() {
        let record = HistoryRecord {
            id: 1,
            user_id: 2,
            disease_name: "Brown spot".into(),
            confidence: 0.92,
            image_path: "20250304_050607_leaf.jpg".into(),
            timestamp: datetime!(2025-03-04 05:06:07 UTC),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""disease_name":"Brown spot""#));
        assert!(json.contains(r#""confidence":0.92"#));
        assert!(json.contains("2025-03-04T05:06:07Z"));
    }
}
