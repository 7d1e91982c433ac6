//! # Preference Repository
//!
//! Per-user key/value preference records.
//!
//! These replace ambient client-side storage for things like the monthly
//! profit goal and the saved payslip period: the value is an opaque JSON
//! document owned by the frontend, persisted and recalled through the same
//! gateway as everything else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::DbResult;

/// One preference record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preference {
    pub user_id: String,
    pub key: String,
    /// Arbitrary JSON document; the backend never interprets it.
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PreferenceRow {
    user_id: String,
    key: String,
    value: String,
    updated_at: DateTime<Utc>,
}

impl PreferenceRow {
    fn into_preference(self) -> DbResult<Preference> {
        Ok(Preference {
            user_id: self.user_id,
            key: self.key,
            value: serde_json::from_str(&self.value)?,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for preference operations.
#[derive(Debug, Clone)]
pub struct PreferenceRepository {
    pool: SqlitePool,
}

impl PreferenceRepository {
    /// Creates a new PreferenceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PreferenceRepository { pool }
    }

    /// Gets one preference for a user.
    pub async fn get(&self, user_id: &str, key: &str) -> DbResult<Option<Preference>> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            "SELECT user_id, key, value, updated_at FROM preferences \
             WHERE user_id = ?1 AND key = ?2",
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PreferenceRow::into_preference).transpose()
    }

    /// Upserts a preference (last write wins).
    pub async fn put(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> DbResult<Preference> {
        let now = Utc::now();
        let text = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO preferences (user_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(key)
        .bind(&text)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Preference {
            user_id: user_id.to_string(),
            key: key.to_string(),
            value: value.clone(),
            updated_at: now,
        })
    }

    /// All preferences for a user.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Preference>> {
        let rows = sqlx::query_as::<_, PreferenceRow>(
            "SELECT user_id, key, value, updated_at FROM preferences \
             WHERE user_id = ?1 ORDER BY key ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PreferenceRow::into_preference).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.preferences();

        repo.put("user-1", "monthly_goal", &json!({ "cents": 50_000_000 }))
            .await
            .unwrap();

        let pref = repo.get("user-1", "monthly_goal").await.unwrap().unwrap();
        assert_eq!(pref.value["cents"], 50_000_000);

        assert!(repo.get("user-1", "missing").await.unwrap().is_none());
        assert!(repo.get("user-2", "monthly_goal").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.preferences();

        repo.put("user-1", "payslip_period", &json!({ "start": "2026-07-01" }))
            .await
            .unwrap();
        repo.put("user-1", "payslip_period", &json!({ "start": "2026-08-01" }))
            .await
            .unwrap();

        let pref = repo.get("user-1", "payslip_period").await.unwrap().unwrap();
        assert_eq!(pref.value["start"], "2026-08-01");

        let all = repo.list_for_user("user-1").await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
