// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use crate::{
    models::{category::Category, identity::UserId, result::{QuizResult, ScoreTally}},
    store::{ResultStore, StoreError},
};

/// Results stored in the `results` table, one row per uid.
#[derive(Clone)]
pub struct PgResultStore {
    pool: PgPool,
}

/// Helper struct for reading a result row.
#[derive(FromRow)]
struct ResultRow {
    display_name: String,
    scores: Json<ScoreTally>,
    answers: Json<Vec<Category>>,
    saved_at: DateTime<Utc>,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    /// Upsert that replaces every column, so a retake overwrites the whole document.
    async fn save(&self, uid: &UserId, result: &QuizResult) -> Result<(), StoreError> {
        if !result.is_consistent() {
            return Err(StoreError::Inconsistent(uid.clone()));
        }

        sqlx::query(
            r#"
            INSERT INTO results (uid, display_name, scores, answers, saved_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (uid) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                scores = EXCLUDED.scores,
                answers = EXCLUDED.answers,
                saved_at = EXCLUDED.saved_at
            "#,
        )
        .bind(uid.as_str())
        .bind(&result.display_name)
        .bind(Json(&result.scores))
        .bind(Json(&result.answers))
        .bind(result.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save result for {}: {:?}", uid, e);
            StoreError::from(e)
        })?;

        Ok(())
    }

    async fn fetch(&self, uid: &UserId) -> Result<Option<QuizResult>, StoreError> {
        let row = sqlx::query_as::<_, ResultRow>(
            r#"
            SELECT display_name, scores, answers, saved_at
            FROM results
            WHERE uid = $1
            "#,
        )
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::ColumnDecode { source, .. } => StoreError::Malformed {
                uid: uid.clone(),
                reason: source.to_string(),
            },
            other => {
                tracing::error!("Failed to fetch result for {}: {:?}", uid, other);
                StoreError::from(other)
            }
        })?;

        Ok(row.map(|r| QuizResult {
            display_name: r.display_name,
            scores: r.scores.0,
            answers: r.answers.0,
            timestamp: r.saved_at,
        }))
    }

    async fn exists(&self, uid: &UserId) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM results WHERE uid = $1)",
        )
        .bind(uid.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
