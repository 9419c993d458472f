use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    entities::{
        contact_message::ContactMessageInsert,
        submission::InsertOutcome,
    },
    errors::AppError,
    repositories::{history::SubmissionHistory, sqlx_repo::SqlxContactMessageRepo},
};

#[async_trait]
pub trait ContactMessageRepository: SubmissionHistory {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// Inserts unless the `(email, message)` pair is already stored.
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<InsertOutcome, AppError>;
}

impl SqlxContactMessageRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactMessageRepo { pool }
    }
}

#[async_trait]
impl SubmissionHistory for SqlxContactMessageRepo {
    async fn last_submission_at(&self, email: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        let last = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT created_at FROM contact_messages
            WHERE lower(email) = lower($1)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(last)
    }
}

#[async_trait]
impl ContactMessageRepository for SqlxContactMessageRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<InsertOutcome, AppError> {
        // The unique index on (email, md5(message)) decides; no row back means it already existed
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO contact_messages (name, email, message)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.message)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match id {
            Some(id) => InsertOutcome::Inserted(id),
            None => InsertOutcome::DuplicateIgnored,
        })
    }
}
