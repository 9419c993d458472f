use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    entities::service_request::{ServiceRequest, ServiceRequestInsert},
    errors::AppError,
    repositories::{history::SubmissionHistory, sqlx_repo::SqlxServiceRequestRepo},
};

#[async_trait]
pub trait ServiceRequestRepository: SubmissionHistory {
    async fn create_service_request(&self, req: &ServiceRequestInsert) -> Result<i64, AppError>;
    async fn list_recent_service_requests(&self, limit: i64) -> Result<Vec<ServiceRequest>, AppError>;
}

impl SqlxServiceRequestRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxServiceRequestRepo { pool }
    }
}

#[async_trait]
impl SubmissionHistory for SqlxServiceRequestRepo {
    async fn last_submission_at(&self, email: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        let last = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT created_at FROM service_requests
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
impl ServiceRequestRepository for SqlxServiceRequestRepo {
    async fn create_service_request(&self, req: &ServiceRequestInsert) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO service_requests (
                name, email, phone, service, sub_details, details,
                budget, priority, platform, attachment_link, notes, deadline
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.service)
        .bind(&req.sub_details)
        .bind(&req.details)
        .bind(req.budget)
        .bind(req.priority)
        .bind(&req.platform)
        .bind(&req.attachment_link)
        .bind(&req.notes)
        .bind(req.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_recent_service_requests(&self, limit: i64) -> Result<Vec<ServiceRequest>, AppError> {
        let entries = sqlx::query_as::<_, ServiceRequest>(
            r#"
            SELECT id, name, email, phone, service, sub_details, details, budget,
                   priority, platform, attachment_link, notes, deadline, created_at
            FROM service_requests
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
