use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;

/// Read access to past submissions of a single kind, used for the email cooldown.
#[async_trait]
pub trait SubmissionHistory: Send + Sync {
    /// Creation time of the newest submission from `email`, compared case-insensitively.
    async fn last_submission_at(&self, email: &str) -> Result<Option<DateTime<Utc>>, AppError>;
}
