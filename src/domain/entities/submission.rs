use derive_more::Display;
use serde::Serialize;

use crate::entities::service_request::ServiceRequest;

/// The two record kinds accepted by the intake API.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    #[display("contact")]
    Contact,

    #[display("service_request")]
    ServiceRequest,
}

/// Result of a store insert that may be suppressed as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    DuplicateIgnored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
    Duplicate,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub status: SubmissionStatus,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_entries: Option<Vec<ServiceRequest>>,
}

impl SubmissionResponse {
    pub fn success(message: impl Into<String>, id: i64) -> Self {
        SubmissionResponse {
            status: SubmissionStatus::Success,
            message: message.into(),
            id: Some(id),
            recent_entries: None,
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        SubmissionResponse {
            status: SubmissionStatus::Duplicate,
            message: message.into(),
            id: None,
            recent_entries: None,
        }
    }
}
