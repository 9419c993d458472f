use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    constants::DEFAULT_PRIORITY,
    entities::form_fields::{is_present, loose_required, loose_text, trim_optional, trim_required},
    errors::AppError,
    validation::{
        parse_budget, parse_deadline, parse_priority,
        validate_budget, validate_deadline, validate_email_address, validate_not_blank,
        validate_priority, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PHONE_LENGTH,
        MAX_PLATFORM_LENGTH, MAX_SERVICE_LENGTH,
    },
};

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct ServiceRequestForm {
    #[serde(default, deserialize_with = "loose_required")]
    #[validate(
        custom(function = "validate_not_blank", message = "Name is required."),
        length(max = MAX_NAME_LENGTH, message = "Name is too long.")
    )]
    pub name: String,

    #[serde(default, deserialize_with = "loose_required")]
    #[validate(
        custom(function = "validate_email_address"),
        length(max = MAX_EMAIL_LENGTH, message = "Email is too long.")
    )]
    pub email: String,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_PHONE_LENGTH, message = "Phone number is too long."))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "loose_required")]
    #[validate(
        custom(function = "validate_not_blank", message = "Service is required."),
        length(max = MAX_SERVICE_LENGTH, message = "Service name is too long.")
    )]
    pub service: String,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub sub_details: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_budget"))]
    pub budget: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_priority"))]
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_PLATFORM_LENGTH, message = "Platform name is too long."))]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Attachment link must be a valid URL."))]
    pub attachment_link: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_deadline"))]
    pub deadline: Option<String>,

    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ServiceRequestForm {
    pub fn is_spam(&self) -> bool {
        is_present(self.website.as_deref())
    }

    pub fn normalized(self) -> Self {
        ServiceRequestForm {
            name: trim_required(self.name),
            email: trim_required(self.email),
            phone: trim_optional(self.phone),
            service: trim_required(self.service),
            sub_details: trim_optional(self.sub_details),
            details: trim_optional(self.details),
            budget: trim_optional(self.budget),
            priority: trim_optional(self.priority),
            platform: trim_optional(self.platform),
            attachment_link: trim_optional(self.attachment_link),
            notes: trim_optional(self.notes),
            deadline: trim_optional(self.deadline),
            website: trim_optional(self.website),
        }
    }
}

/// A validated service request with its numeric and date fields coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequestInsert {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub sub_details: Option<String>,
    pub details: Option<String>,
    pub budget: Option<i32>,
    pub priority: i16,
    pub platform: Option<String>,
    pub attachment_link: Option<String>,
    pub notes: Option<String>,
    pub deadline: Option<NaiveDate>,
}

impl TryFrom<ServiceRequestForm> for ServiceRequestInsert {
    type Error = AppError;

    fn try_from(form: ServiceRequestForm) -> Result<Self, Self::Error> {
        let budget = form.budget
            .as_deref()
            .map(parse_budget)
            .transpose()
            .map_err(|msg| AppError::invalid_field("budget", msg))?;

        let priority = form.priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .map_err(|msg| AppError::invalid_field("priority", msg))?
            .unwrap_or(DEFAULT_PRIORITY);

        let deadline = form.deadline
            .as_deref()
            .map(parse_deadline)
            .transpose()
            .map_err(|msg| AppError::invalid_field("deadline", msg))?;

        Ok(ServiceRequestInsert {
            name: form.name,
            email: form.email,
            phone: form.phone,
            service: form.service,
            sub_details: form.sub_details,
            details: form.details,
            budget,
            priority,
            platform: form.platform,
            attachment_link: form.attachment_link,
            notes: form.notes,
            deadline,
        })
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServiceRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub sub_details: Option<String>,
    pub details: Option<String>,
    pub budget: Option<i32>,
    pub priority: i16,
    pub platform: Option<String>,
    pub attachment_link: Option<String>,
    pub notes: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
