use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::form_fields::{is_present, loose_required, loose_text, trim_optional, trim_required},
    validation::{validate_email_address, validate_not_blank, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH},
};

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct ContactMessageForm {
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

    #[serde(default, deserialize_with = "loose_required")]
    #[validate(custom(function = "validate_not_blank", message = "Message is required."))]
    pub message: String,

    /// Honeypot, see [`crate::constants::HONEYPOT_FIELD`].
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ContactMessageForm {
    pub fn is_spam(&self) -> bool {
        is_present(self.website.as_deref())
    }

    pub fn normalized(self) -> Self {
        ContactMessageForm {
            name: trim_required(self.name),
            email: trim_required(self.email),
            message: trim_required(self.message),
            website: trim_optional(self.website),
        }
    }
}

/// A validated contact message ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl From<ContactMessageForm> for ContactMessageInsert {
    fn from(form: ContactMessageForm) -> Self {
        ContactMessageInsert {
            name: form.name,
            email: form.email,
            message: form.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
