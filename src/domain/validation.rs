use std::borrow::Cow;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::{
    constants::{PRIORITY_MAX, PRIORITY_MIN},
    dns::mx::MailDomainVerifier,
    errors::AppError,
};

// ───── Constants ──────────────────────────────────────────────────────
pub const MAX_NAME_LENGTH: u64 = 255;
pub const MAX_EMAIL_LENGTH: u64 = 255;
pub const MAX_PHONE_LENGTH: u64 = 20;
pub const MAX_SERVICE_LENGTH: u64 = 50;
pub const MAX_PLATFORM_LENGTH: u64 = 50;

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

fn new_validation_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

// ───── Field rules ───────────────────────────────────────────────────

/// Rejects empty or whitespace-only values. The caller supplies the message.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(new_validation_error("required", "Email is required."));
    }
    if !is_email_shaped(email) {
        return Err(new_validation_error("email", "Invalid email address."));
    }
    Ok(())
}

pub fn validate_budget(budget: &str) -> Result<(), ValidationError> {
    parse_budget(budget)
        .map(|_| ())
        .map_err(|msg| new_validation_error("budget", msg))
}

pub fn validate_priority(priority: &str) -> Result<(), ValidationError> {
    parse_priority(priority)
        .map(|_| ())
        .map_err(|msg| new_validation_error("priority", msg))
}

pub fn validate_deadline(deadline: &str) -> Result<(), ValidationError> {
    parse_deadline(deadline)
        .map(|_| ())
        .map_err(|msg| new_validation_error("deadline", msg))
}

// ───── Parsers ───────────────────────────────────────────────────────

pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email.trim())
}

/// Domain part of an already shape-checked address.
pub fn email_domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}

pub fn parse_budget(raw: &str) -> Result<i32, &'static str> {
    match raw.trim().parse::<i32>() {
        Ok(value) if value >= 0 => Ok(value),
        Ok(_) => Err("Budget cannot be negative."),
        Err(_) => Err("Budget must be a number."),
    }
}

pub fn parse_priority(raw: &str) -> Result<i16, &'static str> {
    match raw.trim().parse::<i16>() {
        Ok(value) if (PRIORITY_MIN..=PRIORITY_MAX).contains(&value) => Ok(value),
        _ => Err("Priority must be a whole number between 1 and 5."),
    }
}

pub fn parse_deadline(raw: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(raw.trim(), DEADLINE_FORMAT)
        .map_err(|_| "Deadline must be a date in YYYY-MM-DD format.")
}

// ───── Network checks ────────────────────────────────────────────────

/// Confirms the email's domain advertises a mail exchanger.
///
/// Lookup failures of any kind, timeouts included, are reported as a
/// validation error on the `email` field.
pub async fn verify_mail_domain<M>(verifier: &M, email: &str) -> Result<(), AppError>
where
    M: MailDomainVerifier + ?Sized,
{
    let domain = email_domain(email)
        .ok_or_else(|| AppError::invalid_field("email", "Invalid email address."))?;

    if verifier.has_mail_exchange(domain).await {
        Ok(())
    } else {
        tracing::info!(domain, "rejected email without resolvable MX record");
        Err(AppError::invalid_field("email", "Invalid or non-existent email address."))
    }
}
