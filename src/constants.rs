use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Hidden form field that only automated submitters fill in.
pub const HONEYPOT_FIELD: &str = "website";

pub const PRIORITY_MIN: i16 = 1;
pub const PRIORITY_MAX: i16 = 5;
pub const DEFAULT_PRIORITY: i16 = 3;
