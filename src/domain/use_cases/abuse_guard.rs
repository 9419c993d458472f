use std::time::Duration;

use chrono::Utc;
use derive_more::Display;
use tracing::{debug, warn};

use crate::{
    entities::submission::SubmissionKind,
    errors::AppError,
    limiter::ip_window::{IpWindowLimiter, WindowDecision},
    repositories::history::SubmissionHistory,
    settings::RateLimitSettings,
};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    #[display("Too many requests from your IP. Please try again later.")]
    IpRateExceeded { retry_after: Duration },

    #[display("You must wait {} seconds before sending another request.", whole_seconds(*retry_after))]
    EmailCooldown { retry_after: Duration },
}

impl DenialReason {
    pub fn retry_after(&self) -> Duration {
        match self {
            DenialReason::IpRateExceeded { retry_after }
            | DenialReason::EmailCooldown { retry_after } => *retry_after,
        }
    }
}

impl From<DenialReason> for AppError {
    fn from(reason: DenialReason) -> Self {
        AppError::RateLimited {
            message: reason.to_string(),
            retry_after: Some(whole_seconds(reason.retry_after())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied(DenialReason),
}

/// Rounds up so a client that waits the advertised time is admitted.
fn whole_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 { secs + 1 } else { secs.max(1) }
}

/// Per-IP volume limit plus per-email cooldown.
#[derive(Clone)]
pub struct AbuseGuard {
    ip_limiter: IpWindowLimiter,
    email_cooldown: Duration,
}

impl AbuseGuard {
    pub fn new(ip_limiter: IpWindowLimiter, email_cooldown: Duration) -> Self {
        AbuseGuard { ip_limiter, email_cooldown }
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        AbuseGuard::new(
            IpWindowLimiter::new(settings.ip_max, settings.window()),
            settings.email_cooldown(),
        )
    }

    pub fn ip_limiter(&self) -> &IpWindowLimiter {
        &self.ip_limiter
    }

    /// Decides whether a submission may proceed to the store.
    ///
    /// The IP window is checked and charged first; the attempt stays counted
    /// even when the email cooldown then denies. The cooldown only reads the
    /// history of `kind`.
    pub async fn admit<H>(
        &self,
        ip: &str,
        email: &str,
        kind: SubmissionKind,
        history: &H,
    ) -> Result<Admission, AppError>
    where
        H: SubmissionHistory + ?Sized,
    {
        match self.ip_limiter.check_and_record(ip) {
            WindowDecision::Allowed { remaining } => {
                debug!(ip, %kind, remaining, "ip window charged");
            }
            WindowDecision::Limited { retry_after } => {
                warn!(ip, %kind, "submission denied: ip rate exceeded");
                return Ok(Admission::Denied(DenialReason::IpRateExceeded { retry_after }));
            }
        }

        if self.email_cooldown.is_zero() {
            return Ok(Admission::Allowed);
        }

        if let Some(last) = history.last_submission_at(email).await? {
            // A clock slightly ahead on the database side yields a negative gap, still inside the cooldown
            let elapsed = (Utc::now() - last).to_std().unwrap_or(Duration::ZERO);
            if elapsed < self.email_cooldown {
                let retry_after = self.email_cooldown - elapsed;
                warn!(ip, %kind, "submission denied: email cooldown");
                return Ok(Admission::Denied(DenialReason::EmailCooldown { retry_after }));
            }
        }

        Ok(Admission::Allowed)
    }
}
